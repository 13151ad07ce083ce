use plaza_client::{AvatarPipeline, VisualHandle};
use plaza_core::AvatarCode;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Calls made into the pipeline, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineCall {
    SpawnGenerated { code: AvatarCode, visual: VisualHandle },
    SpawnCustom { visual: VisualHandle },
    SetWalking { visual: VisualHandle, is_walking: bool },
    Release { visual: VisualHandle },
}

/// AvatarPipeline that records every call for later verification.
#[derive(Default)]
pub struct RecordingPipeline {
    next: AtomicU64,
    calls: Mutex<Vec<PipelineCall>>,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PipelineCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Codes spawned as generated avatars.
    pub fn spawned_codes(&self) -> Vec<AvatarCode> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PipelineCall::SpawnGenerated { code, .. } => Some(code),
                _ => None,
            })
            .collect()
    }

    /// Walking flags forwarded to `visual`.
    pub fn walking_of(&self, visual: VisualHandle) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PipelineCall::SetWalking {
                    visual: v,
                    is_walking,
                } if v == visual => Some(is_walking),
                _ => None,
            })
            .collect()
    }

    pub fn released(&self) -> Vec<VisualHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PipelineCall::Release { visual } => Some(visual),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PipelineCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn allocate(&self) -> VisualHandle {
        VisualHandle(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl AvatarPipeline for RecordingPipeline {
    fn spawn_generated(&self, code: &AvatarCode) -> VisualHandle {
        let visual = self.allocate();
        self.record(PipelineCall::SpawnGenerated {
            code: code.clone(),
            visual,
        });
        visual
    }

    fn spawn_custom(&self) -> VisualHandle {
        let visual = self.allocate();
        self.record(PipelineCall::SpawnCustom { visual });
        visual
    }

    fn set_walking(&self, visual: VisualHandle, is_walking: bool) {
        self.record(PipelineCall::SetWalking { visual, is_walking });
    }

    fn release(&self, visual: VisualHandle) {
        self.record(PipelineCall::Release { visual });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let pipeline = RecordingPipeline::new();
        let code = AvatarCode::from("A1");

        let generated = pipeline.spawn_generated(&code);
        let custom = pipeline.spawn_custom();
        pipeline.set_walking(generated, true);
        pipeline.release(custom);

        assert_ne!(generated, custom);
        assert_eq!(pipeline.spawned_codes(), vec![code]);
        assert_eq!(pipeline.walking_of(generated), vec![true]);
        assert_eq!(pipeline.released(), vec![custom]);
    }
}
