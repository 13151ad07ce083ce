use crate::pipeline::{AvatarPipeline, VisualHandle};
use plaza_core::AvatarCode;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Pipeline with no renderer behind it. Allocates handles and logs.
#[derive(Debug, Default)]
pub struct HeadlessPipeline {
    next: AtomicU64,
}

impl HeadlessPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> VisualHandle {
        VisualHandle(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl AvatarPipeline for HeadlessPipeline {
    fn spawn_generated(&self, code: &AvatarCode) -> VisualHandle {
        let visual = self.allocate();
        debug!("Spawned generated avatar {} as {:?}", code, visual);
        visual
    }

    fn spawn_custom(&self) -> VisualHandle {
        let visual = self.allocate();
        debug!("Spawned custom avatar as {:?}", visual);
        visual
    }

    fn set_walking(&self, visual: VisualHandle, is_walking: bool) {
        debug!("{:?} walking = {}", visual, is_walking);
    }

    fn release(&self, visual: VisualHandle) {
        debug!("Released {:?}", visual);
    }
}
