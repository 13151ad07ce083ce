use plaza_core::AvatarCode;
use serde::{Deserialize, Serialize};

/// Opaque reference to a spawned visual avatar, owned by the pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct VisualHandle(pub u64);

/// Avatar asset pipeline the session drives. Implementations own meshes,
/// materials and animators; the protocol only holds [`VisualHandle`]s.
///
/// Calls are made from the session task and must not block.
pub trait AvatarPipeline: Send + Sync + 'static {
    fn spawn_generated(&self, code: &AvatarCode) -> VisualHandle;

    fn spawn_custom(&self) -> VisualHandle;

    fn set_walking(&self, visual: VisualHandle, is_walking: bool);

    /// Deactivate and drop a representation. Called for placeholders being
    /// replaced and for every handle on teardown.
    fn release(&self, visual: VisualHandle);
}
