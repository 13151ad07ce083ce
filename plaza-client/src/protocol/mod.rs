pub mod announce;
pub mod live_state;
pub mod reconcile;

pub use announce::{AnnouncePhase, AnnounceState, LocalIdentity};
pub use live_state::{LiveStateApplied, WalkingTracker};
pub use reconcile::ReconcileOutcome;
