pub mod recording_pipeline;

pub use recording_pipeline::*;
pub use recording_transport::*;
pub use session_helpers::*;
