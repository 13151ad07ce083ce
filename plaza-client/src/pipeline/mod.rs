mod avatar_pipeline;
mod headless;

pub use avatar_pipeline::*;
pub use headless::*;
