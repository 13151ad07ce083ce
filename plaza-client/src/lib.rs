pub mod directory;
pub mod pipeline;
pub mod protocol;
pub mod session;
pub mod transport;

pub use directory::*;
pub use pipeline::*;
pub use protocol::*;
pub use session::*;
pub use transport::*;
