mod peer_directory;
mod peer_handle;

pub use peer_directory::*;
pub use peer_handle::*;
