mod loopback;
mod room_options;
mod transport;
mod transport_error;
mod transport_event;

pub use loopback::*;
pub use room_options::*;
pub use transport::*;
pub use transport_error::*;
pub use transport_event::*;
