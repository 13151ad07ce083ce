pub mod codec;
pub mod model;
pub mod traits;

pub use codec::CodecError;
pub use model::*;
pub use traits::Message;
