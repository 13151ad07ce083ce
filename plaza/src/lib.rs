pub use plaza_core::{AvatarCode, AvatarVariant, PeerId};

pub mod model {
    pub use plaza_core::model::*;
    pub use plaza_core::{CodecError, Message};
}

#[cfg(feature = "client")]
pub mod client {
    pub use plaza_client::*;
}
