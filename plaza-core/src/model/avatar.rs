use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Names a generated avatar asset. Correlates protocol messages to a visual
/// representation independently of transport peer ids.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct AvatarCode(String);

impl AvatarCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Fresh locally-unique code. Generated avatars are keyed by uuid strings.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AvatarCode {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AvatarCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AvatarCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which visual representation a peer handle shows.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq, Default)]
pub enum AvatarVariant {
    #[default]
    Uninitialized,
    /// Pre-baked avatar, needs no identifier exchange.
    Custom,
    /// Avatar built by the asset pipeline from an [`AvatarCode`].
    Generated,
}

impl AvatarVariant {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Custom | Self::Generated)
    }
}

impl fmt::Display for AvatarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Custom => "custom",
            Self::Generated => "generated",
        };
        f.write_str(name)
    }
}
