//! Push token format validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized token prefix. Tokens that do not carry it are treated
/// identically to "no token" and never used for delivery.
const TOKEN_PREFIX: &str = "ExponentPushToken[";

/// An opaque push delivery address.
///
/// The token is owned by the external device directory; this type only
/// reads and shape-checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Check the token against the recognized prefix pattern.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(TOKEN_PREFIX) && self.0.ends_with(']') && self.0.len() > TOKEN_PREFIX.len() + 1
    }

    /// Return the token only if it passes the shape check.
    pub fn validated(raw: Option<String>) -> Option<Self> {
        raw.map(Self::new).filter(Self::is_valid)
    }

    /// Return the raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
