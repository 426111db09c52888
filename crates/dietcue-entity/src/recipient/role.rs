//! Recipient role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical recipient of a notification.
///
/// Resolution to an actual device token happens in the delivery router;
/// role exclusivity (a subject token is never an advisor token) is enforced
/// there, at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientRole {
    /// The person the notification is about.
    Subject,
    /// The single counterpart role that receives oversight-style alerts.
    Advisor,
}

impl RecipientRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Advisor => "advisor",
        }
    }
}

impl fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecipientRole {
    type Err = dietcue_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subject" => Ok(Self::Subject),
            "advisor" => Ok(Self::Advisor),
            _ => Err(dietcue_core::AppError::validation(format!(
                "Invalid recipient role: '{s}'. Expected one of: subject, advisor"
            ))),
        }
    }
}
