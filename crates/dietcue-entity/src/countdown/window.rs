//! Countdown threshold windows.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed threshold buckets for the plan-expiry countdown.
///
/// Each owner is alerted at most once per window crossing; the smallest
/// applicable window wins, so an owner first seen with 20 hours remaining
/// gets the one-day alert, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownWindow {
    /// At most 7 days of validity remain.
    SevenDays,
    /// At most 24 hours of validity remain.
    OneDay,
}

impl CountdownWindow {
    /// Map remaining validity to the applicable window, if any.
    pub fn for_remaining(remaining: Duration) -> Option<Self> {
        if remaining <= Duration::hours(24) {
            Some(Self::OneDay)
        } else if remaining <= Duration::days(7) {
            Some(Self::SevenDays)
        } else {
            None
        }
    }

    /// Return the window as a stable string for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SevenDays => "seven_days",
            Self::OneDay => "one_day",
        }
    }

    /// Human-readable alert phrasing for this window.
    pub fn alert_body(&self) -> &'static str {
        match self {
            Self::SevenDays => "The plan expires in less than 7 days.",
            Self::OneDay => "The plan expires in less than 24 hours.",
        }
    }
}

impl fmt::Display for CountdownWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CountdownWindow {
    type Err = dietcue_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seven_days" => Ok(Self::SevenDays),
            "one_day" => Ok(Self::OneDay),
            _ => Err(dietcue_core::AppError::validation(format!(
                "Invalid countdown window: '{s}'"
            ))),
        }
    }
}
