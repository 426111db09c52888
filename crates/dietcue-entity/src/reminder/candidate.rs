//! Validated reminder candidates and activity-id derivation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use dietcue_core::AppResult;
use dietcue_core::error::AppError;
use dietcue_core::traits::ExtractedCandidate;

/// A reminder candidate that passed validation.
///
/// Built from an [`ExtractedCandidate`] via [`ReminderCandidate::validate`];
/// the extraction output is untrusted and individual malformed entries are
/// dropped rather than failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderCandidate {
    /// Free-text reminder message.
    pub message: String,
    /// Hour of day (0-23), owner-local.
    pub hour: u8,
    /// Minute of hour (0-59).
    pub minute: u8,
    /// Target weekdays, Sunday = 0, deduplicated and sorted. Empty means
    /// the reminder fires every day.
    pub weekdays: Vec<u8>,
}

impl ReminderCandidate {
    /// Validate a raw extracted candidate.
    pub fn validate(raw: ExtractedCandidate) -> AppResult<Self> {
        let message = raw.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::validation("Candidate message is empty"));
        }

        let hour = u8::try_from(raw.hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| AppError::validation(format!("Invalid hour: {}", raw.hour)))?;

        let minute = u8::try_from(raw.minute)
            .ok()
            .filter(|m| *m <= 59)
            .ok_or_else(|| AppError::validation(format!("Invalid minute: {}", raw.minute)))?;

        let mut weekdays = Vec::with_capacity(raw.weekdays.len());
        for day in &raw.weekdays {
            let day = u8::try_from(*day)
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| AppError::validation(format!("Invalid weekday: {day}")))?;
            if !weekdays.contains(&day) {
                weekdays.push(day);
            }
        }
        weekdays.sort_unstable();

        Ok(Self {
            message,
            hour,
            minute,
            weekdays,
        })
    }

    /// Derive the stable activity identifier for this candidate.
    ///
    /// The id is a hash of the trimmed, case-folded message text, so
    /// re-extracting an unchanged plan yields the same id for the same
    /// logical reminder.
    pub fn activity_id(&self) -> String {
        derive_activity_id(&self.message)
    }
}

/// Hash normalized message text into an activity id.
pub fn derive_activity_id(message: &str) -> String {
    let normalized = message.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(digest)
}
