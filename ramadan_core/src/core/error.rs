//! Error types for prayer-time and calendar computations.

/// Result type for prayer-time operations
pub type PrayerResult<T> = Result<T, PrayerError>;

/// Error type for prayer-time operations.
///
/// Every error is raised by the single call that received the offending
/// input. No call substitutes a partial result for a missing instant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrayerError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid convention: {0}")]
    InvalidConvention(String),

    #[error("Date {date} is outside the supported range of the {calendar} calendar")]
    DateOutOfSupportedRange { date: String, calendar: String },

    #[error("Unresolvable solar angle: {0}")]
    UnresolvableSolarAngle(String),

    #[error("Invalid schedule window: {0}")]
    InvalidWindow(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PrayerError {
    /// True for errors caused by caller input rather than by configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PrayerError::InvalidCoordinate(_)
                | PrayerError::DateOutOfSupportedRange { .. }
                | PrayerError::InvalidWindow(_)
        )
    }
}
