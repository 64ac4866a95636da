//! Error types for `city-core`.
//!
//! Only construction can fail. Once an engine exists, every year step is
//! plain arithmetic over validated state, and extinction is reported as a
//! [`YearOutcome`](crate::YearOutcome) variant rather than an error.

/// Errors raised while building or configuring a [`CityEngine`](crate::CityEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A construction parameter is outside its valid domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in [`EngineConfig`](crate::EngineConfig).
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// A JSON configuration document could not be parsed.
    #[error("failed to parse engine config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
