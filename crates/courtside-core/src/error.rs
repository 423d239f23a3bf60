// Error kinds surfaced by the core and propagated from the data-access layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A precondition on the inputs failed (zero possessions, zero minutes,
    /// mismatched split lengths, malformed or missing raw field).
    #[error("invalid input for `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    /// The data-access layer has no record for the requested key.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

impl StatsError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        StatsError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StatsError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Field name for `InvalidInput`, `None` otherwise.
    pub fn field(&self) -> Option<&str> {
        match self {
            StatsError::InvalidInput { field, .. } => Some(field),
            StatsError::NotFound { .. } => None,
        }
    }
}

/// Reject NaN and infinite values for a named raw field.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64, StatsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::invalid(field, format!("must be finite, got {value}")))
    }
}
