// Error types - configuration rejection and catalog lookup failures
// Numeric non-convergence is deliberately not represented here

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A configuration or orbital-elements field is out of its valid range
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("unknown body: {0}")]
    UnknownBody(String),
}

impl EngineError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is a configuration error
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EngineError::InvalidConfig { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Reject non-finite or non-positive values
pub(crate) fn require_positive(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

/// Reject non-finite or negative values
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

/// Reject non-finite values and values outside `[min, max]`
pub(crate) fn require_in_range(field: &'static str, value: f64, min: f64, max: f64) -> EngineResult<()> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(EngineError::invalid(
            field,
            format!("must be within [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}

/// Reject non-finite values
pub(crate) fn require_finite(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid(field, format!("must be finite, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_names_field() {
        let err = require_positive("orbital_period", 0.0).unwrap_err();
        assert_eq!(err.field(), Some("orbital_period"));
        assert!(err.to_string().contains("orbital_period"));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(require_finite("x", f64::NAN).is_err());
        assert!(require_non_negative("x", f64::INFINITY).is_err());
        assert!(require_non_negative("x", 0.0).is_ok());
    }

    #[test]
    fn test_range_bounds_inclusive() {
        assert!(require_in_range("x", 1.0, 1.0, 2.0).is_ok());
        assert!(require_in_range("x", 2.0, 1.0, 2.0).is_ok());
        assert_eq!(require_in_range("x", 2.5, 1.0, 2.0).unwrap_err().field(), Some("x"));
        assert!(require_in_range("x", f64::NAN, 1.0, 2.0).is_err());
    }
}
