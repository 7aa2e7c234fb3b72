//! # Error Types
//!
//! Domain-specific error types for emis-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  emis-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  emis-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  emis-server errors                                                    │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced location does not exist.
    #[error("Location not found: {0}")]
    LocationNotFound(i64),

    /// Referenced daily log does not exist.
    ///
    /// ## When This Occurs
    /// - balance-day / close-day on an unknown id
    /// - add-transaction against a log that was never opened
    #[error("Daily log not found: {0}")]
    DailyLogNotFound(i64),

    /// The daily log is CLOSED and rejects the requested operation.
    ///
    /// ## When This Occurs
    /// ```text
    /// close-day(7) ──► status: CLOSED
    ///      │
    ///      ▼
    /// add-transaction(daily_log_id: 7)
    ///      │
    ///      ▼
    /// DayClosed { log_id: 7 }
    /// ```
    #[error("Daily log {log_id} is closed")]
    DayClosed { log_id: i64 },

    /// A money amount is unusable (non-finite or out of range).
    #[error("Invalid amount for {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Number is NaN or infinite.
    #[error("{field} must be a finite number")]
    MustBeFinite { field: String },

    /// Invalid format (e.g., VIN with punctuation).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::DayClosed { log_id: 7 }.to_string(),
            "Daily log 7 is closed"
        );
        assert_eq!(
            CoreError::DailyLogNotFound(42).to_string(),
            "Daily log not found: 42"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "vehicle_make".to_string(),
        };
        assert_eq!(err.to_string(), "vehicle_make is required");

        let err = ValidationError::NotAllowed {
            field: "payment_method".to_string(),
            allowed: vec!["CASH".to_string(), "CC".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"payment_method must be one of: ["CASH", "CC"]"#
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBeFinite {
            field: "total_amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
