//! # Error Types
//!
//! Domain-specific error types for forecourt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forecourt-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                          │
//! │  └── ValidationError  - Malformed facts supplied by the caller          │
//! │                                                                         │
//! │  forecourt-db errors (separate crate)                                   │
//! │  └── DbError          - Store failures, propagated opaque               │
//! │                                                                         │
//! │  The HTTP boundary maps these to status codes; no layer below it        │
//! │  recovers or retries.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (tank ID, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Absence of data (no stock entry, no readings) is NOT an error —
//!    engines return zero-states for it

use thiserror::Error;

use crate::shift::ShiftStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent domain rule violations. They should be caught
/// and translated to user-facing messages at the HTTP boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Tank cannot be found or is out of service.
    ///
    /// ## When This Occurs
    /// - Tank ID doesn't exist
    /// - Tank was soft-deleted (`is_active = false`)
    #[error("Tank not found or inactive: {0}")]
    TankNotFound(String),

    /// Shift record cannot be found.
    #[error("Shift not found: {0}")]
    ShiftNotFound(String),

    /// Shift is not in a state that allows the requested transition.
    ///
    /// ## When This Occurs
    /// - Submitting a shift that was never completed
    /// - Re-activating a submitted shift
    ///
    /// The lifecycle is strictly monotonic:
    /// `not-started → active → completed → submitted`.
    #[error("Shift {shift_id} is {current}, cannot move to {requested}")]
    InvalidShiftTransition {
        shift_id: String,
        current: ShiftStatus,
        requested: ShiftStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a fact supplied by the caller is structurally
/// malformed. Used for early validation before anything is persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::InvalidShiftTransition {
            shift_id: "s-42".to_string(),
            current: ShiftStatus::Submitted,
            requested: ShiftStatus::Active,
        };
        assert_eq!(
            err.to_string(),
            "Shift s-42 is submitted, cannot move to active"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "attendant_id".to_string(),
        };
        assert_eq!(err.to_string(), "attendant_id is required");

        let err = ValidationError::MustBeNonNegative {
            field: "cash_paise".to_string(),
        };
        assert_eq!(err.to_string(), "cash_paise must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "tank_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
