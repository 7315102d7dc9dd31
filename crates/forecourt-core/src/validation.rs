//! # Validation Module
//!
//! Well-formedness checks for facts supplied by callers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (external)                                     │
//! │  ├── Request shape, auth, tenant scoping                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Structural checks on readings and stock entries                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL, UNIQUE, foreign key constraints                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is Deliberately NOT Checked
//! - `total_paise == cash + credit + upi + card` — the split identity is
//!   the caller's contract; the engines aggregate stored figures as-is.
//! - `current_reading >= previous_reading` — meters are monotonic under
//!   normal operation, but field corrections produce exceptions and the
//!   reconciliation clamp absorbs them.

use crate::error::ValidationError;
use crate::types::{NozzleReading, StockEntry};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use forecourt_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    required(field, id)?;

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a nozzle reading before it is persisted.
///
/// ## Rules
/// - Identifiers must be present
/// - Meter totals and the testing draw must be non-negative
/// - All five currency amounts must be non-negative
pub fn validate_reading(reading: &NozzleReading) -> ValidationResult<()> {
    required("outlet_id", &reading.outlet_id)?;
    required("nozzle_id", &reading.nozzle_id)?;
    required("attendant_id", &reading.attendant_id)?;

    non_negative("previous_reading_ml", reading.previous_reading_ml)?;
    non_negative("current_reading_ml", reading.current_reading_ml)?;
    if let Some(testing) = reading.testing_ml {
        non_negative("testing_ml", testing)?;
    }

    non_negative("cash_paise", reading.cash_paise)?;
    non_negative("credit_paise", reading.credit_paise)?;
    non_negative("upi_paise", reading.upi_paise)?;
    non_negative("card_paise", reading.card_paise)?;
    non_negative("total_paise", reading.total_paise)?;

    Ok(())
}

/// Validates a stock entry before it is persisted.
///
/// ## Rules
/// - Identifiers must be present
/// - Opening stock, receipt and invoice value must be non-negative
pub fn validate_stock_entry(entry: &StockEntry) -> ValidationResult<()> {
    required("tank_id", &entry.tank_id)?;
    required("outlet_id", &entry.outlet_id)?;
    required("manager_id", &entry.manager_id)?;

    non_negative("opening_stock_ml", entry.opening_stock_ml)?;
    non_negative("receipt_ml", entry.receipt_ml)?;
    non_negative("invoice_value_paise", entry.invoice_value_paise)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
