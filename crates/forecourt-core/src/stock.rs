//! # Stock Reconciliation
//!
//! Pure arithmetic for deriving a tank's current stock from its stock
//! entries and nozzle readings.
//!
//! ## The Reconciliation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Stock entries (one per tank per shift)                                 │
//! │    2024-01-01  opening 1000 L  receipt 500 L   ◄── latest entry         │
//! │    2023-12-28  opening  900 L  receipt   0 L       (anchor)             │
//! │                                                                         │
//! │  Nozzle readings with shift_date >= 2024-01-01 (INCLUSIVE)              │
//! │    2024-01-01  dispensed 200 L                                          │
//! │    2024-01-02  dispensed 100 L                                          │
//! │                                                                         │
//! │  current = max(0, 1000 + 500 − 300) = 1200 L                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Inclusive Boundary
//! Readings dated exactly on the anchor entry's `shift_date` ARE deducted.
//! A stock entry records the start-of-day state and that day's readings
//! record consumption during the day, so both apply. Changing this to an
//! exclusive filter would silently shift every tank's book stock — keep it.
//!
//! This module is pure: the database layer fetches the facts and the
//! functions here only compute. Same inputs, same output, every time.

use chrono::NaiveDate;

use crate::types::{NozzleReading, StockEntry};
use crate::volume::Volume;

/// Selects the stock entry that anchors reconciliation: greatest
/// `shift_date`, ties broken by latest `created_at`.
///
/// Returns `None` when the tank has never had a stock entry — a valid
/// zero-state, not an error.
pub fn select_latest_entry(entries: &[StockEntry]) -> Option<&StockEntry> {
    entries.iter().max_by(|a, b| {
        a.shift_date
            .cmp(&b.shift_date)
            .then(a.created_at.cmp(&b.created_at))
    })
}

/// The date bounding the reading query: the anchor entry's shift date, or
/// `as_of` when no entry exists yet.
pub fn cutoff_date(entry: Option<&StockEntry>, as_of: NaiveDate) -> NaiveDate {
    entry.map(|e| e.shift_date).unwrap_or(as_of)
}

/// Sums dispensed volume over a set of readings.
///
/// Each reading contributes `current − previous − testing`, with a missing
/// testing draw counting as zero. Negative deltas (meter rollback, data
/// entry error) are summed as-is; the final clamp in [`reconcile`] is the
/// only floor.
pub fn dispensed_total(readings: &[NozzleReading]) -> Volume {
    readings.iter().map(NozzleReading::dispensed).sum()
}

/// Derives current stock from the anchor entry and the readings dated on
/// or after its shift date.
///
/// `max(0, opening + receipt − dispensed)`. With no anchor entry, opening
/// and receipt are zero, so the result is zero unless the readings
/// themselves sum negative (also clamped).
///
/// ## Example
/// ```rust
/// use forecourt_core::stock::reconcile;
///
/// // No entry, no readings: empty tank, not an error.
/// assert!(reconcile(None, &[]).is_zero());
/// ```
pub fn reconcile(entry: Option<&StockEntry>, readings: &[NozzleReading]) -> Volume {
    let available = entry.map(StockEntry::available).unwrap_or_default();
    (available - dispensed_total(readings)).clamp_non_negative()
}

// =============================================================================
// Unit Tests
// =============================================================================
