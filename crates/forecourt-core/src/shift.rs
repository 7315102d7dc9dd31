//! # Shift Module
//!
//! Shift identity and lifecycle for fuel-retail work periods.
//!
//! ## The Shift Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A calendar day has three fixed work periods:                           │
//! │                                                                         │
//! │    morning  06:00 ──► 14:00                                             │
//! │    evening  14:00 ──► 22:00                                             │
//! │    night    22:00 ──► 06:00 (next day)                                  │
//! │                                                                         │
//! │  Every fact (reading, stock entry, shift record) is tagged with         │
//! │  (shift_type, shift_date). shift_date is a plain calendar date —        │
//! │  all facts for one physical shift share it exactly, and date-range      │
//! │  filters compare dates, never timestamps.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! A shift record (one per manager, shift type and date) moves through a
//! monotonic state machine:
//!
//! ```text
//!    not-started ──► active ──► completed ──► submitted
//! ```
//!
//! Transitions only move forward. A submitted shift is immutable.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Shift Type
// =============================================================================

/// One of the three fixed daily work periods.
///
/// The derive order (`Morning < Evening < Night`) is the display order used
/// when summaries share a shift date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Evening,
    Night,
}

impl ShiftType {
    /// Nominal display window for this shift type on the given date.
    ///
    /// These timestamps are synthesized for presentation only — nothing is
    /// stored against them and no filtering uses them. The night window
    /// crosses midnight into the following day.
    pub fn nominal_window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let at = |d: NaiveDate, h: u32| {
            d.and_time(NaiveTime::from_hms_opt(h, 0, 0).expect("static hour"))
        };
        match self {
            ShiftType::Morning => (at(date, 6), at(date, 14)),
            ShiftType::Evening => (at(date, 14), at(date, 22)),
            ShiftType::Night => (at(date, 22), at(date + chrono::Days::new(1), 6)),
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftType::Morning => "morning",
            ShiftType::Evening => "evening",
            ShiftType::Night => "night",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Shift Status
// =============================================================================

/// Lifecycle status of a manager's shift record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftStatus {
    /// Record exists but the shift has not begun.
    NotStarted,
    /// Shift in progress; readings and stock entries are being recorded.
    Active,
    /// Work period over, figures still open for correction.
    Completed,
    /// Figures signed off. Terminal state.
    Submitted,
}

impl ShiftStatus {
    /// Checks whether a transition from `self` to `next` is allowed.
    ///
    /// The lifecycle is strictly monotonic and single-step:
    /// `not-started → active → completed → submitted`. Skipping a step or
    /// moving backwards is rejected.
    pub fn can_transition_to(&self, next: ShiftStatus) -> bool {
        matches!(
            (self, next),
            (ShiftStatus::NotStarted, ShiftStatus::Active)
                | (ShiftStatus::Active, ShiftStatus::Completed)
                | (ShiftStatus::Completed, ShiftStatus::Submitted)
        )
    }

    /// True for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShiftStatus::Submitted)
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::NotStarted
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftStatus::NotStarted => "not-started",
            ShiftStatus::Active => "active",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Submitted => "submitted",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
