//! # Domain Types
//!
//! Core domain types used throughout Forecourt.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Facts (append-mostly, tenant-scoped)                                   │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐         │
//! │  │  NozzleReading  │  │   StockEntry    │  │     Shift       │         │
//! │  │  ─────────────  │  │  ─────────────  │  │  ─────────────  │         │
//! │  │  meter deltas   │  │  opening stock  │  │  rates + status │         │
//! │  │  payment split  │  │  receipt volume │  │  per manager    │         │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘         │
//! │                                                                         │
//! │  Reference                       Derived views (never persisted)        │
//! │  ┌──────────┐ ┌──────────┐      ┌───────────┐ ┌───────────────────┐    │
//! │  │   Tank   │ │  Nozzle  │      │ TankStock │ │ ShiftSalesSummary │    │
//! │  └──────────┘ └──────────┘      └───────────┘ │    SalesStats     │    │
//! │                                               └───────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one direction: facts → engines → derived views. The engines
//! never write back to the fact types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::shift::{ShiftStatus, ShiftType};
use crate::volume::Volume;

// =============================================================================
// Tank
// =============================================================================

/// An underground fuel tank at one retail outlet.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Tank {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Outlet this tank belongs to (tenant boundary).
    pub outlet_id: String,

    /// Fuel product stored in this tank.
    pub product_id: String,

    /// Display name, e.g. "Tank 1 - Diesel".
    pub name: String,

    /// Physical capacity in millilitres.
    pub capacity_ml: i64,

    /// Tank length in millimetres.
    pub length_mm: i64,

    /// Tank diameter in millimetres.
    pub diameter_mm: i64,

    /// Whether tank is in service (soft delete).
    pub is_active: bool,

    /// When the tank was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the tank was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Tank {
    /// Returns the physical capacity as a Volume.
    #[inline]
    pub fn capacity(&self) -> Volume {
        Volume::from_millilitres(self.capacity_ml)
    }
}

// =============================================================================
// Nozzle
// =============================================================================

/// A dispensing nozzle. Draws from exactly one tank.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Nozzle {
    pub id: String,

    /// Dispensing unit (pump) this nozzle is mounted on.
    pub dispensing_unit_id: String,

    /// Tank this nozzle dispenses from.
    pub tank_id: String,

    /// Nozzle number, unique within its dispensing unit.
    pub nozzle_number: i64,

    /// Calibration certificate validity.
    #[ts(as = "String")]
    pub calibration_valid_until: DateTime<Utc>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Nozzle Reading
// =============================================================================

/// One attendant's meter-delta record for one nozzle for one shift.
///
/// ## Contract
/// `total_paise` is expected to equal the sum of the four payment-method
/// amounts, but that identity is the **caller's** responsibility. The
/// engines aggregate the stored figures as-is and never recompute or
/// validate the split.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct NozzleReading {
    pub id: String,

    /// Outlet this reading belongs to (tenant boundary).
    pub outlet_id: String,

    /// Nozzle the meters were read from.
    pub nozzle_id: String,

    /// Staff member who worked the nozzle.
    pub attendant_id: String,

    /// Work period this reading covers.
    pub shift_type: ShiftType,

    /// Calendar date identifying the shift.
    #[ts(as = "String")]
    pub shift_date: NaiveDate,

    /// Cumulative meter total at shift start, in millilitres.
    pub previous_reading_ml: i64,

    /// Cumulative meter total at shift end, in millilitres.
    pub current_reading_ml: i64,

    /// Volume drawn for calibration/testing, excluded from sales.
    /// Absent means no testing draw this shift.
    pub testing_ml: Option<i64>,

    /// Cash sales in paise.
    pub cash_paise: i64,

    /// Credit (account) sales in paise.
    pub credit_paise: i64,

    /// UPI sales in paise.
    pub upi_paise: i64,

    /// Card sales in paise.
    pub card_paise: i64,

    /// Total sales in paise (caller-maintained, see contract above).
    pub total_paise: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl NozzleReading {
    /// Fuel actually sold through this nozzle for this shift:
    /// meter delta minus the testing draw (missing testing counts as zero).
    #[inline]
    pub fn dispensed(&self) -> Volume {
        Volume::from_millilitres(
            self.current_reading_ml - self.previous_reading_ml - self.testing_ml.unwrap_or(0),
        )
    }

    /// Returns the total sale amount as Money.
    #[inline]
    pub fn total_sale(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Stock Entry
// =============================================================================

/// One manager's record of opening volume and fuel received for one tank
/// for one shift. At most one per tank per shift; the latest entry (by
/// shift date, then creation time) anchors stock reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockEntry {
    pub id: String,

    /// Tank the entry describes.
    pub tank_id: String,

    /// Outlet this entry belongs to (tenant boundary).
    pub outlet_id: String,

    /// Manager who recorded the entry.
    pub manager_id: String,

    pub shift_type: ShiftType,

    /// Calendar date identifying the shift.
    #[ts(as = "String")]
    pub shift_date: NaiveDate,

    /// Book stock at the start of the shift, in millilitres.
    pub opening_stock_ml: i64,

    /// Fuel delivered during the shift, in millilitres.
    pub receipt_ml: i64,

    /// Invoice value of the delivery, in paise.
    pub invoice_value_paise: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockEntry {
    /// Returns the opening stock as a Volume.
    #[inline]
    pub fn opening_stock(&self) -> Volume {
        Volume::from_millilitres(self.opening_stock_ml)
    }

    /// Returns the receipt volume as a Volume.
    #[inline]
    pub fn receipt(&self) -> Volume {
        Volume::from_millilitres(self.receipt_ml)
    }

    /// Book stock available before deducting dispensed volume.
    #[inline]
    pub fn available(&self) -> Volume {
        self.opening_stock() + self.receipt()
    }
}

// =============================================================================
// Product Rate
// =============================================================================

/// One product's selling rate for a shift, with optional observed
/// density/temperature. Stored as a JSON list on the shift record and
/// carried through unchanged — no physics is modelled on the observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRate {
    pub product_id: String,

    /// Selling rate in paise per litre.
    pub rate_paise: i64,

    /// Observed density, if measured.
    pub density: Option<f64>,

    /// Observed temperature, if measured.
    pub temperature: Option<f64>,
}

impl ProductRate {
    /// Returns the rate as Money (per litre).
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_paise(self.rate_paise)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// A manager's shift record: one row per `(manager, shift_type, shift_date)`,
/// holding the product rates entered for that shift and its lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Shift {
    pub id: String,

    /// Manager the record belongs to.
    pub manager_id: String,

    pub shift_type: ShiftType,

    #[ts(as = "String")]
    pub shift_date: NaiveDate,

    pub status: ShiftStatus,

    /// Product rates entered for this shift.
    pub product_rates: Vec<ProductRate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Derived Views
// =============================================================================

/// A tank decorated with its reconciled current stock. Read-path view,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TankStock {
    pub tank: Tank,

    /// Reconciled stock in millilitres, floored at zero.
    pub current_stock_ml: i64,

    /// Date the reconciliation was evaluated against.
    #[ts(as = "String")]
    pub as_of: NaiveDate,
}

impl TankStock {
    /// Returns the reconciled stock as a Volume.
    #[inline]
    pub fn current_stock(&self) -> Volume {
        Volume::from_millilitres(self.current_stock_ml)
    }
}

/// Aggregated sales for one `(shift_date, shift_type, attendant)` group.
/// Synthesized from nozzle readings on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftSalesSummary {
    #[ts(as = "String")]
    pub shift_date: NaiveDate,

    pub shift_type: ShiftType,

    pub attendant_id: String,

    /// Attendant display name, resolved in one batch lookup.
    pub attendant_name: Option<String>,

    pub cash_paise: i64,
    pub credit_paise: i64,
    pub upi_paise: i64,
    pub card_paise: i64,
    pub total_paise: i64,

    /// Nominal window start, display only.
    #[ts(as = "String")]
    pub starts_at: NaiveDateTime,

    /// Nominal window end, display only.
    #[ts(as = "String")]
    pub ends_at: NaiveDateTime,
}

impl ShiftSalesSummary {
    /// Returns the summed total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

/// Payment-method totals over a trailing window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentBreakdown {
    pub cash_paise: i64,
    pub credit_paise: i64,
    pub upi_paise: i64,
    pub card_paise: i64,
}

/// Headline sales aggregates for one outlet. All figures default to zero
/// when the outlet has no matching records — absence of data is a valid
/// zero-state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesStats {
    /// Total sales across the trailing 7 days, in paise.
    pub weekly_sales_paise: i64,

    /// Total sales across the trailing calendar month, in paise.
    pub monthly_sales_paise: i64,

    /// Payment-method split over the same monthly window.
    pub breakdown: PaymentBreakdown,
}

// =============================================================================
// Unit Tests
// =============================================================================
