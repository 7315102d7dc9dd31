//! # Sales Aggregation
//!
//! Pure arithmetic for shift-sales summaries, trailing sales statistics,
//! and product-rate resolution.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NozzleReading facts (one per nozzle per attendant per shift)           │
//! │       │                                                                 │
//! │       ▼  group by (shift_date, shift_type, attendant)                   │
//! │  ShiftSalesSummary (synthesized on every read)                          │
//! │       │                                                                 │
//! │       ▼  trailing 7-day / 1-month windows                               │
//! │  SalesStats (weekly, monthly, payment breakdown)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every sum is integer paise: a group total is exactly the sum of its
//! readings' stored amounts, with no rounding drift however many times the
//! aggregation is recomputed.

use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};

use crate::money::Money;
use crate::shift::ShiftType;
use crate::types::{NozzleReading, PaymentBreakdown, ProductRate, SalesStats, Shift, ShiftSalesSummary};

/// Default number of shift-sales groups returned by a summary listing.
pub const DEFAULT_SUMMARY_LIMIT: usize = 10;

// =============================================================================
// Shift Sales Grouping
// =============================================================================

/// Groups readings by `(shift_date, shift_type, attendant)` and sums the
/// four payment-method fields and the total independently.
///
/// Every reading lands in exactly one group, so the group totals partition
/// the underlying amounts — nothing double-counted, nothing dropped.
/// Output is ordered by `shift_date` descending, then shift type, then
/// attendant for a stable tie-break.
///
/// Attendant names are left unresolved (`None`); the database layer
/// decorates them with one batch lookup.
pub fn group_shift_sales(readings: &[NozzleReading]) -> Vec<ShiftSalesSummary> {
    #[derive(Default)]
    struct Acc {
        cash: Money,
        credit: Money,
        upi: Money,
        card: Money,
        total: Money,
    }

    let mut groups: BTreeMap<(NaiveDate, ShiftType, String), Acc> = BTreeMap::new();

    for r in readings {
        let acc = groups
            .entry((r.shift_date, r.shift_type, r.attendant_id.clone()))
            .or_default();
        acc.cash += Money::from_paise(r.cash_paise);
        acc.credit += Money::from_paise(r.credit_paise);
        acc.upi += Money::from_paise(r.upi_paise);
        acc.card += Money::from_paise(r.card_paise);
        acc.total += Money::from_paise(r.total_paise);
    }

    let mut summaries: Vec<ShiftSalesSummary> = groups
        .into_iter()
        .map(|((shift_date, shift_type, attendant_id), acc)| {
            let (starts_at, ends_at) = shift_type.nominal_window(shift_date);
            ShiftSalesSummary {
                shift_date,
                shift_type,
                attendant_id,
                attendant_name: None,
                cash_paise: acc.cash.paise(),
                credit_paise: acc.credit.paise(),
                upi_paise: acc.upi.paise(),
                card_paise: acc.card.paise(),
                total_paise: acc.total.paise(),
                starts_at,
                ends_at,
            }
        })
        .collect();

    // BTreeMap iteration is date-ascending; listings want newest first.
    summaries.sort_by(|a, b| {
        b.shift_date
            .cmp(&a.shift_date)
            .then(a.shift_type.cmp(&b.shift_type))
            .then(a.attendant_id.cmp(&b.attendant_id))
    });

    summaries
}

/// Groups readings and truncates to the `limit` most recent groups.
pub fn summarize_shift_sales(readings: &[NozzleReading], limit: usize) -> Vec<ShiftSalesSummary> {
    let mut summaries = group_shift_sales(readings);
    summaries.truncate(limit);
    summaries
}

// =============================================================================
// Trailing Sales Statistics
// =============================================================================

/// First date inside the trailing 7-day window ending at `today`.
pub fn weekly_cutoff(today: NaiveDate) -> NaiveDate {
    today - Days::new(7)
}

/// First date inside the trailing calendar-month window ending at `today`.
/// Clamps at short month ends (Mar 31 → Feb 28/29).
pub fn monthly_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(1))
        .unwrap_or(today - Days::new(30))
}

/// Computes headline aggregates over shift-sales records.
///
/// - `weekly_sales`: sum of group totals with `shift_date >= today − 7d`
/// - `monthly_sales`: same with `shift_date >= today − 1 month`
/// - `breakdown`: per-payment-method sums over the monthly window
///   (the monthly window, not the weekly one)
///
/// All figures are zero when nothing matches.
///
/// `today` is a parameter so the windows are deterministic under test; the
/// database layer passes the current date.
pub fn compute_sales_stats(summaries: &[ShiftSalesSummary], today: NaiveDate) -> SalesStats {
    let weekly_from = weekly_cutoff(today);
    let monthly_from = monthly_cutoff(today);

    let mut stats = SalesStats::default();
    let mut weekly = Money::zero();
    let mut monthly = Money::zero();
    let mut breakdown = (Money::zero(), Money::zero(), Money::zero(), Money::zero());

    for s in summaries {
        if s.shift_date >= weekly_from {
            weekly += s.total();
        }
        if s.shift_date >= monthly_from {
            monthly += s.total();
            breakdown.0 += Money::from_paise(s.cash_paise);
            breakdown.1 += Money::from_paise(s.credit_paise);
            breakdown.2 += Money::from_paise(s.upi_paise);
            breakdown.3 += Money::from_paise(s.card_paise);
        }
    }

    stats.weekly_sales_paise = weekly.paise();
    stats.monthly_sales_paise = monthly.paise();
    stats.breakdown = PaymentBreakdown {
        cash_paise: breakdown.0.paise(),
        credit_paise: breakdown.1.paise(),
        upi_paise: breakdown.2.paise(),
        card_paise: breakdown.3.paise(),
    };
    stats
}

// =============================================================================
// Product Rate Resolution
// =============================================================================

/// Resolves the product rates a manager should see when opening a shift.
///
/// Three-tier fallback, first non-empty rate list wins:
///
/// ```text
/// 1. Exact: shift_type matches AND the creation timestamp's date portion
///    equals target_date              (both filters given)
/// 2. Most recently updated shift of the matching shift_type, any date
/// 3. Most recently updated shift of any type
/// ```
///
/// Candidates within a tier are considered most-recently-updated first.
/// Returns an empty list when the manager has no shifts with rates at all.
///
/// The dual date-based/date-less tiers are a compatibility contract with
/// existing clients — keep the order exactly.
pub fn resolve_product_rates(
    shifts: &[Shift],
    target_date: Option<NaiveDate>,
    target_shift_type: Option<ShiftType>,
) -> Vec<ProductRate> {
    // Most recently updated first; every tier scans in this order.
    let mut ordered: Vec<&Shift> = shifts.iter().collect();
    ordered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    // Tier 1: exact date + type match on the creation timestamp's date.
    if let (Some(date), Some(shift_type)) = (target_date, target_shift_type) {
        let exact = ordered.iter().find(|s| {
            s.shift_type == shift_type
                && s.created_at.date_naive() == date
                && !s.product_rates.is_empty()
        });
        if let Some(shift) = exact {
            return shift.product_rates.clone();
        }
    }

    // Tier 2: latest shift of the requested type, regardless of date.
    if let Some(shift_type) = target_shift_type {
        let same_type = ordered
            .iter()
            .find(|s| s.shift_type == shift_type && !s.product_rates.is_empty());
        if let Some(shift) = same_type {
            return shift.product_rates.clone();
        }
    }

    // Tier 3: latest shift of any type.
    ordered
        .iter()
        .find(|s| !s.product_rates.is_empty())
        .map(|s| s.product_rates.clone())
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================
