//! # Repository Pattern
//!
//! Data access layer for Forecourt.
//!
//! ## Design
//! Each repository owns the SQL for one table family and returns domain
//! types from `forecourt-core`. Validation runs before any insert; derived
//! values (current stock, sales summaries) are never written here — the
//! engine services in [`crate::engine`] compute those on read.
//!
//! ## Repositories
//! - [`outlet::OutletRepository`] - Outlets, products, staff, dispensing units
//! - [`tank::TankRepository`] - Tanks and nozzles
//! - [`stock_entry::StockEntryRepository`] - Opening stock / receipt facts
//! - [`reading::ReadingRepository`] - Nozzle meter readings
//! - [`shift::ShiftRepository`] - Shift lifecycle and product rates

pub mod outlet;
pub mod reading;
pub mod shift;
pub mod stock_entry;
pub mod tank;
