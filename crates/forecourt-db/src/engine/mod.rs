//! # Engine Services
//!
//! Read-path services that fetch facts through the repositories and hand
//! them to the pure computation in `forecourt-core`. Nothing here writes:
//! current stock and sales figures are synthesized on every call, never
//! persisted.
//!
//! ## Services
//! - [`stock::StockEngine`] - Tank stock reconciliation
//! - [`sales::SalesEngine`] - Shift sales summaries, trailing statistics,
//!   product-rate resolution

pub mod sales;
pub mod stock;
