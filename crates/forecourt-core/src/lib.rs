//! # forecourt-core: Pure Business Logic for Forecourt
//!
//! This crate is the **heart** of Forecourt. It contains the stock
//! reconciliation and sales aggregation logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Forecourt Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          HTTP / Auth layer (external consumer)                  │   │
//! │  │    owner sessions, manager logins, JSON serialization           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 forecourt-db (Database Layer)                   │   │
//! │  │       SQLite repositories + engine services (I/O)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ forecourt-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │money/vol. │  │   stock   │  │   sales   │  │   │
//! │  │   │  Reading  │  │   Money   │  │ reconcile │  │ summaries │  │   │
//! │  │   │ StockEntry│  │  Volume   │  │   clamp   │  │   stats   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Tank, NozzleReading, StockEntry, Shift, views)
//! - [`money`] - Money type with integer paise arithmetic (no floating point!)
//! - [`volume`] - Volume type with integer millilitre arithmetic
//! - [`shift`] - Shift identity and lifecycle state machine
//! - [`stock`] - Stock reconciliation arithmetic
//! - [`sales`] - Shift-sales grouping, trailing stats, rate resolution
//! - [`error`] - Domain error types
//! - [`validation`] - Structural fact validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Units**: Paise for money, millilitres for volume - no float drift
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use forecourt_core::stock::reconcile;
//! use forecourt_core::volume::Volume;
//!
//! // A tank with no stock entries and no readings holds zero, not an error.
//! assert_eq!(reconcile(None, &[]), Volume::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod sales;
pub mod shift;
pub mod stock;
pub mod types;
pub mod validation;
pub mod volume;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use forecourt_core::Money` instead of
// `use forecourt_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use shift::{ShiftStatus, ShiftType};
pub use types::*;
pub use volume::Volume;
