//! # Volume Module
//!
//! Provides the `Volume` type for fuel quantities.
//!
//! ## Why Integer Volume?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Meter totalizers report litres with three decimal places.              │
//! │  Stock reconciliation subtracts a long chain of meter deltas from       │
//! │  one opening figure, so the same float-drift argument that applies      │
//! │  to Money applies here.                                                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Millilitres                                      │
//! │    1 L = 1000 ml. 1,234.567 L = 1_234_567 ml.                           │
//! │    A 30 kL tank is 30_000_000 ml — nowhere near i64 limits.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forecourt_core::volume::Volume;
//!
//! let opening = Volume::from_litres(1000);
//! let receipt = Volume::from_litres(500);
//! let dispensed = Volume::from_litres(300);
//!
//! let current = (opening + receipt - dispensed).clamp_non_negative();
//! assert_eq!(current.litres(), 1200);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Volume Type
// =============================================================================

/// A fuel volume in millilitres.
///
/// ## Design Decisions
/// - **i64 (signed)**: Intermediate reconciliation results may go negative
///   (dispensed exceeding book stock); the caller decides where to clamp
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Volume(i64);

impl Volume {
    /// Creates a Volume from millilitres.
    #[inline]
    pub const fn from_millilitres(ml: i64) -> Self {
        Volume(ml)
    }

    /// Creates a Volume from whole litres.
    ///
    /// ## Example
    /// ```rust
    /// use forecourt_core::volume::Volume;
    ///
    /// assert_eq!(Volume::from_litres(5).millilitres(), 5000);
    /// ```
    #[inline]
    pub const fn from_litres(litres: i64) -> Self {
        Volume(litres * 1000)
    }

    /// Returns the value in millilitres.
    #[inline]
    pub const fn millilitres(&self) -> i64 {
        self.0
    }

    /// Returns the whole-litre portion.
    #[inline]
    pub const fn litres(&self) -> i64 {
        self.0 / 1000
    }

    /// Zero volume.
    #[inline]
    pub const fn zero() -> Self {
        Volume(0)
    }

    /// Checks if the volume is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the volume is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the volume at zero.
    ///
    /// Reconciled stock is reported as `max(0, book stock − dispensed)`;
    /// a tank is never reported with negative contents even when the
    /// readings disagree with the last stock entry.
    ///
    /// ## Example
    /// ```rust
    /// use forecourt_core::volume::Volume;
    ///
    /// assert_eq!(Volume::from_litres(-500).clamp_non_negative(), Volume::zero());
    /// assert_eq!(Volume::from_litres(7).clamp_non_negative().litres(), 7);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Volume(0)
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display in litres with millilitre precision, for logs and debugging.
impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:03} L", sign, (self.0 / 1000).abs(), (self.0 % 1000).abs())
    }
}

/// Default volume is zero.
impl Default for Volume {
    fn default() -> Self {
        Volume::zero()
    }
}

impl Add for Volume {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Volume(self.0 + other.0)
    }
}

impl AddAssign for Volume {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Volume {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Volume(self.0 - other.0)
    }
}

impl SubAssign for Volume {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Exact summation over iterators of Volume (dispensed-volume totals).
impl Sum for Volume {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Volume::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Volume> for Volume {
    fn sum<I: Iterator<Item = &'a Volume>>(iter: I) -> Self {
        iter.fold(Volume::zero(), |acc, v| acc + *v)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
