//! Monetary amounts in integer minor units.
//!
//! All booking and settlement amounts are carried as i64 minor units
//! (e.g. cents). Arithmetic never goes through floating point; the fee
//! split is computed with integer basis-point math so that
//! `fee + owner_amount == gross` always holds exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Basis points per whole unit (100%).
pub const BPS_DENOMINATOR: i64 = 10_000;

/// A monetary amount in minor units of a single implicit currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from minor units.
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// True if the amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Computes the platform fee for this gross amount at the given rate.
    ///
    /// The fee is `gross * fee_bps / 10_000`, truncated toward zero, so
    /// rounding always favours the owner side of the split. The
    /// intermediate product is widened to i128; for rates up to 100%
    /// the quotient always fits back into i64.
    pub fn fee_at_bps(&self, fee_bps: u32) -> Money {
        let fee = i128::from(self.0) * i128::from(fee_bps) / i128::from(BPS_DENOMINATOR);
        Money(fee as i64)
    }

    /// Splits this gross amount into `(fee, owner_amount)` at the given rate.
    ///
    /// The two parts always sum back to the gross amount.
    pub fn split_at_bps(&self, fee_bps: u32) -> (Money, Money) {
        let fee = self.fee_at_bps(fee_bps);
        (fee, Money(self.0 - fee.0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
