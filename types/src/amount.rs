//! Currency amounts.
//!
//! Amounts are signed integers in atoms, the smallest currency unit.
//! Conversions from floating-point coin values round to the nearest atom.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::VspError;

/// Atoms in one coin.
pub const ATOMS_PER_COIN: i64 = 100_000_000;

/// Largest amount representable in coins (21 million coins).
pub const MAX_AMOUNT: i64 = 21_000_000 * ATOMS_PER_COIN;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn from_atoms(atoms: i64) -> Self {
        Self(atoms)
    }

    /// Convert a coin value to an amount, rejecting NaN, infinities,
    /// negatives and values beyond the money supply.
    pub fn from_coins(coins: f64) -> Result<Self, VspError> {
        if !coins.is_finite() {
            return Err(VspError::InvalidAmount(format!("{coins} is not finite")));
        }
        if coins < 0.0 {
            return Err(VspError::InvalidAmount(format!("{coins} is negative")));
        }
        let atoms = (coins * ATOMS_PER_COIN as f64).round();
        if atoms > MAX_AMOUNT as f64 {
            return Err(VspError::InvalidAmount(format!(
                "{coins} exceeds the maximum amount"
            )));
        }
        Ok(Self(atoms as i64))
    }

    pub fn atoms(&self) -> i64 {
        self.0
    }

    pub fn to_coins(&self) -> f64 {
        self.0 as f64 / ATOMS_PER_COIN as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = ATOMS_PER_COIN as u64;
        write!(f, "{sign}{}.{:08} DCR", abs / unit, abs % unit)
    }
}
