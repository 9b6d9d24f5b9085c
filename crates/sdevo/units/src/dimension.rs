//! Dimension exponents over the SI base quantities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven SI base dimensions, in exponent-vector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    Luminosity,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        Self::Length,
        Self::Mass,
        Self::Time,
        Self::Current,
        Self::Temperature,
        Self::Amount,
        Self::Luminosity,
    ];

    /// SI base unit symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Length => "m",
            Self::Mass => "kg",
            Self::Time => "s",
            Self::Current => "A",
            Self::Temperature => "K",
            Self::Amount => "mol",
            Self::Luminosity => "cd",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Integer exponents of each base dimension.
///
/// `Dimension::NONE` is the dimensionless identity; multiplication adds
/// exponents, division subtracts them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension([i8; 7]);

impl Dimension {
    pub const NONE: Dimension = Dimension([0; 7]);

    pub const fn from_exponents(exponents: [i8; 7]) -> Self {
        Self(exponents)
    }

    /// A single base dimension raised to the first power.
    pub fn base(base: BaseDimension) -> Self {
        let mut exponents = [0; 7];
        exponents[base.index()] = 1;
        Self(exponents)
    }

    pub fn exponent(&self, base: BaseDimension) -> i8 {
        self.0[base.index()]
    }

    pub fn exponents(&self) -> [i8; 7] {
        self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| *e == 0)
    }

    /// Raise to an integer power, or `None` when an exponent leaves the
    /// `i8` range.
    pub fn checked_powi(self, power: i8) -> Option<Self> {
        self.combine(Self([power; 7]), i8::checked_mul)
    }

    /// Exponents added; `None` on overflow.
    pub fn checked_mul(self, rhs: Dimension) -> Option<Self> {
        self.combine(rhs, i8::checked_add)
    }

    /// Exponents subtracted; `None` on overflow.
    pub fn checked_div(self, rhs: Dimension) -> Option<Self> {
        self.combine(rhs, i8::checked_sub)
    }

    fn combine(self, rhs: Dimension, op: fn(i8, i8) -> Option<i8>) -> Option<Self> {
        let mut exponents = self.0;
        for (e, r) in exponents.iter_mut().zip(rhs.0) {
            *e = op(*e, r)?;
        }
        Some(Self(exponents))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let mut first = true;
        for base in BaseDimension::ALL {
            let e = self.exponent(base);
            if e == 0 {
                continue;
            }
            if !first {
                write!(f, "*")?;
            }
            first = false;
            if e == 1 {
                write!(f, "{}", base.symbol())?;
            } else {
                write!(f, "{}^{}", base.symbol(), e)?;
            }
        }
        Ok(())
    }
}
