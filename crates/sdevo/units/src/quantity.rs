//! Physical quantities: an SI magnitude with a dimension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dimension::Dimension;
use crate::error::UnitError;

/// A magnitude expressed in SI base units together with its dimension.
///
/// Addition and subtraction require compatible dimensions. Multiplication and
/// division fail only when an exponent leaves the `i8` range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalQuantity {
    pub magnitude: f64,
    pub dimension: Dimension,
}

impl Default for PhysicalQuantity {
    fn default() -> Self {
        Self::one()
    }
}

impl PhysicalQuantity {
    pub fn new(magnitude: f64, dimension: Dimension) -> Self {
        Self {
            magnitude,
            dimension,
        }
    }

    /// The dimensionless identity, `1`.
    pub fn one() -> Self {
        Self::new(1.0, Dimension::NONE)
    }

    /// Parse a quantity such as `"1.0 m/s^2"`, `"kg*m/s^2"` or `"5"`.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        crate::parse::parse_quantity(input)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn is_compatible(&self, other: &PhysicalQuantity) -> bool {
        self.dimension == other.dimension
    }

    pub fn plus(&self, other: &PhysicalQuantity) -> Result<PhysicalQuantity, UnitError> {
        self.check_compatible(other)?;
        Ok(Self::new(self.magnitude + other.magnitude, self.dimension))
    }

    pub fn minus(&self, other: &PhysicalQuantity) -> Result<PhysicalQuantity, UnitError> {
        self.check_compatible(other)?;
        Ok(Self::new(self.magnitude - other.magnitude, self.dimension))
    }

    pub fn times(&self, other: &PhysicalQuantity) -> Result<PhysicalQuantity, UnitError> {
        let dimension = self
            .dimension
            .checked_mul(other.dimension)
            .ok_or_else(|| self.overflow(other))?;
        Ok(Self::new(self.magnitude * other.magnitude, dimension))
    }

    pub fn divide(&self, other: &PhysicalQuantity) -> Result<PhysicalQuantity, UnitError> {
        let dimension = self
            .dimension
            .checked_div(other.dimension)
            .ok_or_else(|| self.overflow(other))?;
        Ok(Self::new(self.magnitude / other.magnitude, dimension))
    }

    fn overflow(&self, other: &PhysicalQuantity) -> UnitError {
        UnitError::ExponentOverflow {
            left: self.dimension.to_string(),
            right: other.dimension.to_string(),
        }
    }

    fn check_compatible(&self, other: &PhysicalQuantity) -> Result<(), UnitError> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(UnitError::Incompatible {
                left: self.dimension.to_string(),
                right: other.dimension.to_string(),
            })
        }
    }
}

impl FromStr for PhysicalQuantity {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PhysicalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.dimension)
        }
    }
}
