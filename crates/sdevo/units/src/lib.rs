#![deny(unsafe_code)]
//! # sdevo-units
//!
//! Dimensional quantities over the seven SI base dimensions.
//!
//! Equation growth uses these to decide whether two sub-expressions may be
//! added (same dimension), must be multiplied in (dimensionless), or must be
//! discarded.

pub mod dimension;
pub mod error;
pub mod parse;
pub mod quantity;

pub use dimension::{BaseDimension, Dimension};
pub use error::UnitError;
pub use quantity::PhysicalQuantity;
