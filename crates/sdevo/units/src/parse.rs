//! Unit-string parser.
//!
//! Accepts an optional leading magnitude followed by unit factors joined with
//! `*`, `·` or `/`, each with an optional integer `^` exponent:
//!
//! ```text
//! 1.0 m/s^2
//! kg*m/s^2
//! 3.5
//! ```

use crate::dimension::Dimension;
use crate::error::UnitError;
use crate::quantity::PhysicalQuantity;

/// Known unit symbols: SI scale factor and dimension exponents
/// `[length, mass, time, current, temperature, amount, luminosity]`.
const UNITS: &[(&str, f64, [i8; 7])] = &[
    ("1", 1.0, [0, 0, 0, 0, 0, 0, 0]),
    ("m", 1.0, [1, 0, 0, 0, 0, 0, 0]),
    ("km", 1.0e3, [1, 0, 0, 0, 0, 0, 0]),
    ("cm", 1.0e-2, [1, 0, 0, 0, 0, 0, 0]),
    ("mm", 1.0e-3, [1, 0, 0, 0, 0, 0, 0]),
    ("kg", 1.0, [0, 1, 0, 0, 0, 0, 0]),
    ("g", 1.0e-3, [0, 1, 0, 0, 0, 0, 0]),
    ("t", 1.0e3, [0, 1, 0, 0, 0, 0, 0]),
    ("s", 1.0, [0, 0, 1, 0, 0, 0, 0]),
    ("ms", 1.0e-3, [0, 0, 1, 0, 0, 0, 0]),
    ("min", 60.0, [0, 0, 1, 0, 0, 0, 0]),
    ("h", 3600.0, [0, 0, 1, 0, 0, 0, 0]),
    ("day", 86_400.0, [0, 0, 1, 0, 0, 0, 0]),
    ("A", 1.0, [0, 0, 0, 1, 0, 0, 0]),
    ("K", 1.0, [0, 0, 0, 0, 1, 0, 0]),
    ("mol", 1.0, [0, 0, 0, 0, 0, 1, 0]),
    ("cd", 1.0, [0, 0, 0, 0, 0, 0, 1]),
    ("Hz", 1.0, [0, 0, -1, 0, 0, 0, 0]),
    ("N", 1.0, [1, 1, -2, 0, 0, 0, 0]),
    ("J", 1.0, [2, 1, -2, 0, 0, 0, 0]),
    ("W", 1.0, [2, 1, -3, 0, 0, 0, 0]),
    ("Pa", 1.0, [-1, 1, -2, 0, 0, 0, 0]),
    ("C", 1.0, [0, 0, 1, 1, 0, 0, 0]),
    ("V", 1.0, [2, 1, -3, -1, 0, 0, 0]),
    ("L", 1.0e-3, [3, 0, 0, 0, 0, 0, 0]),
];

fn lookup(symbol: &str) -> Option<PhysicalQuantity> {
    UNITS
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, scale, exps)| PhysicalQuantity::new(*scale, Dimension::from_exponents(*exps)))
}

pub(crate) fn parse_quantity(input: &str) -> Result<PhysicalQuantity, UnitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(PhysicalQuantity::one());
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return Ok(PhysicalQuantity::new(value, Dimension::NONE));
    }

    let (magnitude, units) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => match head.parse::<f64>() {
            Ok(value) => (value, rest.trim()),
            Err(_) => (1.0, trimmed),
        },
        None => (1.0, trimmed),
    };

    let unit = parse_unit_expression(units, input)?;
    Ok(PhysicalQuantity::new(
        magnitude * unit.magnitude,
        unit.dimension,
    ))
}

fn parse_unit_expression(expr: &str, input: &str) -> Result<PhysicalQuantity, UnitError> {
    let malformed = |message: &str| UnitError::Malformed {
        input: input.to_string(),
        message: message.to_string(),
    };

    let mut result = PhysicalQuantity::one();
    let mut dividing = false;
    let mut factor = String::new();

    let mut apply = |factor: &str, dividing: bool| -> Result<(), UnitError> {
        let factor = factor.trim();
        if factor.is_empty() {
            return Err(malformed("empty unit factor"));
        }
        let unit = parse_factor(factor, input)?;
        result = if dividing {
            result.divide(&unit)?
        } else {
            result.times(&unit)?
        };
        Ok(())
    };

    for ch in expr.chars() {
        match ch {
            '*' | '·' | '/' => {
                apply(&factor, dividing)?;
                factor.clear();
                dividing = ch == '/';
            }
            _ => factor.push(ch),
        }
    }
    apply(&factor, dividing)?;

    Ok(result)
}

fn parse_factor(factor: &str, input: &str) -> Result<PhysicalQuantity, UnitError> {
    let (symbol, power) = match factor.split_once('^') {
        Some((symbol, exp)) => {
            let power = exp.trim().parse::<i8>().map_err(|_| UnitError::Malformed {
                input: input.to_string(),
                message: format!("bad exponent '{exp}'"),
            })?;
            (symbol.trim(), power)
        }
        None => (factor, 1),
    };

    let unit = lookup(symbol).ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))?;
    let dimension = unit.dimension.checked_powi(power).ok_or_else(|| UnitError::Malformed {
        input: input.to_string(),
        message: format!("exponent {power} of '{symbol}' is out of range"),
    })?;
    Ok(PhysicalQuantity::new(unit.magnitude.powi(power as i32), dimension))
}
