//! Helper functions available to every formulation.
//!
//! The upper-case helpers are the fixed base contract that synthesized
//! equations are written against. The lower-case names mirror the usual math
//! library so hand-written equations can use them directly.

/// How a builtin takes its arguments
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signature {
    /// A fixed number of numeric arguments
    Fixed(usize),
    /// A numeric argument followed by a breakpoint table
    Table,
}

/// A callable helper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Arccos,
    Arcsin,
    Arctan,
    Cos,
    Sin,
    Tan,
    Exp,
    Log,
    Abs,
    Sqrt,
    Floor,
    Ceil,
    Min,
    Max,
    Modulo,
    Pow,
    LinearStep,
    SquareStep,
    ZeroFill,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        let builtin = match name {
            "ARCCOS" | "acos" => Self::Arccos,
            "ARCSIN" | "asin" => Self::Arcsin,
            "ARCTAN" | "atan" => Self::Arctan,
            "COS" | "cos" => Self::Cos,
            "SIN" | "sin" => Self::Sin,
            "TAN" | "tan" => Self::Tan,
            "EXP" | "exp" => Self::Exp,
            "log" | "ln" => Self::Log,
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "MIN" | "min" => Self::Min,
            "MAX" | "max" => Self::Max,
            "MODULO" => Self::Modulo,
            "POW" | "pow" => Self::Pow,
            "LINEARSTEP" => Self::LinearStep,
            "SQUARESTEP" => Self::SquareStep,
            "zeroFill" => Self::ZeroFill,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn signature(self) -> Signature {
        match self {
            Self::Min | Self::Max | Self::Modulo | Self::Pow => Signature::Fixed(2),
            Self::LinearStep | Self::SquareStep => Signature::Table,
            _ => Signature::Fixed(1),
        }
    }

    /// Apply a fixed-signature builtin. Table builtins go through
    /// [`Builtin::apply_table`].
    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Self::Arccos => a.acos(),
            Self::Arcsin => a.asin(),
            Self::Arctan => a.atan(),
            Self::Cos => a.cos(),
            Self::Sin => a.sin(),
            Self::Tan => a.tan(),
            Self::Exp => a.exp(),
            Self::Log => a.ln(),
            Self::Abs => a.abs(),
            Self::Sqrt => a.sqrt(),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            Self::Min => min(a, b),
            Self::Max => max(a, b),
            Self::Modulo => a % b,
            Self::Pow => a.powf(b),
            Self::ZeroFill => zero_fill(a),
            Self::LinearStep | Self::SquareStep => f64::NAN,
        }
    }

    pub fn apply_table(self, x: f64, table: &[(f64, f64)]) -> f64 {
        match self {
            Self::LinearStep => linear_step(x, table),
            Self::SquareStep => square_step(x, table),
            _ => f64::NAN,
        }
    }
}

// NaN-propagating, unlike f64::min/max.
fn min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Replace an exact zero with the smallest positive `f64`.
pub fn zero_fill(value: f64) -> f64 {
    if value == 0.0 {
        f64::from_bits(1)
    } else {
        value
    }
}

/// Piecewise-linear interpolation over `[x_{i-1}, x_i)` segments; `NaN`
/// outside the table. When segments overlap the last match wins.
pub fn linear_step(x: f64, table: &[(f64, f64)]) -> f64 {
    let mut y = f64::NAN;
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x0 <= x && x < x1 {
            y = y0 + (y1 - y0) / (x1 - x0) * (x - x0);
        }
    }
    y
}

/// Left-continuous step lookup over `[x_{i-1}, x_i)` segments; `NaN` outside
/// the table.
pub fn square_step(x: f64, table: &[(f64, f64)]) -> f64 {
    let mut y = f64::NAN;
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, _) = pair[1];
        if x0 <= x && x < x1 {
            y = y0;
        }
    }
    y
}
