//! Equation shapes and whole-name substitution.
//!
//! Per-node equations come in three shapes:
//!
//! ```text
//! INTEG(<rate>, <initial>)     stock: accumulates rate * stepSize each step
//! INITIAL(<expr>, <initial>)   seeded from <initial>, then assigned <expr>
//! <expr>                       regular: assigned every step, starts at 0.0
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{GenomeError, GenomeResult};

const INTEG_MARKER: &str = "INTEG(";
const INITIAL_MARKER: &str = "INITIAL(";

/// Initial value of regular equations.
pub const DEFAULT_INITIAL: &str = "0.0";

/// Formula used in place of an empty one when an equation is regrown.
pub const EMPTY_FORMULA: &str = "1.0";

/// A parsed per-node equation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquationShape {
    Regular(String),
    Initial { expr: String, initial: String },
    Integ { rate: String, initial: String },
}

impl EquationShape {
    /// Classify `text`. A wrapper marker anywhere in the text requires the
    /// whole text to be that wrapper with exactly two top-level arguments.
    pub fn parse(text: &str) -> GenomeResult<Self> {
        check_balanced(text)?;
        let trimmed = text.trim();

        if trimmed.contains(INTEG_MARKER) {
            let (rate, initial) = wrapper_arguments(trimmed, INTEG_MARKER)?;
            Ok(Self::Integ { rate, initial })
        } else if trimmed.contains(INITIAL_MARKER) {
            let (expr, initial) = wrapper_arguments(trimmed, INITIAL_MARKER)?;
            Ok(Self::Initial { expr, initial })
        } else {
            Ok(Self::Regular(text.to_string()))
        }
    }

    /// The formula inside any wrapper.
    pub fn body(&self) -> &str {
        match self {
            Self::Regular(expr) => expr,
            Self::Initial { expr, .. } => expr,
            Self::Integ { rate, .. } => rate,
        }
    }

    /// The declared initial value, if the shape has one.
    pub fn initial(&self) -> Option<&str> {
        match self {
            Self::Regular(_) => None,
            Self::Initial { initial, .. } | Self::Integ { initial, .. } => Some(initial),
        }
    }

    /// Same wrapper and initial value around a new formula.
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        let body = body.into();
        match self {
            Self::Regular(_) => Self::Regular(body),
            Self::Initial { initial, .. } => Self::Initial {
                expr: body,
                initial: initial.clone(),
            },
            Self::Integ { initial, .. } => Self::Integ {
                rate: body,
                initial: initial.clone(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body().trim().is_empty() && self.initial().is_none()
    }

    /// Rewrite variable names in the formula and the initial value.
    pub fn substitute(&self, substitutions: &HashMap<String, String>) -> Self {
        let sub = |text: &str| substitute_names(text, substitutions);
        match self {
            Self::Regular(expr) => Self::Regular(sub(expr)),
            Self::Initial { expr, initial } => Self::Initial {
                expr: sub(expr),
                initial: sub(initial),
            },
            Self::Integ { rate, initial } => Self::Integ {
                rate: sub(rate),
                initial: sub(initial),
            },
        }
    }
}

impl fmt::Display for EquationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular(expr) => write!(f, "{}", expr),
            Self::Initial { expr, initial } => write!(f, "INITIAL({}, {})", expr, initial),
            Self::Integ { rate, initial } => write!(f, "INTEG({}, {})", rate, initial),
        }
    }
}

fn malformed(equation: &str, message: impl Into<String>) -> GenomeError {
    GenomeError::MalformedEquation {
        equation: equation.to_string(),
        message: message.into(),
    }
}

fn check_balanced(text: &str) -> GenomeResult<()> {
    let mut depth: i64 = 0;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(malformed(text, "unbalanced parentheses"));
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(malformed(text, "unbalanced parentheses"))
    }
}

/// Split `MARKER<a>, <b>)` into its two top-level arguments.
fn wrapper_arguments(text: &str, marker: &str) -> GenomeResult<(String, String)> {
    let inner = text
        .strip_prefix(marker)
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| malformed(text, format!("expected the whole equation to be {marker}...)")))?;

    // The closing paren must be the one matching the marker's opening paren.
    let mut depth = 0i64;
    let mut commas = Vec::new();
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' | '{' => depth += 1,
            ')' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(malformed(text, format!("text after {marker}...)")));
                }
            }
            ',' if depth == 0 => commas.push(i),
            _ => {}
        }
    }

    match commas.as_slice() {
        [comma] => {
            let first = inner[..*comma].trim();
            let second = inner[comma + 1..].trim();
            if first.is_empty() || second.is_empty() {
                Err(malformed(text, "empty wrapper argument"))
            } else {
                Ok((first.to_string(), second.to_string()))
            }
        }
        _ => Err(malformed(
            text,
            format!("expected 2 arguments, found {}", commas.len() + 1),
        )),
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Numbers first, so exponents like the `e5` in `1e5` are never names.
        Regex::new(r"(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?|[A-Za-z_][A-Za-z0-9_]*")
            .unwrap_or_else(|e| unreachable!("token pattern is valid: {e}"))
    })
}

/// Replace every whole identifier found in `substitutions` in one pass, then
/// drop `$` escape characters.
///
/// A single scan means a replacement is never itself rewritten, and whole-name
/// matching means a name that is a prefix of another (`a` and `ab`) or of a
/// helper (`a` and `abs`) is left alone.
pub fn substitute_names(text: &str, substitutions: &HashMap<String, String>) -> String {
    if substitutions.is_empty() {
        return text.replace('$', "");
    }
    token_pattern()
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            substitutions
                .get(token)
                .cloned()
                .unwrap_or_else(|| token.to_string())
        })
        .replace('$', "")
}
