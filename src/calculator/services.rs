use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A JSON number as the calculator sees it: integers stay integers as long
/// as the result fits in `i64`, everything else is carried as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Exact comparison against zero; `-0.0` counts as zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(v) => v == 0,
            Number::Float(v) => v == 0.0,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(v) => v.is_finite(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Cannot divide by zero!")]
    DivisionByZero,

    /// Overflow to infinity or an undefined result such as a negative base
    /// raised to a fractional power.
    #[error("Result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        }
    }

    pub fn apply(self, a: Number, b: Number) -> Result<Number, CalcError> {
        let result = match self {
            Operation::Add => add(a, b),
            Operation::Subtract => subtract(a, b),
            Operation::Multiply => multiply(a, b),
            Operation::Divide => divide(a, b)?,
            Operation::Power => power(a, b),
        };
        if !result.is_finite() {
            return Err(CalcError::NonFinite);
        }
        debug!(op = self.as_str(), %a, %b, %result, "calculated");
        Ok(result)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Integer arithmetic falls back to f64 when the exact result overflows i64.
fn int_or_float(
    a: Number,
    b: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Number {
    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        if let Some(v) = int_op(x, y) {
            return Number::Int(v);
        }
    }
    Number::Float(float_op(a.as_f64(), b.as_f64()))
}

pub fn add(a: Number, b: Number) -> Number {
    int_or_float(a, b, i64::checked_add, |x, y| x + y)
}

pub fn subtract(a: Number, b: Number) -> Number {
    int_or_float(a, b, i64::checked_sub, |x, y| x - y)
}

pub fn multiply(a: Number, b: Number) -> Number {
    int_or_float(a, b, i64::checked_mul, |x, y| x * y)
}

/// True division: the result is always a float.
pub fn divide(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    Ok(Number::Float(a.as_f64() / b.as_f64()))
}

fn checked_int_pow(base: i64, exp: i64) -> Option<i64> {
    if exp < 0 {
        return None;
    }
    match base {
        0 | 1 if exp == 0 => Some(1),
        0 | 1 => Some(base),
        -1 => Some(if exp % 2 == 0 { 1 } else { -1 }),
        _ => u32::try_from(exp).ok().and_then(|e| base.checked_pow(e)),
    }
}

/// A negative integer exponent produces a float, as does any float operand.
pub fn power(a: Number, b: Number) -> Number {
    int_or_float(a, b, checked_int_pow, f64::powf)
}
