use crate::mask::TypeMask;
use std::fmt;

/// A numeric value, keeping integer and floating-point payloads distinct the
/// way the original implementation tracks `int` vs `float32` separately
/// rather than collapsing both into one float type.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Numeric equality compares by value, not by concrete kind, so an integer
/// and a float that denote the same quantity are equal — matching `==`'s
/// "numerically equal integers and floats" rule.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// The engine's only runtime value type. Every AST node evaluates to one of
/// these three kinds, never to anything structured.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Number(Number),
    String(String),
}

impl Value {
    pub fn type_mask(&self) -> TypeMask {
        match self {
            Value::Bool(_) => TypeMask::BOOL,
            Value::Number(_) => TypeMask::NUMBER,
            Value::String(_) => TypeMask::STRING,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Parses this value as a float, following a string operand, matching
    /// the comparison operators' string-to-number coercion fallback.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(_) => None,
        }
    }
}

/// Raw payload equality: values of different kinds are never equal, and no
/// coercion is attempted here (coercion is an operator-level concern, see
/// the ordered-comparison operators in `sentinel-dsl`). This mirrors the
/// original's `==`/`!=` operators, which compare the dynamically typed Go
/// payloads directly.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}
