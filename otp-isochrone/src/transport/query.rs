//! Query parameter values as handed to a transport.

use std::cmp::Ordering;
use std::fmt;

/// A typed query parameter value.
///
/// Values keep their type until they reach the wire so that sorting
/// compares numbers numerically (`600` before `1200`) rather than as text.
/// Values of different variants order by variant: bools, ints, floats, text.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Whether the value counts as "set".
    ///
    /// Empty strings, zero and `false` are all treated as unset. NaN is
    /// not zero and counts as set.
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Text(s) => !s.is_empty(),
            ParamValue::Int(n) => *n != 0,
            ParamValue::Float(x) => *x != 0.0,
            ParamValue::Bool(b) => *b,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ParamValue::Bool(_) => 0,
            ParamValue::Int(_) => 1,
            ParamValue::Float(_) => 2,
            ParamValue::Text(_) => 3,
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use ParamValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// A single `(name, value)` query parameter. Names may repeat.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryParam {
    pub name: &'static str,
    pub value: ParamValue,
}

impl QueryParam {
    pub fn new(name: &'static str, value: impl Into<ParamValue>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// The `(name, value)` pair as strings, ready for URL encoding.
    pub fn to_pair(&self) -> (&'static str, String) {
        (self.name, self.value.to_string())
    }
}
