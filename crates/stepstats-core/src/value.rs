//! Scalar cell values and the text coercion rule.
//!
//! Every leaf element under a `HighScore` is stored as one [`Value`]. Raw
//! element text is turned into a value with [`coerce`]:
//!
//! 1. no text → [`Value::Null`]
//! 2. text containing `.` → float, if it parses
//! 3. any other text → integer, if it parses
//! 4. anything that fails to parse keeps its original text
//!
//! Numbers may use single underscores between digits (`1_000`), and floats
//! outside `1e-4..1e16` print in exponent form (`1.5e-07`, `1e+16`).
//!
//! The rule is a heuristic. Version-like strings such as `1.2.3` stay text,
//! and nothing is ever turned into a boolean or a date.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

/// One cell of a row
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Coerce raw element text into a typed value
pub fn coerce(text: Option<&str>) -> Value {
    let Some(text) = text else {
        return Value::Null;
    };

    let Some(number) = strip_digit_separators(text.trim()) else {
        return Value::Text(text.to_string());
    };
    if text.contains('.') {
        if let Ok(v) = number.parse::<f64>() {
            return Value::Float(v);
        }
    } else if let Ok(v) = number.parse::<i64>() {
        return Value::Int(v);
    }

    Value::Text(text.to_string())
}

/// Remove `_` separators that sit between two digits.
/// Returns `None` if any underscore is misplaced (`_1`, `1__0`, `1_.5`).
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }

    let bytes = text.as_bytes();
    let mut stripped = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c != '_' {
            stripped.push(c);
            continue;
        }
        let before = i > 0 && bytes[i - 1].is_ascii_digit();
        let after = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if !(before && after) {
            return None;
        }
    }
    Some(Cow::Owned(stripped))
}

/// Format a float the way the source tooling prints it (`100.0`, `0.25`,
/// `1.5e-07`, `1e+16`)
fn format_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("nan");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "inf" } else { "-inf" });
    }

    // Shortest round-trip digits, e.g. "1.5e-7"
    let scientific = format!("{:e}", v);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else if v.fract() == 0.0 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => format_float(*v, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        v.map(Value::from).unwrap_or_default()
    }
}
