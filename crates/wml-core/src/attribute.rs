//! Scalar attribute values
//!
//! WML attributes are dynamically typed. A value remembers whether it was
//! stored as a bool, an integer, a double or a plain string, and converts on
//! request through the explicit `to_*` helpers.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumIter};

/// Shared blank value handed out for missing attributes
pub(crate) static BLANK: AttributeValue = AttributeValue::Blank;

/// The kind of scalar held by an [`AttributeValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AttributeKind {
    Blank,
    Bool,
    Int,
    Double,
    String,
}

/// A scalar attribute value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Unset
    #[default]
    Blank,
    Bool(bool),
    Int(i64),
    Double(#[serde(serialize_with = "serialize_double")] f64),
    String(String),
}

/// JSON has no inf or NaN; those are written as their text form
fn serialize_double<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.collect_str(value)
    }
}

impl AttributeValue {
    /// Interpret text the way script assignments do.
    ///
    /// `yes`/`true`/`no`/`false` become booleans, numbers become `Int` or
    /// `Double` only when they format back to exactly the same text, the
    /// empty string is blank, and everything else stays a string.
    pub fn parse(text: &str) -> Self {
        match text {
            "" => return AttributeValue::Blank,
            "yes" | "true" => return AttributeValue::Bool(true),
            "no" | "false" => return AttributeValue::Bool(false),
            _ => {}
        }

        if let Ok(int) = text.parse::<i64>()
            && int.to_string() == text
        {
            return AttributeValue::Int(int);
        }

        if let Ok(double) = text.parse::<f64>()
            && double.is_finite()
            && format_double(double) == text
        {
            return AttributeValue::Double(double);
        }

        AttributeValue::String(text.to_string())
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Blank => AttributeKind::Blank,
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Double(_) => AttributeKind::Double,
            AttributeValue::String(_) => AttributeKind::String,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, AttributeValue::Blank)
    }

    /// Blank, or a string with no characters
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Blank => true,
            AttributeValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text form of the value. Booleans print as `yes`/`no`.
    pub fn str(&self) -> String {
        match self {
            AttributeValue::Blank => String::new(),
            AttributeValue::Bool(true) => "yes".to_string(),
            AttributeValue::Bool(false) => "no".to_string(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Double(d) => format_double(*d),
            AttributeValue::String(s) => s.clone(),
        }
    }

    pub fn to_bool(&self, default: bool) -> bool {
        match self {
            AttributeValue::Bool(b) => *b,
            AttributeValue::Int(i) => *i != 0,
            AttributeValue::Double(d) => *d != 0.0,
            AttributeValue::String(s) => match s.as_str() {
                "yes" | "true" => true,
                "no" | "false" => false,
                _ => default,
            },
            AttributeValue::Blank => default,
        }
    }

    /// Integer value; doubles truncate toward zero.
    pub fn to_int(&self, default: i64) -> i64 {
        match self {
            AttributeValue::Int(i) => *i,
            AttributeValue::Double(d) if d.is_finite() => *d as i64,
            AttributeValue::String(s) => s
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite())
                        .map(|d| d as i64)
                })
                .unwrap_or(default),
            _ => default,
        }
    }

    pub fn to_double(&self, default: f64) -> f64 {
        match self {
            AttributeValue::Int(i) => *i as f64,
            AttributeValue::Double(d) => *d,
            AttributeValue::String(s) => s.parse::<f64>().unwrap_or(default),
            _ => default,
        }
    }
}

/// Shortest text that reads back as the same double; integral values drop `.0`.
fn format_double(value: f64) -> String {
    format!("{value}")
}

impl PartialEq for AttributeValue {
    /// Values compare by their text form, so `Int(5)` equals `"5"`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttributeValue::Blank, AttributeValue::Blank) => true,
            (AttributeValue::Bool(a), AttributeValue::Bool(b)) => a == b,
            (AttributeValue::Int(a), AttributeValue::Int(b)) => a == b,
            (AttributeValue::String(a), AttributeValue::String(b)) => a == b,
            _ => self.str() == other.str(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            other => f.write_str(&other.str()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            AttributeValue::Double(value)
        } else {
            AttributeValue::String(value.to_string())
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}
