//! Attribute values carried by entities and the environment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered attribute map. Insertion order is the order attributes appear in prompts.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// A color given as a hex string (e.g. `#ffd700`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Hex representation including the leading `#`
    pub hex: String,
}

impl Color {
    /// Create a color from a hex string.
    pub fn hex(hex: impl Into<String>) -> Self {
        Self { hex: hex.into() }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

/// Value of a single entity or environment attribute.
///
/// Deserializes untagged: numbers become `Number`, `{ hex = "..." }` tables
/// become `Color`, and everything else is `Text`.
///
/// # Examples
///
/// ```
/// use ministudio_core::{AttributeValue, Color};
///
/// assert_eq!(AttributeValue::from("gold").to_string(), "gold");
/// assert_eq!(AttributeValue::from(3.0).to_string(), "3");
/// assert_eq!(AttributeValue::from(0.5).to_string(), "0.5");
/// assert_eq!(AttributeValue::from(Color::hex("#ffd700")).to_string(), "#ffd700");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric value
    Number(f64),
    /// Color value
    Color(Color),
    /// Free-form text
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers render without a trailing ".0" so prompts read naturally
            AttributeValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{:.0}", n)
            }
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Color(c) => write!(f, "{}", c),
            AttributeValue::Text(t) => write!(f, "{}", t),
        }
    }
}
