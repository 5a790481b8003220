//! Data models for feature attributes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed attribute value carried by a feature.
///
/// Deserializes from plain JSON scalars: `null`, booleans, integers that fit
/// in `i64`, any other number, and strings.
///
/// # Examples
///
/// ```
/// use utfgrid::models::FeatureValue;
///
/// let int: FeatureValue = serde_json::from_str("42").unwrap();
/// let float: FeatureValue = serde_json::from_str("4.5").unwrap();
/// let text: FeatureValue = serde_json::from_str("\"Main St\"").unwrap();
///
/// assert_eq!(int, FeatureValue::Int(42));
/// assert_eq!(float, FeatureValue::Float(4.5));
/// assert_eq!(text, FeatureValue::String("Main St".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FeatureValue {
    /// Convert to a JSON value, or `None` when the value must be left out of
    /// the feature object (null, and floats JSON cannot represent).
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            FeatureValue::Null => None,
            FeatureValue::Bool(b) => Some(serde_json::Value::Bool(*b)),
            FeatureValue::Int(i) => Some(serde_json::Value::from(*i)),
            FeatureValue::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
            FeatureValue::String(s) => Some(serde_json::Value::String(s.clone())),
        }
    }

    /// Returns true if this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::String(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::String(v)
    }
}

/// Attribute values of one feature, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    attributes: HashMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FeatureValue>) {
        self.attributes.insert(field.into(), value.into());
    }

    /// Returns the value of `field` if the feature carries it.
    pub fn get(&self, field: &str) -> Option<&FeatureValue> {
        self.attributes.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
