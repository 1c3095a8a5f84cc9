//! Shared type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value in an open key/value bag (`extra_data`, `custom_data`)
///
/// The remote API accepts arbitrary extra keys; values are limited to the
/// scalar kinds below so payloads stay statically checkable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        ExtraValue::Text(value.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        ExtraValue::Text(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        ExtraValue::Integer(value)
    }
}

impl From<f64> for ExtraValue {
    fn from(value: f64) -> Self {
        ExtraValue::Float(value)
    }
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        ExtraValue::Bool(value)
    }
}

/// Open mapping of string keys to scalar values
pub type ExtraFields = BTreeMap<String, ExtraValue>;
