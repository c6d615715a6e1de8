//! Read-only view over an untyped record from the commerce API
//!
//! Every field may be absent or carry the wrong JSON type. Accessors return
//! `None` instead of failing so normalization decides the fallback.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub(crate) struct RawRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    /// `None` for anything that is not a JSON object
    pub(crate) fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Non-blank string
    pub(crate) fn text(&self, key: &str) -> Option<&'a str> {
        self.str(key).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Integer given either as a JSON number or a numeric string
    pub(crate) fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Array elements, empty when absent or not an array
    pub(crate) fn array(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn record(&self, key: &str) -> Option<RawRecord<'a>> {
        self.get(key).and_then(RawRecord::from_value)
    }

    /// Object elements of an array field; other element shapes are skipped
    pub(crate) fn records(&self, key: &str) -> Vec<RawRecord<'a>> {
        self.array(key)
            .iter()
            .filter_map(RawRecord::from_value)
            .collect()
    }
}
