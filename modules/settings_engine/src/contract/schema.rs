//! Schema documents describing legal setting values
//!
//! A schema document is a tagged constraint tree registered per setting name.
//! The validator walks it recursively; storage round-trips it through the
//! serde representation below (`{"type": "integer", "minimum": 0, ...}`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural description of the legal values for one setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaDocument {
    /// true / false
    Boolean,
    /// Whole number with optional bounds and enumeration
    Integer(IntegerSchema),
    /// Any JSON number with optional bounds
    Number(NumberSchema),
    /// Text with optional length bounds and enumeration
    String(StringSchema),
    /// Homogeneous list with optional length bounds
    Array(ArraySchema),
    /// Keyed fields with a required list and a closed-world flag
    Object(ObjectSchema),
}

/// Constraints for integer values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegerSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<i64>,
    /// Exact allowed values; bounds still apply when both are present
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<i64>>,
}

/// Constraints for floating-point values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
}

/// Constraints for text values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Exact allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// Constraints for list values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Schema every element must satisfy
    pub items: Box<SchemaDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Constraints for object values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSchema {
    /// Per-field schemas
    pub properties: BTreeMap<String, SchemaDocument>,
    /// Field names that must be present
    pub required: Vec<String>,
    /// When false, fields outside `properties` are rejected (closed world)
    pub additional_properties: bool,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }
}

impl SchemaDocument {
    /// Integer constrained to an inclusive range
    pub fn integer_range(min: i64, max: i64) -> Self {
        Self::Integer(IntegerSchema {
            minimum: Some(min),
            maximum: Some(max),
            ..IntegerSchema::default()
        })
    }

    /// Integer restricted to an exact set of values
    pub fn integer_enum(values: &[i64]) -> Self {
        Self::Integer(IntegerSchema {
            allowed: Some(values.to_vec()),
            ..IntegerSchema::default()
        })
    }

    /// Text restricted to an exact set of values
    pub fn string_enum(values: &[&str]) -> Self {
        Self::String(StringSchema {
            allowed: Some(values.iter().map(|v| (*v).to_string()).collect()),
            ..StringSchema::default()
        })
    }

    /// List whose length must fall in the inclusive range
    pub fn bounded_array(items: SchemaDocument, min_items: usize, max_items: usize) -> Self {
        Self::Array(ArraySchema {
            items: Box::new(items),
            min_items: Some(min_items),
            max_items: Some(max_items),
        })
    }
}
