//! Contract error types for the settings engine
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::AuthLevel;

/// One accessor step from the document root towards the offending value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field accessor
    Field(String),
    /// Array index accessor
    Index(usize),
}

/// The schema constraint a value failed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaConstraint {
    /// Wrong primitive type
    Type,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MinLength,
    MaxLength,
    /// Value outside the enumerated set
    Enum,
    MinItems,
    MaxItems,
    /// Required object field missing
    Required,
    /// Unknown field on a closed-world object
    AdditionalProperties,
    /// Serialized value exceeds the configured size cap
    ValueSize,
}

impl std::fmt::Display for SchemaConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Type => "type",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMinimum => "exclusive_minimum",
            Self::ExclusiveMaximum => "exclusive_maximum",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Enum => "enum",
            Self::MinItems => "min_items",
            Self::MaxItems => "max_items",
            Self::Required => "required",
            Self::AdditionalProperties => "additional_properties",
            Self::ValueSize => "value_size",
        };
        f.write_str(name)
    }
}

/// Structured detail for a failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFault {
    /// Accessor path from the document root to the offending value
    pub path: Vec<PathSegment>,
    /// Human-readable description
    pub message: String,
    /// The value that failed
    pub offending: serde_json::Value,
    /// Which constraint was violated
    pub constraint: SchemaConstraint,
}

impl ValidationFault {
    /// Render the path as "$", "$.mask[2]", ...
    pub fn path_string(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl std::fmt::Display for ValidationFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (violated: {})",
            self.path_string(),
            self.message,
            self.constraint
        )
    }
}

/// Settings engine domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Unknown parameter name, product-setting pair, or global setting
    NotFound {
        /// Resource type (parameter, product setting, global setting)
        resource: String,
        /// Resource identifier
        key: String,
    },
    /// Create on a (product, name) pair that already has a row
    AlreadyExists {
        product_id: i64,
        name: String,
    },
    /// Caller's authorization level is below the setting's minimum
    Forbidden {
        name: String,
        required: AuthLevel,
        actual: AuthLevel,
    },
    /// Value failed schema validation
    Validation(ValidationFault),
    /// Optimistic-concurrency retry budget exhausted
    Conflict {
        product_id: i64,
        name: String,
        attempts: u32,
    },
    /// Broken engine invariant; unreachable in correct operation
    Integrity {
        message: String,
    },
    /// Internal error
    Internal,
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, key } => {
                write!(f, "{} not found: {}", resource, key)
            }
            Self::AlreadyExists { product_id, name } => {
                write!(f, "Setting already exists: {} for product {}", name, product_id)
            }
            Self::Forbidden {
                name,
                required,
                actual,
            } => {
                write!(
                    f,
                    "Forbidden: {} requires {}, caller has {}",
                    name, required, actual
                )
            }
            Self::Validation(fault) => {
                write!(f, "Validation error: {}", fault)
            }
            Self::Conflict {
                product_id,
                name,
                attempts,
            } => {
                write!(
                    f,
                    "Conflict: {} for product {} still contended after {} attempts",
                    name, product_id, attempts
                )
            }
            Self::Integrity { message } => {
                write!(f, "Integrity fault: {}", message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for SettingsError {}
