//! Recursive schema validation for setting values

use crate::contract::{
    schema::{
        ArraySchema, IntegerSchema, NumberSchema, ObjectSchema, SchemaDocument, StringSchema,
    },
    PathSegment, SchemaConstraint, SettingsError, ValidationFault,
};
use serde_json::Value;

/// Validate a candidate value against a schema document.
///
/// Returns the normalized value on success. The only normalization applied
/// is numeric: a JSON number that is mathematically integral and fits i64 is
/// rewritten in integer form (5.0 becomes 5), so equal quantities share one
/// canonical representation. Nothing else is coerced.
pub fn validate(value: &Value, schema: &SchemaDocument) -> Result<Value, SettingsError> {
    let mut path = Vec::new();
    check(value, schema, &mut path).map_err(SettingsError::Validation)
}

/// Reject values whose serialized form exceeds the configured cap
pub fn check_value_size(value: &Value, max_bytes: usize) -> Result<(), SettingsError> {
    let serialized = serde_json::to_string(value).map_err(|_| SettingsError::Internal)?;
    if serialized.len() > max_bytes {
        return Err(SettingsError::Validation(ValidationFault {
            path: Vec::new(),
            message: format!(
                "serialized value is {} bytes, cap is {}",
                serialized.len(),
                max_bytes
            ),
            offending: Value::Null,
            constraint: SchemaConstraint::ValueSize,
        }));
    }
    Ok(())
}

fn check(
    value: &Value,
    schema: &SchemaDocument,
    path: &mut Vec<PathSegment>,
) -> Result<Value, ValidationFault> {
    match schema {
        SchemaDocument::Boolean => check_boolean(value, path),
        SchemaDocument::Integer(s) => check_integer(value, s, path),
        SchemaDocument::Number(s) => check_number(value, s, path),
        SchemaDocument::String(s) => check_string(value, s, path),
        SchemaDocument::Array(s) => check_array(value, s, path),
        SchemaDocument::Object(s) => check_object(value, s, path),
    }
}

fn fault(
    path: &[PathSegment],
    message: String,
    offending: &Value,
    constraint: SchemaConstraint,
) -> ValidationFault {
    ValidationFault {
        path: path.to_vec(),
        message,
        offending: offending.clone(),
        constraint,
    }
}

fn check_boolean(value: &Value, path: &[PathSegment]) -> Result<Value, ValidationFault> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        other => Err(fault(
            path,
            "expected boolean".to_string(),
            other,
            SchemaConstraint::Type,
        )),
    }
}

/// Extract an integral value, accepting integral floats (5.0) per the
/// documented normalization. Integers outside i64 are not representable here.
fn as_integral(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n,
        _ => return None,
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    // 2^63 as f64 is exact; integral floats below it cast losslessly.
    if f.fract() == 0.0 && f >= (i64::MIN as f64) && f < (i64::MAX as f64) {
        return Some(f as i64);
    }
    None
}

fn check_integer(
    value: &Value,
    schema: &IntegerSchema,
    path: &[PathSegment],
) -> Result<Value, ValidationFault> {
    let i = as_integral(value).ok_or_else(|| {
        fault(
            path,
            "expected integer".to_string(),
            value,
            SchemaConstraint::Type,
        )
    })?;

    if let Some(min) = schema.minimum {
        if i < min {
            return Err(fault(
                path,
                format!("must be >= {min}"),
                value,
                SchemaConstraint::Minimum,
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if i > max {
            return Err(fault(
                path,
                format!("must be <= {max}"),
                value,
                SchemaConstraint::Maximum,
            ));
        }
    }
    if let Some(min) = schema.exclusive_minimum {
        if i <= min {
            return Err(fault(
                path,
                format!("must be > {min}"),
                value,
                SchemaConstraint::ExclusiveMinimum,
            ));
        }
    }
    if let Some(max) = schema.exclusive_maximum {
        if i >= max {
            return Err(fault(
                path,
                format!("must be < {max}"),
                value,
                SchemaConstraint::ExclusiveMaximum,
            ));
        }
    }
    if let Some(allowed) = &schema.allowed {
        if !allowed.contains(&i) {
            return Err(fault(
                path,
                format!("must be one of {allowed:?}"),
                value,
                SchemaConstraint::Enum,
            ));
        }
    }

    Ok(Value::from(i))
}

fn check_number(
    value: &Value,
    schema: &NumberSchema,
    path: &[PathSegment],
) -> Result<Value, ValidationFault> {
    let n = match value {
        Value::Number(n) => n,
        other => {
            return Err(fault(
                path,
                "expected number".to_string(),
                other,
                SchemaConstraint::Type,
            ))
        }
    };
    let f = n.as_f64().unwrap_or_default();

    if let Some(min) = schema.minimum {
        if f < min {
            return Err(fault(
                path,
                format!("must be >= {min}"),
                value,
                SchemaConstraint::Minimum,
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if f > max {
            return Err(fault(
                path,
                format!("must be <= {max}"),
                value,
                SchemaConstraint::Maximum,
            ));
        }
    }
    if let Some(min) = schema.exclusive_minimum {
        if f <= min {
            return Err(fault(
                path,
                format!("must be > {min}"),
                value,
                SchemaConstraint::ExclusiveMinimum,
            ));
        }
    }
    if let Some(max) = schema.exclusive_maximum {
        if f >= max {
            return Err(fault(
                path,
                format!("must be < {max}"),
                value,
                SchemaConstraint::ExclusiveMaximum,
            ));
        }
    }

    // Integral quantities collapse to integer form; everything else keeps
    // its original representation.
    match as_integral(value) {
        Some(i) => Ok(Value::from(i)),
        None => Ok(value.clone()),
    }
}

fn check_string(
    value: &Value,
    schema: &StringSchema,
    path: &[PathSegment],
) -> Result<Value, ValidationFault> {
    let s = match value {
        Value::String(s) => s,
        other => {
            return Err(fault(
                path,
                "expected string".to_string(),
                other,
                SchemaConstraint::Type,
            ))
        }
    };
    let len = s.chars().count();

    if let Some(min) = schema.min_length {
        if len < min {
            return Err(fault(
                path,
                format!("length must be >= {min}"),
                value,
                SchemaConstraint::MinLength,
            ));
        }
    }
    if let Some(max) = schema.max_length {
        if len > max {
            return Err(fault(
                path,
                format!("length must be <= {max}"),
                value,
                SchemaConstraint::MaxLength,
            ));
        }
    }
    if let Some(allowed) = &schema.allowed {
        if !allowed.iter().any(|a| a == s) {
            return Err(fault(
                path,
                format!("must be one of {allowed:?}"),
                value,
                SchemaConstraint::Enum,
            ));
        }
    }

    Ok(value.clone())
}

fn check_array(
    value: &Value,
    schema: &ArraySchema,
    path: &mut Vec<PathSegment>,
) -> Result<Value, ValidationFault> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(fault(
                path,
                "expected array".to_string(),
                other,
                SchemaConstraint::Type,
            ))
        }
    };

    if let Some(min) = schema.min_items {
        if items.len() < min {
            return Err(fault(
                path,
                format!("must have >= {min} items"),
                value,
                SchemaConstraint::MinItems,
            ));
        }
    }
    if let Some(max) = schema.max_items {
        if items.len() > max {
            return Err(fault(
                path,
                format!("must have <= {max} items"),
                value,
                SchemaConstraint::MaxItems,
            ));
        }
    }

    let mut normalized = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        path.push(PathSegment::Index(i));
        let checked = check(item, &schema.items, path)?;
        path.pop();
        normalized.push(checked);
    }

    Ok(Value::Array(normalized))
}

fn check_object(
    value: &Value,
    schema: &ObjectSchema,
    path: &mut Vec<PathSegment>,
) -> Result<Value, ValidationFault> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(fault(
                path,
                "expected object".to_string(),
                other,
                SchemaConstraint::Type,
            ))
        }
    };

    for required in &schema.required {
        if !map.contains_key(required) {
            return Err(fault(
                path,
                format!("missing required field \"{required}\""),
                value,
                SchemaConstraint::Required,
            ));
        }
    }

    if !schema.additional_properties {
        for key in map.keys() {
            if !schema.properties.contains_key(key) {
                path.push(PathSegment::Field(key.clone()));
                let f = fault(
                    path,
                    "unknown field".to_string(),
                    &map[key],
                    SchemaConstraint::AdditionalProperties,
                );
                path.pop();
                return Err(f);
            }
        }
    }

    let mut normalized = map.clone();
    for (key, field_schema) in &schema.properties {
        if let Some(field_value) = map.get(key) {
            path.push(PathSegment::Field(key.clone()));
            let checked = check(field_value, field_schema, path)?;
            path.pop();
            normalized.insert(key.clone(), checked);
        }
    }

    Ok(Value::Object(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::schema::SchemaDocument as Doc;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn fault_of(result: Result<Value, SettingsError>) -> ValidationFault {
        match result {
            Err(SettingsError::Validation(fault)) => fault,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_boolean_type_mismatch() {
        let fault = fault_of(validate(&json!(1), &Doc::Boolean));
        assert_eq!(fault.constraint, SchemaConstraint::Type);
        assert_eq!(fault.path_string(), "$");
    }

    #[test]
    fn test_integer_inclusive_bounds() {
        let doc = Doc::integer_range(0, 10000);
        assert_eq!(validate(&json!(0), &doc).unwrap(), json!(0));
        assert_eq!(validate(&json!(10000), &doc).unwrap(), json!(10000));

        let fault = fault_of(validate(&json!(10001), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::Maximum);
        assert_eq!(fault.offending, json!(10001));

        let fault = fault_of(validate(&json!(-1), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::Minimum);
    }

    #[test]
    fn test_integer_exclusive_bounds() {
        let doc = Doc::Integer(IntegerSchema {
            exclusive_minimum: Some(0),
            exclusive_maximum: Some(10),
            ..IntegerSchema::default()
        });
        assert!(validate(&json!(1), &doc).is_ok());
        assert_eq!(
            fault_of(validate(&json!(0), &doc)).constraint,
            SchemaConstraint::ExclusiveMinimum
        );
        assert_eq!(
            fault_of(validate(&json!(10), &doc)).constraint,
            SchemaConstraint::ExclusiveMaximum
        );
    }

    #[test]
    fn test_integer_enum_membership() {
        let doc = Doc::integer_enum(&[0, 1, 2]);
        assert!(validate(&json!(2), &doc).is_ok());
        assert_eq!(
            fault_of(validate(&json!(3), &doc)).constraint,
            SchemaConstraint::Enum
        );
    }

    #[test]
    fn test_integral_float_normalizes_to_integer() {
        let doc = Doc::integer_range(0, 10000);
        assert_eq!(validate(&json!(500.0), &doc).unwrap(), json!(500));

        let fault = fault_of(validate(&json!(0.5), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::Type);
    }

    #[test]
    fn test_number_bounds() {
        let doc = Doc::Number(NumberSchema {
            minimum: Some(0.0),
            exclusive_maximum: Some(1.0),
            ..NumberSchema::default()
        });
        assert!(validate(&json!(0.25), &doc).is_ok());
        assert_eq!(
            fault_of(validate(&json!(1.0), &doc)).constraint,
            SchemaConstraint::ExclusiveMaximum
        );
        assert_eq!(
            fault_of(validate(&json!(-0.1), &doc)).constraint,
            SchemaConstraint::Minimum
        );
        // Integral quantities collapse regardless of spelling.
        assert_eq!(validate(&json!(0.0), &doc).unwrap(), json!(0));
    }

    #[test]
    fn test_string_length_and_enum() {
        let doc = Doc::String(StringSchema {
            min_length: Some(1),
            max_length: Some(8),
            ..StringSchema::default()
        });
        assert!(validate(&json!("salmon"), &doc).is_ok());
        assert_eq!(
            fault_of(validate(&json!(""), &doc)).constraint,
            SchemaConstraint::MinLength
        );
        assert_eq!(
            fault_of(validate(&json!("very long name"), &doc)).constraint,
            SchemaConstraint::MaxLength
        );

        let doc = Doc::string_enum(&["CW", "CCW"]);
        assert!(validate(&json!("CCW"), &doc).is_ok());
        assert_eq!(
            fault_of(validate(&json!("UP"), &doc)).constraint,
            SchemaConstraint::Enum
        );
    }

    #[test]
    fn test_array_length_and_element_path() {
        let doc = Doc::bounded_array(Doc::integer_range(0, 255), 2, 4);

        assert_eq!(
            fault_of(validate(&json!([1]), &doc)).constraint,
            SchemaConstraint::MinItems
        );
        assert_eq!(
            fault_of(validate(&json!([1, 2, 3, 4, 5]), &doc)).constraint,
            SchemaConstraint::MaxItems
        );

        let fault = fault_of(validate(&json!([1, 2, 999]), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::Maximum);
        assert_eq!(fault.path_string(), "$[2]");
    }

    #[test]
    fn test_object_required_and_closed_world() {
        let doc = Doc::Object(ObjectSchema {
            properties: BTreeMap::from([
                ("threshold".to_string(), Doc::integer_range(1, 255)),
                ("enabled".to_string(), Doc::Boolean),
            ]),
            required: vec!["threshold".to_string()],
            additional_properties: false,
        });

        assert!(validate(&json!({"threshold": 40}), &doc).is_ok());

        let fault = fault_of(validate(&json!({"enabled": true}), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::Required);
        assert!(fault.message.contains("threshold"));

        let fault = fault_of(validate(&json!({"threshold": 40, "extra": 1}), &doc));
        assert_eq!(fault.constraint, SchemaConstraint::AdditionalProperties);
        assert_eq!(fault.path_string(), "$.extra");
    }

    #[test]
    fn test_nested_fault_path() {
        let doc = Doc::Object(ObjectSchema {
            properties: BTreeMap::from([(
                "mask".to_string(),
                Doc::bounded_array(
                    Doc::Number(NumberSchema {
                        minimum: Some(0.0),
                        exclusive_maximum: Some(1.0),
                        ..NumberSchema::default()
                    }),
                    4,
                    4,
                ),
            )]),
            required: vec!["mask".to_string()],
            additional_properties: false,
        });

        let fault = fault_of(validate(&json!({"mask": [0.1, 0.2, 1.5, 0.4]}), &doc));
        assert_eq!(fault.path_string(), "$.mask[2]");
        assert_eq!(fault.offending, json!(1.5));
        assert_eq!(fault.constraint, SchemaConstraint::ExclusiveMaximum);
    }

    #[test]
    fn test_open_object_keeps_unknown_fields() {
        let doc = Doc::Object(ObjectSchema {
            properties: BTreeMap::from([("speed".to_string(), Doc::integer_range(0, 255))]),
            required: vec![],
            additional_properties: true,
        });

        let normalized = validate(&json!({"speed": 40.0, "note": "shift B"}), &doc).unwrap();
        assert_eq!(normalized, json!({"speed": 40, "note": "shift B"}));
    }

    #[test]
    fn test_value_size_guard() {
        let value = json!({"blob": "x".repeat(64)});
        assert!(check_value_size(&value, 1024).is_ok());

        let err = check_value_size(&value, 16);
        let fault = fault_of(err.map(|_| Value::Null));
        assert_eq!(fault.constraint, SchemaConstraint::ValueSize);
    }
}
