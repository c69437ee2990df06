//! Stock catalog for a fresh inspection line
//!
//! Seeded at first start; a provisioned database keeps whatever catalog it
//! already carries.

use crate::contract::{
    schema::{NumberSchema, ObjectSchema, SchemaDocument},
    AuthLevel, GlobalSetting, SettingParameter,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;

/// Product-scoped parameter definitions
pub fn stock_parameters() -> Vec<SettingParameter> {
    vec![
        SettingParameter {
            name: "Rejector.DelayMS".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_range(0, 10000),
            containers_affected: Some(vec!["rejector".to_string()]),
        },
        SettingParameter {
            name: "Rejector.OpenMS".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_range(0, 10000),
            containers_affected: Some(vec!["rejector".to_string()]),
        },
        SettingParameter {
            name: "Conveyor.VelocityMM".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_range(0, 255),
            containers_affected: Some(vec![
                "conveyor".to_string(),
                "acquisition".to_string(),
            ]),
        },
        SettingParameter {
            name: "Emitter.Voltage".to_string(),
            min_auth_level: AuthLevel::Engineer,
            schema: SchemaDocument::integer_range(0, 10000),
            containers_affected: Some(vec!["emitter".to_string()]),
        },
        SettingParameter {
            name: "Emitter.Current".to_string(),
            min_auth_level: AuthLevel::Engineer,
            schema: SchemaDocument::integer_range(0, 10000),
            containers_affected: Some(vec!["emitter".to_string()]),
        },
        SettingParameter {
            name: "ContaminantRule.Mask".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: contaminant_rule_schema(),
            containers_affected: Some(vec!["analysis".to_string()]),
        },
    ]
}

/// Line-wide settings with their factory defaults
pub fn stock_global_settings(now: DateTime<Utc>) -> Vec<GlobalSetting> {
    vec![
        GlobalSetting {
            name: "Watchdog.Timer".to_string(),
            min_auth_level: AuthLevel::Engineer,
            schema: SchemaDocument::Boolean,
            value: Some(json!(true)),
            created_at: now,
            updated_at: now,
            updated_by: None,
        },
        GlobalSetting {
            // 0 = forward, 1 = reverse
            name: "Conveyor.Direction".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_enum(&[0, 1]),
            value: Some(json!(0)),
            created_at: now,
            updated_at: now,
            updated_by: None,
        },
        GlobalSetting {
            // 0 = production, 1 = calibration, 2 = maintenance
            name: "Inspection.Mode".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_enum(&[0, 1, 2]),
            value: Some(json!(0)),
            created_at: now,
            updated_at: now,
            updated_by: None,
        },
    ]
}

/// Contaminant rule: enabled flag, grey threshold, and a four-band
/// sensitivity mask with each band in [0, 1)
fn contaminant_rule_schema() -> SchemaDocument {
    SchemaDocument::Object(ObjectSchema {
        properties: BTreeMap::from([
            ("enabled".to_string(), SchemaDocument::Boolean),
            ("threshold".to_string(), SchemaDocument::integer_range(1, 255)),
            (
                "mask".to_string(),
                SchemaDocument::bounded_array(
                    SchemaDocument::Number(NumberSchema {
                        minimum: Some(0.0),
                        exclusive_maximum: Some(1.0),
                        ..NumberSchema::default()
                    }),
                    4,
                    4,
                ),
            ),
        ]),
        required: vec![
            "enabled".to_string(),
            "threshold".to_string(),
            "mask".to_string(),
        ],
        additional_properties: false,
    })
}
