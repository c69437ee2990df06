//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{
    schema::SchemaDocument, AuthLevel, GlobalSetting, ProductSetting, SettingParameter,
    SettingsChangelogEntry,
};
use anyhow::Context;

// ===== Product Setting Conversions =====

impl From<entity::Model> for ProductSetting {
    fn from(entity: entity::Model) -> Self {
        Self {
            product_id: entity.product_id,
            name: entity.name,
            value: entity.value,
            version: entity.version,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        }
    }
}

impl From<&ProductSetting> for entity::ActiveModel {
    fn from(model: &ProductSetting) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            product_id: Set(model.product_id),
            name: Set(model.name.clone()),
            value: Set(model.value.clone()),
            version: Set(model.version),
            created_by: Set(model.created_by),
            updated_by: Set(model.updated_by),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
            deleted_at: Set(model.deleted_at),
        }
    }
}

// ===== Parameter Conversions =====

impl TryFrom<entity::parameter::Model> for SettingParameter {
    type Error = anyhow::Error;

    fn try_from(entity: entity::parameter::Model) -> Result<Self, Self::Error> {
        // An unknown authorization level never falls back to a default gate.
        let min_auth_level = parse_auth_level(&entity.min_auth_level)
            .with_context(|| format!("parameter {}", entity.name))?;
        let schema: SchemaDocument = serde_json::from_value(entity.schema)
            .with_context(|| format!("invalid schema document for parameter {}", entity.name))?;
        let containers_affected = entity
            .containers_affected
            .map(serde_json::from_value)
            .transpose()
            .with_context(|| format!("invalid containers list for parameter {}", entity.name))?;

        Ok(Self {
            name: entity.name,
            min_auth_level,
            schema,
            containers_affected,
        })
    }
}

impl TryFrom<&SettingParameter> for entity::parameter::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &SettingParameter) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        Ok(Self {
            name: Set(model.name.clone()),
            min_auth_level: Set(model.min_auth_level.as_str().to_string()),
            schema: Set(serde_json::to_value(&model.schema)?),
            containers_affected: Set(model
                .containers_affected
                .as_ref()
                .map(serde_json::to_value)
                .transpose()?),
        })
    }
}

// ===== Global Setting Conversions =====

impl TryFrom<entity::global::Model> for GlobalSetting {
    type Error = anyhow::Error;

    fn try_from(entity: entity::global::Model) -> Result<Self, Self::Error> {
        let min_auth_level = parse_auth_level(&entity.min_auth_level)
            .with_context(|| format!("global setting {}", entity.name))?;
        let schema: SchemaDocument = serde_json::from_value(entity.schema).with_context(|| {
            format!("invalid schema document for global setting {}", entity.name)
        })?;

        Ok(Self {
            name: entity.name,
            min_auth_level,
            schema,
            value: entity.value,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            updated_by: entity.updated_by,
        })
    }
}

impl TryFrom<&GlobalSetting> for entity::global::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &GlobalSetting) -> Result<Self, Self::Error> {
        use sea_orm::ActiveValue::*;

        Ok(Self {
            name: Set(model.name.clone()),
            min_auth_level: Set(model.min_auth_level.as_str().to_string()),
            schema: Set(serde_json::to_value(&model.schema)?),
            value: Set(model.value.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
            updated_by: Set(model.updated_by),
        })
    }
}

// ===== Changelog Conversions =====

impl From<entity::changelog::Model> for SettingsChangelogEntry {
    fn from(entity: entity::changelog::Model) -> Self {
        Self {
            product_id: entity.product_id,
            setting_name: entity.setting_name,
            version: entity.version,
            patch: entity.patch,
            editor_id: entity.editor_id,
            created_at: entity.created_at,
        }
    }
}

impl From<&SettingsChangelogEntry> for entity::changelog::ActiveModel {
    fn from(model: &SettingsChangelogEntry) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            product_id: Set(model.product_id),
            setting_name: Set(model.setting_name.clone()),
            version: Set(model.version),
            patch: Set(model.patch.clone()),
            editor_id: Set(model.editor_id),
            created_at: Set(model.created_at),
        }
    }
}

fn parse_auth_level(raw: &str) -> anyhow::Result<AuthLevel> {
    AuthLevel::parse(raw).ok_or_else(|| anyhow::anyhow!("unknown authorization level {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_round_trip() {
        let param = SettingParameter {
            name: "Rejector.DelayMS".to_string(),
            min_auth_level: AuthLevel::Supervisor,
            schema: SchemaDocument::integer_range(0, 10000),
            containers_affected: Some(vec!["rejector".to_string()]),
        };

        let active = entity::parameter::ActiveModel::try_from(&param).unwrap();
        let model = entity::parameter::Model {
            name: active.name.unwrap(),
            min_auth_level: active.min_auth_level.unwrap(),
            schema: active.schema.unwrap(),
            containers_affected: active.containers_affected.unwrap(),
        };

        assert_eq!(SettingParameter::try_from(model).unwrap(), param);
    }

    #[test]
    fn test_unknown_auth_level_is_rejected() {
        let model = entity::parameter::Model {
            name: "Rejector.DelayMS".to_string(),
            min_auth_level: "ROOT".to_string(),
            schema: json!({"type": "boolean"}),
            containers_affected: None,
        };

        assert!(SettingParameter::try_from(model).is_err());
    }

    #[test]
    fn test_global_setting_without_value() {
        let model = entity::global::Model {
            name: "Watchdog.Timer".to_string(),
            min_auth_level: "ENGINEER".to_string(),
            schema: json!({"type": "boolean"}),
            value: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            updated_by: None,
        };

        let global = GlobalSetting::try_from(model).unwrap();
        assert_eq!(global.min_auth_level, AuthLevel::Engineer);
        assert!(global.value.is_none());
    }
}
