//! Domain events emitted after committed writes
//!
//! Events are published only once the transaction has committed; a failed
//! publish is logged and never rolls the write back.

use crate::contract::{GlobalSetting, ProductSetting};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Events other modules can subscribe to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SettingEvent {
    /// First version of a product setting was written
    SettingCreated(SettingWritePayload),
    /// A product setting advanced to a new version
    SettingChanged(SettingWritePayload),
    /// A product setting was tombstoned; value and version are frozen
    SettingTombstoned(SettingWritePayload),
    /// A line-wide setting was overwritten in place
    GlobalSettingChanged(GlobalWritePayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingWritePayload {
    pub product_id: i64,
    pub setting_name: String,
    pub version: i64,
    pub editor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalWritePayload {
    pub setting_name: String,
    pub editor_id: i64,
}

impl SettingEvent {
    pub fn created(setting: &ProductSetting) -> Self {
        Self::SettingCreated(SettingWritePayload {
            product_id: setting.product_id,
            setting_name: setting.name.clone(),
            version: setting.version,
            editor_id: setting.updated_by,
        })
    }

    pub fn changed(setting: &ProductSetting) -> Self {
        Self::SettingChanged(SettingWritePayload {
            product_id: setting.product_id,
            setting_name: setting.name.clone(),
            version: setting.version,
            editor_id: setting.updated_by,
        })
    }

    pub fn tombstoned(setting: &ProductSetting) -> Self {
        Self::SettingTombstoned(SettingWritePayload {
            product_id: setting.product_id,
            setting_name: setting.name.clone(),
            version: setting.version,
            editor_id: setting.updated_by,
        })
    }

    pub fn global_changed(setting: &GlobalSetting, editor_id: i64) -> Self {
        Self::GlobalSettingChanged(GlobalWritePayload {
            setting_name: setting.name.clone(),
            editor_id,
        })
    }
}

/// Outbound event channel
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: SettingEvent) -> anyhow::Result<()>;
}

/// Publisher that drops every event, for tests and standalone deployments
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: SettingEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
