//! Persistence traits the domain layer depends on

use crate::contract::{GlobalSetting, ProductSetting, SettingParameter, SettingsChangelogEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// One version-guarded write: the row update and its changelog entry must
/// commit together or not at all.
#[derive(Debug, Clone)]
pub struct SettingChange {
    pub product_id: i64,
    pub name: String,
    /// Version the row must still carry for the write to land
    pub expected_version: i64,
    pub new_value: Value,
    pub editor_id: i64,
    pub changed_at: DateTime<Utc>,
    /// Changelog entry recorded alongside the update
    pub entry: SettingsChangelogEntry,
}

/// Access to the parameter catalog
#[async_trait]
pub trait ParameterRepository: Send + Sync {
    async fn insert(&self, param: &SettingParameter) -> anyhow::Result<()>;

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<SettingParameter>>;

    async fn list_all(&self) -> anyhow::Result<Vec<SettingParameter>>;

    async fn count(&self) -> anyhow::Result<u64>;
}

/// Access to per-product setting rows
#[async_trait]
pub trait ProductSettingRepository: Send + Sync {
    /// Insert the first version of a setting row
    async fn insert(&self, setting: &ProductSetting) -> anyhow::Result<()>;

    /// Fetch one row, tombstoned or not
    async fn find(&self, product_id: i64, name: &str) -> anyhow::Result<Option<ProductSetting>>;

    /// All rows for a product, tombstoned included, sorted by name
    async fn find_by_product(&self, product_id: i64) -> anyhow::Result<Vec<ProductSetting>>;

    /// Apply a version-guarded update and record its changelog entry in one
    /// transaction. Returns false when the guard missed, i.e. the row no
    /// longer carries `expected_version` or was tombstoned in the meantime.
    async fn commit_change(&self, change: &SettingChange) -> anyhow::Result<bool>;

    /// Tombstone a live row. Returns false when no live row matched.
    async fn mark_deleted(
        &self,
        product_id: i64,
        name: &str,
        editor_id: i64,
        at: DateTime<Utc>,
    ) -> anyhow::Result<bool>;
}

/// Access to line-wide settings
#[async_trait]
pub trait GlobalSettingRepository: Send + Sync {
    async fn insert(&self, setting: &GlobalSetting) -> anyhow::Result<()>;

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<GlobalSetting>>;

    async fn list_all(&self) -> anyhow::Result<Vec<GlobalSetting>>;

    /// Overwrite the stored value. Returns false when no row matched.
    async fn update_value(
        &self,
        name: &str,
        value: &Value,
        editor_id: i64,
        at: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    async fn count(&self) -> anyhow::Result<u64>;
}

/// Read access to recorded changes
#[async_trait]
pub trait ChangelogRepository: Send + Sync {
    /// Entries for a product, optionally filtered to setting names containing
    /// `name_query`, ordered by setting name then version
    async fn list(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<SettingsChangelogEntry>>;
}
