//! Native client trait for in-process callers
//!
//! This trait is the boundary the transport layer consumes.
//! NO HTTP - direct function calls for performance.

use super::{
    error::SettingsError,
    model::{
        AuthContext, GlobalSetting, ProductSetting, SettingParameter, SettingsChangelogEntry,
        UpdateOutcome,
    },
};
use async_trait::async_trait;

/// Settings engine API for in-process callers
#[async_trait]
pub trait SettingsApi: Send + Sync {
    // ===== Product Setting Operations =====

    /// Create the first version of a product setting
    async fn create_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError>;

    /// Validate and write a new value; structurally equal candidates no-op
    async fn update_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<UpdateOutcome, SettingsError>;

    /// Tombstone a product setting (soft delete; reads keep returning it)
    async fn delete_setting(
        &self,
        product_id: i64,
        name: &str,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError>;

    /// Get one product setting, tombstoned rows included
    async fn get_setting(
        &self,
        product_id: i64,
        name: &str,
    ) -> Result<ProductSetting, SettingsError>;

    /// All settings of one product, sorted by name
    async fn get_product_settings(
        &self,
        product_id: i64,
    ) -> Result<Vec<ProductSetting>, SettingsError>;

    /// Change history of a product, optionally filtered by name substring
    async fn get_changelog(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<SettingsChangelogEntry>, SettingsError>;

    // ===== Parameter Catalog Operations =====

    /// Look up one catalog entry
    async fn get_parameter(&self, name: &str) -> Result<SettingParameter, SettingsError>;

    /// List catalog entries, optionally filtered by name substring
    async fn list_parameters(
        &self,
        name_query: Option<&str>,
    ) -> Result<Vec<SettingParameter>, SettingsError>;

    // ===== Global Setting Operations =====

    /// Get one global setting
    async fn get_global_setting(&self, name: &str) -> Result<GlobalSetting, SettingsError>;

    /// All global settings, sorted by name
    async fn list_global_settings(&self) -> Result<Vec<GlobalSetting>, SettingsError>;

    /// Validate and overwrite a global setting value in place
    async fn update_global_setting(
        &self,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<GlobalSetting, SettingsError>;
}
