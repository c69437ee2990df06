//! Native client implementation - wraps the domain service for in-process calls

use crate::contract::{
    AuthContext, GlobalSetting, ProductSetting, SettingParameter, SettingsApi,
    SettingsChangelogEntry, SettingsError, UpdateOutcome,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that directly calls the domain service
///
/// Used for in-process communication without transport overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SettingsApi for NativeClient {
    async fn create_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError> {
        self.service
            .create_setting(product_id, name, value, actor)
            .await
    }

    async fn update_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<UpdateOutcome, SettingsError> {
        self.service
            .update_setting(product_id, name, value, actor)
            .await
    }

    async fn delete_setting(
        &self,
        product_id: i64,
        name: &str,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError> {
        self.service.delete_setting(product_id, name, actor).await
    }

    async fn get_setting(
        &self,
        product_id: i64,
        name: &str,
    ) -> Result<ProductSetting, SettingsError> {
        self.service.get_setting(product_id, name).await
    }

    async fn get_product_settings(
        &self,
        product_id: i64,
    ) -> Result<Vec<ProductSetting>, SettingsError> {
        self.service.get_product_settings(product_id).await
    }

    async fn get_changelog(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<SettingsChangelogEntry>, SettingsError> {
        self.service
            .get_changelog(product_id, name_query, limit, offset)
            .await
    }

    async fn get_parameter(&self, name: &str) -> Result<SettingParameter, SettingsError> {
        self.service.get_parameter(name)
    }

    async fn list_parameters(
        &self,
        name_query: Option<&str>,
    ) -> Result<Vec<SettingParameter>, SettingsError> {
        Ok(self.service.list_parameters(name_query))
    }

    async fn get_global_setting(&self, name: &str) -> Result<GlobalSetting, SettingsError> {
        self.service.get_global_setting(name).await
    }

    async fn list_global_settings(&self) -> Result<Vec<GlobalSetting>, SettingsError> {
        self.service.list_global_settings().await
    }

    async fn update_global_setting(
        &self,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<GlobalSetting, SettingsError> {
        self.service
            .update_global_setting(name, value, actor)
            .await
    }
}
