//! Domain service - gating, validation, and versioned writes

use super::changelog::ChangelogRecorder;
use super::diff;
use super::events::{EventPublisher, SettingEvent};
use super::registry::SchemaRegistry;
use super::repository::{GlobalSettingRepository, ProductSettingRepository, SettingChange};
use super::validation;
use crate::config::Config;
use crate::contract::{
    AuthContext, AuthLevel, GlobalSetting, ProductSetting, SettingParameter,
    SettingsChangelogEntry, SettingsError, UpdateOutcome,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Domain service for settings management
pub struct Service {
    registry: Arc<SchemaRegistry>,
    product_repo: Arc<dyn ProductSettingRepository>,
    global_repo: Arc<dyn GlobalSettingRepository>,
    recorder: ChangelogRecorder,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        registry: Arc<SchemaRegistry>,
        product_repo: Arc<dyn ProductSettingRepository>,
        global_repo: Arc<dyn GlobalSettingRepository>,
        recorder: ChangelogRecorder,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            registry,
            product_repo,
            global_repo,
            recorder,
            event_publisher,
            config,
        }
    }

    // ===== Product Setting Operations =====

    /// Write the first version of a product setting
    pub async fn create_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError> {
        let param = self.registry.lookup(name)?;
        self.authorize(name, param.min_auth_level, actor)?;
        validation::check_value_size(&value, self.config.max_value_bytes)?;
        let normalized = validation::validate(&value, &param.schema)?;

        // A tombstoned row still occupies the (product, name) pair.
        let existing = self
            .product_repo
            .find(product_id, name)
            .await
            .map_err(|_| SettingsError::Internal)?;
        if existing.is_some() {
            return Err(SettingsError::AlreadyExists {
                product_id,
                name: name.to_string(),
            });
        }

        let now = Utc::now();
        let setting = ProductSetting {
            product_id,
            name: name.to_string(),
            value: normalized,
            version: 1,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.product_repo
            .insert(&setting)
            .await
            .map_err(|_| SettingsError::Internal)?;

        info!(product_id, name, "created product setting at version 1");
        self.publish(SettingEvent::created(&setting)).await;
        Ok(setting)
    }

    /// Validate a candidate value and commit it as the next version.
    ///
    /// A candidate structurally equal to the current value is a no-op: no
    /// version bump, no changelog entry. The current row is re-read on every
    /// attempt and the write is guarded by the version it carried, so racing
    /// writers serialize per key; a writer that keeps losing the guard past
    /// the retry budget gets `Conflict`.
    pub async fn update_setting(
        &self,
        product_id: i64,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<UpdateOutcome, SettingsError> {
        let param = self.registry.lookup(name)?;
        self.authorize(name, param.min_auth_level, actor)?;
        validation::check_value_size(&value, self.config.max_value_bytes)?;
        let normalized = validation::validate(&value, &param.schema)?;

        for attempt in 1..=self.config.cas_retry_limit {
            let current = self.fresh_setting(product_id, name).await?;
            if current.is_tombstoned() {
                return Err(not_found_setting(product_id, name));
            }

            if normalized == current.value {
                debug!(product_id, name, version = current.version, "no-op write");
                return Ok(UpdateOutcome::Unchanged(current));
            }

            let now = Utc::now();
            let next_version = current.version + 1;
            let patch = diff::make_patch(&current.value, &normalized).map_err(|err| {
                error!(product_id, name, error = %err, "failed to build patch");
                SettingsError::Internal
            })?;
            self.verify_patch(product_id, name, &current.value, &normalized, &patch)?;

            let change = SettingChange {
                product_id,
                name: name.to_string(),
                expected_version: current.version,
                new_value: normalized.clone(),
                editor_id: actor.user_id,
                changed_at: now,
                entry: ChangelogRecorder::draft(
                    product_id,
                    name,
                    next_version,
                    patch,
                    actor.user_id,
                    now,
                ),
            };
            let committed = self
                .product_repo
                .commit_change(&change)
                .await
                .map_err(|_| SettingsError::Internal)?;

            if committed {
                let updated = ProductSetting {
                    value: normalized.clone(),
                    version: next_version,
                    updated_by: actor.user_id,
                    updated_at: now,
                    ..current
                };
                info!(
                    product_id,
                    name,
                    version = next_version,
                    "committed product setting change"
                );
                self.publish(SettingEvent::changed(&updated)).await;
                return Ok(UpdateOutcome::Committed(updated));
            }

            warn!(product_id, name, attempt, "version guard missed, retrying");
        }

        Err(SettingsError::Conflict {
            product_id,
            name: name.to_string(),
            attempts: self.config.cas_retry_limit,
        })
    }

    /// Tombstone a product setting; value and version freeze at their last
    /// state and further writes are refused
    pub async fn delete_setting(
        &self,
        product_id: i64,
        name: &str,
        actor: &AuthContext,
    ) -> Result<ProductSetting, SettingsError> {
        let param = self.registry.lookup(name)?;
        self.authorize(name, param.min_auth_level, actor)?;

        let current = self.fresh_setting(product_id, name).await?;
        if current.is_tombstoned() {
            return Err(not_found_setting(product_id, name));
        }

        let now = Utc::now();
        let deleted = self
            .product_repo
            .mark_deleted(product_id, name, actor.user_id, now)
            .await
            .map_err(|_| SettingsError::Internal)?;
        if !deleted {
            // Lost a race with another tombstone.
            return Err(not_found_setting(product_id, name));
        }

        let frozen = ProductSetting {
            updated_by: actor.user_id,
            updated_at: now,
            deleted_at: Some(now),
            ..current
        };
        info!(
            product_id,
            name,
            version = frozen.version,
            "tombstoned product setting"
        );
        self.publish(SettingEvent::tombstoned(&frozen)).await;
        Ok(frozen)
    }

    /// Get one product setting; tombstoned rows are still returned
    pub async fn get_setting(
        &self,
        product_id: i64,
        name: &str,
    ) -> Result<ProductSetting, SettingsError> {
        self.fresh_setting(product_id, name).await
    }

    /// All settings of one product, tombstoned included, sorted by name
    pub async fn get_product_settings(
        &self,
        product_id: i64,
    ) -> Result<Vec<ProductSetting>, SettingsError> {
        self.product_repo
            .find_by_product(product_id)
            .await
            .map_err(|_| SettingsError::Internal)
    }

    /// Page through the change history of a product
    pub async fn get_changelog(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<SettingsChangelogEntry>, SettingsError> {
        let page = self.config.changelog_page_size;
        let limit = limit.unwrap_or(page).min(page);
        self.recorder
            .history(product_id, name_query, limit, offset.unwrap_or(0))
            .await
            .map_err(|_| SettingsError::Internal)
    }

    // ===== Parameter Catalog Operations =====

    /// Look up one catalog entry
    pub fn get_parameter(&self, name: &str) -> Result<SettingParameter, SettingsError> {
        self.registry.lookup(name).cloned()
    }

    /// List catalog entries, optionally narrowed by a name substring
    pub fn list_parameters(&self, name_query: Option<&str>) -> Vec<SettingParameter> {
        self.registry.list(name_query)
    }

    // ===== Global Setting Operations =====

    /// Get one line-wide setting
    pub async fn get_global_setting(&self, name: &str) -> Result<GlobalSetting, SettingsError> {
        self.global_repo
            .find_by_name(name)
            .await
            .map_err(|_| SettingsError::Internal)?
            .ok_or_else(|| SettingsError::NotFound {
                resource: "global setting".to_string(),
                key: name.to_string(),
            })
    }

    /// All line-wide settings, sorted by name
    pub async fn list_global_settings(&self) -> Result<Vec<GlobalSetting>, SettingsError> {
        self.global_repo
            .list_all()
            .await
            .map_err(|_| SettingsError::Internal)
    }

    /// Validate and overwrite a line-wide setting in place.
    ///
    /// Globals carry no version and no changelog; only last-editor and
    /// timestamp bookkeeping move.
    pub async fn update_global_setting(
        &self,
        name: &str,
        value: serde_json::Value,
        actor: &AuthContext,
    ) -> Result<GlobalSetting, SettingsError> {
        let current = self.get_global_setting(name).await?;
        self.authorize(name, current.min_auth_level, actor)?;
        validation::check_value_size(&value, self.config.max_value_bytes)?;
        let normalized = validation::validate(&value, &current.schema)?;

        let now = Utc::now();
        let updated = self
            .global_repo
            .update_value(name, &normalized, actor.user_id, now)
            .await
            .map_err(|_| SettingsError::Internal)?;
        if !updated {
            return Err(SettingsError::NotFound {
                resource: "global setting".to_string(),
                key: name.to_string(),
            });
        }

        let row = GlobalSetting {
            value: Some(normalized),
            updated_at: now,
            updated_by: Some(actor.user_id),
            ..current
        };
        info!(name, "updated global setting");
        self.publish(SettingEvent::global_changed(&row, actor.user_id))
            .await;
        Ok(row)
    }

    // ===== Helpers =====

    fn authorize(
        &self,
        name: &str,
        required: AuthLevel,
        actor: &AuthContext,
    ) -> Result<(), SettingsError> {
        if actor.level < required {
            return Err(SettingsError::Forbidden {
                name: name.to_string(),
                required,
                actual: actor.level,
            });
        }
        Ok(())
    }

    /// Load the current row; never served from a cache, every write attempt
    /// re-reads it
    async fn fresh_setting(
        &self,
        product_id: i64,
        name: &str,
    ) -> Result<ProductSetting, SettingsError> {
        self.product_repo
            .find(product_id, name)
            .await
            .map_err(|_| SettingsError::Internal)?
            .ok_or_else(|| not_found_setting(product_id, name))
    }

    /// A patch this engine just produced must rebuild the previous value;
    /// anything else means the stored history would be unreadable
    fn verify_patch(
        &self,
        product_id: i64,
        name: &str,
        old: &serde_json::Value,
        new: &serde_json::Value,
        patch: &str,
    ) -> Result<(), SettingsError> {
        let rebuilt = diff::apply_inverse(new, patch).map_err(|err| {
            error!(product_id, name, error = %err, "self-produced patch failed to apply");
            SettingsError::Integrity {
                message: format!("self-produced patch failed to apply: {err}"),
            }
        })?;
        if rebuilt != *old {
            error!(product_id, name, "self-produced patch rebuilt the wrong value");
            return Err(SettingsError::Integrity {
                message: "self-produced patch rebuilt the wrong value".to_string(),
            });
        }
        Ok(())
    }

    async fn publish(&self, event: SettingEvent) {
        if let Err(err) = self.event_publisher.publish(event).await {
            warn!(error = %err, "failed to publish setting event");
        }
    }
}

fn not_found_setting(product_id: i64, name: &str) -> SettingsError {
    SettingsError::NotFound {
        resource: "product setting".to_string(),
        key: format!("{product_id}/{name}"),
    }
}
