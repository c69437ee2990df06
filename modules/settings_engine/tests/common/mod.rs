//! Shared test fixtures: in-memory repositories and service builders

use settings_engine::config::Config;
use settings_engine::contract::*;
use settings_engine::domain::{ChangelogRecorder, SchemaRegistry, Service};
use settings_engine::fixtures;
use std::sync::Arc;

// Mock repository implementations for testing
pub mod mocks {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use parking_lot::RwLock;
    use settings_engine::contract::*;
    use settings_engine::domain::repository::{
        ChangelogRepository, GlobalSettingRepository, ParameterRepository,
        ProductSettingRepository, SettingChange,
    };
    use settings_engine::domain::{EventPublisher, SettingEvent};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct MockParameterRepo {
        data: Arc<RwLock<HashMap<String, SettingParameter>>>,
    }

    impl MockParameterRepo {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ParameterRepository for MockParameterRepo {
        async fn insert(&self, param: &SettingParameter) -> anyhow::Result<()> {
            self.data.write().insert(param.name.clone(), param.clone());
            Ok(())
        }

        async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<SettingParameter>> {
            Ok(self.data.read().get(name).cloned())
        }

        async fn list_all(&self) -> anyhow::Result<Vec<SettingParameter>> {
            Ok(self.data.read().values().cloned().collect())
        }

        async fn count(&self) -> anyhow::Result<u64> {
            Ok(self.data.read().len() as u64)
        }
    }

    #[derive(Clone, Default)]
    pub struct MockProductSettingRepo {
        rows: Arc<RwLock<HashMap<(i64, String), ProductSetting>>>,
        entries: Arc<RwLock<Vec<SettingsChangelogEntry>>>,
        forced_guard_misses: Arc<RwLock<u32>>,
    }

    impl MockProductSettingRepo {
        pub fn with_shared_entries(entries: Arc<RwLock<Vec<SettingsChangelogEntry>>>) -> Self {
            Self {
                rows: Arc::new(RwLock::new(HashMap::new())),
                entries,
                forced_guard_misses: Arc::new(RwLock::new(0)),
            }
        }

        /// Make the next `misses` commit attempts lose their version guard,
        /// as if another writer always got there first
        pub fn force_guard_misses(&self, misses: u32) {
            *self.forced_guard_misses.write() = misses;
        }

        pub fn row(&self, product_id: i64, name: &str) -> Option<ProductSetting> {
            self.rows
                .read()
                .get(&(product_id, name.to_string()))
                .cloned()
        }
    }

    #[async_trait]
    impl ProductSettingRepository for MockProductSettingRepo {
        async fn insert(&self, setting: &ProductSetting) -> anyhow::Result<()> {
            let key = (setting.product_id, setting.name.clone());
            let mut rows = self.rows.write();
            if rows.contains_key(&key) {
                anyhow::bail!("duplicate key {key:?}");
            }
            rows.insert(key, setting.clone());
            Ok(())
        }

        async fn find(
            &self,
            product_id: i64,
            name: &str,
        ) -> anyhow::Result<Option<ProductSetting>> {
            Ok(self
                .rows
                .read()
                .get(&(product_id, name.to_string()))
                .cloned())
        }

        async fn find_by_product(&self, product_id: i64) -> anyhow::Result<Vec<ProductSetting>> {
            let mut results: Vec<ProductSetting> = self
                .rows
                .read()
                .values()
                .filter(|s| s.product_id == product_id)
                .cloned()
                .collect();
            results.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(results)
        }

        async fn commit_change(&self, change: &SettingChange) -> anyhow::Result<bool> {
            // One lock spans the guard check, the row update, and the
            // changelog append, mirroring the real transaction.
            let mut rows = self.rows.write();

            {
                let mut forced = self.forced_guard_misses.write();
                if *forced > 0 {
                    *forced -= 1;
                    return Ok(false);
                }
            }

            let key = (change.product_id, change.name.clone());
            match rows.get_mut(&key) {
                Some(row)
                    if row.deleted_at.is_none() && row.version == change.expected_version =>
                {
                    row.value = change.new_value.clone();
                    row.version = change.entry.version;
                    row.updated_by = change.editor_id;
                    row.updated_at = change.changed_at;
                    self.entries.write().push(change.entry.clone());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn mark_deleted(
            &self,
            product_id: i64,
            name: &str,
            editor_id: i64,
            at: DateTime<Utc>,
        ) -> anyhow::Result<bool> {
            let mut rows = self.rows.write();
            match rows.get_mut(&(product_id, name.to_string())) {
                Some(row) if row.deleted_at.is_none() => {
                    row.deleted_at = Some(at);
                    row.updated_by = editor_id;
                    row.updated_at = at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    #[derive(Clone, Default)]
    pub struct MockGlobalSettingRepo {
        data: Arc<RwLock<HashMap<String, GlobalSetting>>>,
    }

    impl MockGlobalSettingRepo {
        pub fn seeded(settings: Vec<GlobalSetting>) -> Self {
            let repo = Self::default();
            {
                let mut data = repo.data.write();
                for setting in settings {
                    data.insert(setting.name.clone(), setting);
                }
            }
            repo
        }

        pub fn row(&self, name: &str) -> Option<GlobalSetting> {
            self.data.read().get(name).cloned()
        }
    }

    #[async_trait]
    impl GlobalSettingRepository for MockGlobalSettingRepo {
        async fn insert(&self, setting: &GlobalSetting) -> anyhow::Result<()> {
            self.data
                .write()
                .insert(setting.name.clone(), setting.clone());
            Ok(())
        }

        async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<GlobalSetting>> {
            Ok(self.data.read().get(name).cloned())
        }

        async fn list_all(&self) -> anyhow::Result<Vec<GlobalSetting>> {
            let mut results: Vec<GlobalSetting> = self.data.read().values().cloned().collect();
            results.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(results)
        }

        async fn update_value(
            &self,
            name: &str,
            value: &serde_json::Value,
            editor_id: i64,
            at: DateTime<Utc>,
        ) -> anyhow::Result<bool> {
            match self.data.write().get_mut(name) {
                Some(row) => {
                    row.value = Some(value.clone());
                    row.updated_by = Some(editor_id);
                    row.updated_at = at;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn count(&self) -> anyhow::Result<u64> {
            Ok(self.data.read().len() as u64)
        }
    }

    #[derive(Clone, Default)]
    pub struct MockChangelogRepo {
        entries: Arc<RwLock<Vec<SettingsChangelogEntry>>>,
    }

    impl MockChangelogRepo {
        pub fn entries_handle(&self) -> Arc<RwLock<Vec<SettingsChangelogEntry>>> {
            self.entries.clone()
        }

        pub fn all_entries(&self) -> Vec<SettingsChangelogEntry> {
            self.entries.read().clone()
        }
    }

    #[async_trait]
    impl ChangelogRepository for MockChangelogRepo {
        async fn list(
            &self,
            product_id: i64,
            name_query: Option<&str>,
            limit: u64,
            offset: u64,
        ) -> anyhow::Result<Vec<SettingsChangelogEntry>> {
            let mut results: Vec<SettingsChangelogEntry> = self
                .entries
                .read()
                .iter()
                .filter(|e| e.product_id == product_id)
                .filter(|e| name_query.map_or(true, |q| e.setting_name.contains(q)))
                .cloned()
                .collect();
            results.sort_by(|a, b| {
                a.setting_name
                    .cmp(&b.setting_name)
                    .then(a.version.cmp(&b.version))
            });
            Ok(results
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }
    }

    #[derive(Default)]
    pub struct RecordingEventPublisher {
        events: RwLock<Vec<SettingEvent>>,
    }

    impl RecordingEventPublisher {
        pub fn events(&self) -> Vec<SettingEvent> {
            self.events.read().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingEventPublisher {
        async fn publish(&self, event: SettingEvent) -> anyhow::Result<()> {
            self.events.write().push(event);
            Ok(())
        }
    }
}

/// Everything a test can reach into: the service plus the raw stores
pub struct TestHarness {
    pub service: Service,
    pub product_repo: Arc<mocks::MockProductSettingRepo>,
    pub global_repo: Arc<mocks::MockGlobalSettingRepo>,
    pub changelog_repo: Arc<mocks::MockChangelogRepo>,
    pub events: Arc<mocks::RecordingEventPublisher>,
}

/// Service over the stock catalog with default configuration
pub fn create_test_harness() -> TestHarness {
    create_test_harness_with_config(Config::default())
}

pub fn create_test_harness_with_config(config: Config) -> TestHarness {
    let registry = Arc::new(SchemaRegistry::new(fixtures::stock_parameters()));
    let changelog_repo = Arc::new(mocks::MockChangelogRepo::default());
    let product_repo = Arc::new(mocks::MockProductSettingRepo::with_shared_entries(
        changelog_repo.entries_handle(),
    ));
    let global_repo = Arc::new(mocks::MockGlobalSettingRepo::seeded(
        fixtures::stock_global_settings(chrono::Utc::now()),
    ));
    let events = Arc::new(mocks::RecordingEventPublisher::default());

    let service = Service::new(
        registry,
        product_repo.clone(),
        global_repo.clone(),
        ChangelogRecorder::new(changelog_repo.clone()),
        events.clone(),
        config,
    );

    TestHarness {
        service,
        product_repo,
        global_repo,
        changelog_repo,
        events,
    }
}

/// Pull the validation fault out of an error, panicking on anything else
pub fn expect_validation_fault(err: SettingsError) -> ValidationFault {
    match err {
        SettingsError::Validation(fault) => fault,
        other => panic!("expected validation error, got {other:?}"),
    }
}
