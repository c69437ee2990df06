//! Append-only change history for product settings

use crate::contract::SettingsChangelogEntry;
use crate::domain::repository::ChangelogRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Builds and reads back changelog entries.
///
/// Entries are append-only: the draft built here is persisted inside the
/// same transaction as the version bump it describes, and nothing mutates
/// it afterwards, so paging through history is stable.
pub struct ChangelogRecorder {
    repo: Arc<dyn ChangelogRepository>,
}

impl ChangelogRecorder {
    pub fn new(repo: Arc<dyn ChangelogRepository>) -> Self {
        Self { repo }
    }

    /// Entry describing one accepted write, carrying the version the row
    /// holds after the write and the patch that rebuilds the previous value
    pub fn draft(
        product_id: i64,
        setting_name: &str,
        version: i64,
        patch: String,
        editor_id: i64,
        at: DateTime<Utc>,
    ) -> SettingsChangelogEntry {
        SettingsChangelogEntry {
            product_id,
            setting_name: setting_name.to_string(),
            version,
            patch,
            editor_id,
            created_at: at,
        }
    }

    /// Page through recorded entries for a product, optionally narrowed to
    /// setting names containing `name_query`
    pub async fn history(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<SettingsChangelogEntry>> {
        self.repo.list(product_id, name_query, limit, offset).await
    }
}
