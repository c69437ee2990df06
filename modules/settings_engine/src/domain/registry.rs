//! In-memory catalog of parameter definitions

use crate::contract::{SettingParameter, SettingsError};
use crate::domain::repository::ParameterRepository;
use std::collections::HashMap;

/// Parameter definitions keyed by setting name.
///
/// The catalog only changes between releases, so it is loaded once at
/// startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    params: HashMap<String, SettingParameter>,
}

impl SchemaRegistry {
    pub fn new(params: Vec<SettingParameter>) -> Self {
        let params = params.into_iter().map(|p| (p.name.clone(), p)).collect();
        Self { params }
    }

    /// Build the registry from the stored catalog
    pub async fn load(repo: &dyn ParameterRepository) -> anyhow::Result<Self> {
        Ok(Self::new(repo.list_all().await?))
    }

    /// Definition registered for a setting name
    pub fn lookup(&self, name: &str) -> Result<&SettingParameter, SettingsError> {
        self.params
            .get(name)
            .ok_or_else(|| SettingsError::NotFound {
                resource: "parameter".to_string(),
                key: name.to_string(),
            })
    }

    /// Definitions whose name contains `name_query` (all when absent),
    /// sorted by name
    pub fn list(&self, name_query: Option<&str>) -> Vec<SettingParameter> {
        let mut out: Vec<SettingParameter> = self
            .params
            .values()
            .filter(|p| name_query.map_or(true, |q| p.name.contains(q)))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
