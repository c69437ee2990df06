//! Configuration for the settings engine module

use serde::Deserialize;

/// Settings engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Attempts a guarded write makes before giving up with Conflict
    #[serde(default = "default_cas_retry_limit")]
    pub cas_retry_limit: u32,

    /// Largest (and default) changelog page
    #[serde(default = "default_changelog_page_size")]
    pub changelog_page_size: u64,

    /// Maximum serialized setting value size in bytes
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cas_retry_limit: default_cas_retry_limit(),
            changelog_page_size: default_changelog_page_size(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

fn default_cas_retry_limit() -> u32 {
    3
}

fn default_changelog_page_size() -> u64 {
    100
}

fn default_max_value_bytes() -> usize {
    1024 * 1024 // 1MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cas_retry_limit, 3);
        assert_eq!(config.changelog_page_size, 100);
        assert_eq!(config.max_value_bytes, 1024 * 1024);
    }

    #[test]
    fn test_deserializes_with_partial_fields() {
        let config: Config = serde_json::from_str(r#"{"cas_retry_limit": 5}"#).unwrap();
        assert_eq!(config.cas_retry_limit, 5);
        assert_eq!(config.changelog_page_size, 100);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"cas_retries": 5}"#);
        assert!(result.is_err());
    }
}
