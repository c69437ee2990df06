//! Settings Engine Module
//!
//! Versioned, schema-validated configuration for an X-ray food-inspection
//! line. Per-product settings advance through validated, changelog-tracked
//! versions under optimistic concurrency; line-wide settings are overwritten
//! in place behind the same validation and authorization gates.

// Public exports
pub mod contract;
pub use contract::{
    client::SettingsApi, error::SettingsError, schema::SchemaDocument, AuthContext, AuthLevel,
    GlobalSetting, ProductSetting, SettingParameter, SettingsChangelogEntry, UpdateOutcome,
    ValidationFault,
};

pub mod bootstrap;
pub use bootstrap::bootstrap;
pub use api::native::NativeClient;

pub mod fixtures;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
