//! Contract layer - public API of the settings engine
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on entity models - these are pure domain types. Schema
//! documents are the exception: they round-trip to the stored JSON form.

pub mod client;
pub mod error;
pub mod model;
pub mod schema;

pub use client::SettingsApi;
pub use error::{PathSegment, SchemaConstraint, SettingsError, ValidationFault};
pub use model::{
    AuthContext, AuthLevel, GlobalSetting, ProductSetting, SettingParameter,
    SettingsChangelogEntry, UpdateOutcome,
};
pub use schema::{
    ArraySchema, IntegerSchema, NumberSchema, ObjectSchema, SchemaDocument, StringSchema,
};
