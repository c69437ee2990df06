//! Domain layer - business logic and services

pub mod changelog;
pub mod diff;
pub mod events;
pub mod registry;
pub mod repository;
pub mod service;
pub mod validation;

pub use changelog::ChangelogRecorder;
pub use events::{EventPublisher, NoOpEventPublisher, SettingEvent};
pub use registry::SchemaRegistry;
pub use repository::{
    ChangelogRepository, GlobalSettingRepository, ParameterRepository, ProductSettingRepository,
    SettingChange,
};
pub use service::Service;
