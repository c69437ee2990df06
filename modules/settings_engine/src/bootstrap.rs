//! Module wiring: migrations, first-start seeding, and the native client

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::{GlobalSetting, SettingParameter};
use crate::domain::repository::{GlobalSettingRepository, ParameterRepository};
use crate::domain::{ChangelogRecorder, NoOpEventPublisher, SchemaRegistry, Service};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::repositories::{
    SeaOrmChangelogRepository, SeaOrmGlobalSettingRepository, SeaOrmParameterRepository,
    SeaOrmProductSettingRepository,
};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Run migrations, seed an empty catalog, and wire the module together.
///
/// The returned client is the in-process API surface; transports sit on top
/// of it.
pub async fn bootstrap(
    db: Arc<DatabaseConnection>,
    config: Config,
    parameters: Vec<SettingParameter>,
    globals: Vec<GlobalSetting>,
) -> Result<NativeClient> {
    Migrator::up(&*db, None).await?;
    tracing::info!("settings engine migrations completed");

    let param_repo = Arc::new(SeaOrmParameterRepository::new(db.clone()));
    let global_repo = Arc::new(SeaOrmGlobalSettingRepository::new(db.clone()));

    // A provisioned database keeps its catalog; only an empty one is seeded.
    if param_repo.count().await? == 0 {
        for param in &parameters {
            param_repo.insert(param).await?;
        }
        tracing::info!(count = parameters.len(), "seeded parameter catalog");
    }
    if global_repo.count().await? == 0 {
        for setting in &globals {
            global_repo.insert(setting).await?;
        }
        tracing::info!(count = globals.len(), "seeded global settings");
    }

    let registry = Arc::new(SchemaRegistry::load(&*param_repo).await?);
    tracing::info!(parameters = registry.len(), "loaded schema registry");

    let product_repo = Arc::new(SeaOrmProductSettingRepository::new(db.clone()));
    let recorder = ChangelogRecorder::new(Arc::new(SeaOrmChangelogRepository::new(db)));

    let service = Arc::new(Service::new(
        registry,
        product_repo,
        global_repo,
        recorder,
        Arc::new(NoOpEventPublisher),
        config,
    ));

    tracing::info!("settings engine initialized");
    Ok(NativeClient::new(service))
}
