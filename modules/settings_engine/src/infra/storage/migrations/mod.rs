//! Database migrations for the settings engine

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250312_000001_create_setting_parameters::Migration),
            Box::new(m20250312_000002_create_product_settings::Migration),
            Box::new(m20250312_000003_create_global_settings::Migration),
            Box::new(m20250312_000004_create_settings_changelog::Migration),
        ]
    }
}

mod m20250312_000001_create_setting_parameters {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SettingParameters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SettingParameters::Name)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SettingParameters::MinAuthLevel)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SettingParameters::Schema).json().not_null())
                        .col(ColumnDef::new(SettingParameters::ContainersAffected).json())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SettingParameters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SettingParameters {
        Table,
        Name,
        MinAuthLevel,
        Schema,
        ContainersAffected,
    }
}

mod m20250312_000002_create_product_settings {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductSettings::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductSettings::Name).string().not_null())
                        .col(ColumnDef::new(ProductSettings::Value).json().not_null())
                        .col(
                            ColumnDef::new(ProductSettings::Version)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSettings::CreatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSettings::UpdatedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductSettings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(ProductSettings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(ProductSettings::DeletedAt).timestamp_with_time_zone())
                        .primary_key(
                            Index::create()
                                .col(ProductSettings::ProductId)
                                .col(ProductSettings::Name),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_settings_parameter")
                                .from(ProductSettings::Table, ProductSettings::Name)
                                .to(SettingParameters::Table, SettingParameters::Name)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Create indexes
            manager
                .create_index(
                    Index::create()
                        .name("idx_product_settings_product_id")
                        .table(ProductSettings::Table)
                        .col(ProductSettings::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_settings_name")
                        .table(ProductSettings::Table)
                        .col(ProductSettings::Name)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductSettings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductSettings {
        Table,
        ProductId,
        Name,
        Value,
        Version,
        CreatedBy,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
        DeletedAt,
    }

    #[derive(DeriveIden)]
    enum SettingParameters {
        Table,
        Name,
    }
}

mod m20250312_000003_create_global_settings {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(GlobalSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GlobalSettings::Name)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(GlobalSettings::MinAuthLevel)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GlobalSettings::Schema).json().not_null())
                        .col(ColumnDef::new(GlobalSettings::Value).json())
                        .col(
                            ColumnDef::new(GlobalSettings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(GlobalSettings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(GlobalSettings::UpdatedBy).big_integer())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GlobalSettings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum GlobalSettings {
        Table,
        Name,
        MinAuthLevel,
        Schema,
        Value,
        CreatedAt,
        UpdatedAt,
        UpdatedBy,
    }
}

mod m20250312_000004_create_settings_changelog {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SettingsChangelog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SettingsChangelog::ProductId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SettingsChangelog::SettingName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SettingsChangelog::Version)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SettingsChangelog::Patch).text().not_null())
                        .col(
                            ColumnDef::new(SettingsChangelog::EditorId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SettingsChangelog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(SettingsChangelog::ProductId)
                                .col(SettingsChangelog::SettingName)
                                .col(SettingsChangelog::Version),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_settings_changelog_product_setting")
                                .from(
                                    SettingsChangelog::Table,
                                    (SettingsChangelog::ProductId, SettingsChangelog::SettingName),
                                )
                                .to(
                                    ProductSettings::Table,
                                    (ProductSettings::ProductId, ProductSettings::Name),
                                )
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_settings_changelog_product_setting")
                        .table(SettingsChangelog::Table)
                        .col(SettingsChangelog::ProductId)
                        .col(SettingsChangelog::SettingName)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SettingsChangelog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SettingsChangelog {
        Table,
        ProductId,
        SettingName,
        Version,
        Patch,
        EditorId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductSettings {
        Table,
        ProductId,
        Name,
    }
}
