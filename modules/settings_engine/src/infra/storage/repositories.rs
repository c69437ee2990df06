//! SeaORM repository implementations

use crate::contract::{GlobalSetting, ProductSetting, SettingParameter, SettingsChangelogEntry};
use crate::domain::repository::{
    ChangelogRepository, GlobalSettingRepository, ParameterRepository, ProductSettingRepository,
    SettingChange,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use std::sync::Arc;

use super::entity;

// ===== Parameter Repository =====

pub struct SeaOrmParameterRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmParameterRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParameterRepository for SeaOrmParameterRepository {
    async fn insert(&self, param: &SettingParameter) -> Result<()> {
        let active = entity::parameter::ActiveModel::try_from(param)?;

        // String and composite keys carry no last_insert_id to unpack.
        entity::parameter::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SettingParameter>> {
        let result = entity::parameter::Entity::find_by_id(name)
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<SettingParameter>> {
        let results = entity::parameter::Entity::find()
            .order_by_asc(entity::parameter::Column::Name)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(|e| e.try_into())
            .collect::<Result<Vec<_>>>()
    }

    async fn count(&self) -> Result<u64> {
        Ok(entity::parameter::Entity::find().count(&*self.db).await?)
    }
}

// ===== Product Setting Repository =====

pub struct SeaOrmProductSettingRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductSettingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductSettingRepository for SeaOrmProductSettingRepository {
    async fn insert(&self, setting: &ProductSetting) -> Result<()> {
        let active: entity::ActiveModel = setting.into();

        entity::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    async fn find(&self, product_id: i64, name: &str) -> Result<Option<ProductSetting>> {
        let result = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(product_id))
            .filter(entity::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn find_by_product(&self, product_id: i64) -> Result<Vec<ProductSetting>> {
        let results = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(product_id))
            .order_by_asc(entity::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn commit_change(&self, change: &SettingChange) -> Result<bool> {
        let txn = self.db.begin().await?;

        // The version filter is the optimistic guard: zero rows affected
        // means another writer got there first.
        let updated = entity::Entity::update_many()
            .col_expr(entity::Column::Value, Expr::value(change.new_value.clone()))
            .col_expr(entity::Column::Version, Expr::value(change.entry.version))
            .col_expr(entity::Column::UpdatedBy, Expr::value(change.editor_id))
            .col_expr(entity::Column::UpdatedAt, Expr::value(change.changed_at))
            .filter(entity::Column::ProductId.eq(change.product_id))
            .filter(entity::Column::Name.eq(&change.name))
            .filter(entity::Column::Version.eq(change.expected_version))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;

        if updated.rows_affected != 1 {
            txn.rollback().await?;
            return Ok(false);
        }

        let entry: entity::changelog::ActiveModel = (&change.entry).into();
        entity::changelog::Entity::insert(entry)
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    async fn mark_deleted(
        &self,
        product_id: i64,
        name: &str,
        editor_id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let updated = entity::Entity::update_many()
            .col_expr(entity::Column::DeletedAt, Expr::value(at))
            .col_expr(entity::Column::UpdatedBy, Expr::value(editor_id))
            .col_expr(entity::Column::UpdatedAt, Expr::value(at))
            .filter(entity::Column::ProductId.eq(product_id))
            .filter(entity::Column::Name.eq(name))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await?;

        Ok(updated.rows_affected > 0)
    }
}

// ===== Global Setting Repository =====

pub struct SeaOrmGlobalSettingRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmGlobalSettingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GlobalSettingRepository for SeaOrmGlobalSettingRepository {
    async fn insert(&self, setting: &GlobalSetting) -> Result<()> {
        let active = entity::global::ActiveModel::try_from(setting)?;

        entity::global::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<GlobalSetting>> {
        let result = entity::global::Entity::find_by_id(name)
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<GlobalSetting>> {
        let results = entity::global::Entity::find()
            .order_by_asc(entity::global::Column::Name)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(|e| e.try_into())
            .collect::<Result<Vec<_>>>()
    }

    async fn update_value(
        &self,
        name: &str,
        value: &serde_json::Value,
        editor_id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let updated = entity::global::Entity::update_many()
            .col_expr(entity::global::Column::Value, Expr::value(value.clone()))
            .col_expr(entity::global::Column::UpdatedBy, Expr::value(editor_id))
            .col_expr(entity::global::Column::UpdatedAt, Expr::value(at))
            .filter(entity::global::Column::Name.eq(name))
            .exec(&*self.db)
            .await?;

        Ok(updated.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(entity::global::Entity::find().count(&*self.db).await?)
    }
}

// ===== Changelog Repository =====

pub struct SeaOrmChangelogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmChangelogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChangelogRepository for SeaOrmChangelogRepository {
    async fn list(
        &self,
        product_id: i64,
        name_query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<SettingsChangelogEntry>> {
        let mut query = entity::changelog::Entity::find()
            .filter(entity::changelog::Column::ProductId.eq(product_id));

        if let Some(q) = name_query {
            query = query.filter(entity::changelog::Column::SettingName.contains(q));
        }

        let results = query
            .order_by_asc(entity::changelog::Column::SettingName)
            .order_by_asc(entity::changelog::Column::Version)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }
}
