//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Product settings table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "product_settings")]
pub struct Model {
    /// Product identifier (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,

    /// Setting name (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    /// Current value as JSON
    pub value: Json,

    /// Version counter, starts at 1 and moves by exactly 1 per accepted write
    pub version: i64,

    /// User who created the row
    pub created_by: i64,

    /// User who last changed the row
    pub updated_by: i64,

    /// Creation timestamp
    pub created_at: DateTimeUtc,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,

    /// Soft delete timestamp
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Foreign key to the parameter catalog
    #[sea_orm(
        belongs_to = "parameter::Entity",
        from = "Column::Name",
        to = "parameter::Column::Name"
    )]
    Parameter,
}

impl Related<parameter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parameter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parameter catalog module
pub mod parameter {
    use sea_orm::entity::prelude::*;

    /// Parameter catalog table entity
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "setting_parameters")]
    pub struct Model {
        /// Setting name (primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub name: String,

        /// Minimum authorization level required to change the setting
        pub min_auth_level: String,

        /// Schema document as JSON
        pub schema: Json,

        /// Device containers rewired when the setting changes (optional)
        pub containers_affected: Option<Json>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// One-to-many relationship with product settings
        #[sea_orm(has_many = "super::Entity")]
        ProductSettings,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ProductSettings.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Global settings module
pub mod global {
    use sea_orm::entity::prelude::*;

    /// Global settings table entity
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "global_settings")]
    pub struct Model {
        /// Setting name (primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub name: String,

        /// Minimum authorization level required to change the setting
        pub min_auth_level: String,

        /// Schema document as JSON
        pub schema: Json,

        /// Current value as JSON (absent until first write)
        pub value: Option<Json>,

        /// Creation timestamp
        pub created_at: DateTimeUtc,

        /// Last update timestamp
        pub updated_at: DateTimeUtc,

        /// User who last changed the value
        pub updated_by: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Changelog module
pub mod changelog {
    use sea_orm::entity::prelude::*;

    /// Changelog table entity
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "settings_changelog")]
    pub struct Model {
        /// Product identifier (part of composite primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_id: i64,

        /// Setting name (part of composite primary key)
        #[sea_orm(primary_key, auto_increment = false)]
        pub setting_name: String,

        /// Version the product setting holds after this change
        #[sea_orm(primary_key, auto_increment = false)]
        pub version: i64,

        /// Patch rebuilding the previous value from the current one
        #[sea_orm(column_type = "Text")]
        pub patch: String,

        /// User who made the change
        pub editor_id: i64,

        /// Creation timestamp
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
