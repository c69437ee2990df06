//! Contract models for the settings engine
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models. Schema documents are the
//! one exception (see `contract::schema`); they round-trip to storage.

use chrono::{DateTime, Utc};

use super::schema::SchemaDocument;

/// Ordered authorization level gating who may change a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthLevel {
    Operator,
    Supervisor,
    Engineer,
}

impl AuthLevel {
    /// Stable storage spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "OPERATOR",
            Self::Supervisor => "SUPERVISOR",
            Self::Engineer => "ENGINEER",
        }
    }

    /// Parse the storage spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPERATOR" => Some(Self::Operator),
            "SUPERVISOR" => Some(Self::Supervisor),
            "ENGINEER" => Some(Self::Engineer),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and privilege of the user performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// User identifier recorded as creator/editor
    pub user_id: i64,
    /// Authorization level of the user
    pub level: AuthLevel,
}

impl AuthContext {
    pub fn new(user_id: i64, level: AuthLevel) -> Self {
        Self { user_id, level }
    }

    /// Context for a line operator
    pub fn operator(user_id: i64) -> Self {
        Self::new(user_id, AuthLevel::Operator)
    }

    /// Context for a shift supervisor
    pub fn supervisor(user_id: i64) -> Self {
        Self::new(user_id, AuthLevel::Supervisor)
    }

    /// Context for a service engineer
    pub fn engineer(user_id: i64) -> Self {
        Self::new(user_id, AuthLevel::Engineer)
    }
}

/// Catalog entry for one product-scoped setting name
///
/// Loaded at bootstrap and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingParameter {
    /// Globally unique setting name (e.g. "Rejector.DelayMS")
    pub name: String,
    /// Minimum authorization level required to change the setting
    pub min_auth_level: AuthLevel,
    /// Structural description of legal values
    pub schema: SchemaDocument,
    /// Device containers that consume this parameter
    pub containers_affected: Option<Vec<String>>,
}

/// Line-wide singleton setting, overwritten in place
///
/// Not versioned and not changelog-tracked; writes keep last-editor and
/// timestamp bookkeeping only.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSetting {
    /// Globally unique setting name (e.g. "Watchdog.Timer")
    pub name: String,
    /// Minimum authorization level required to change the setting
    pub min_auth_level: AuthLevel,
    /// Structural description of legal values
    pub schema: SchemaDocument,
    /// Current value; None until first written
    pub value: Option<serde_json::Value>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Editor of the last accepted write; None for seeded rows
    pub updated_by: Option<i64>,
}

/// Versioned setting value scoped to one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSetting {
    /// Product the value applies to (part of composite identity)
    pub product_id: i64,
    /// Setting name (part of composite identity)
    pub name: String,
    /// Current value as JSON
    pub value: serde_json::Value,
    /// Starts at 1 on creation, +1 per accepted change
    pub version: i64,
    /// User who created the row
    pub created_by: i64,
    /// User of the last accepted write
    pub updated_by: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Tombstone marker; set once, never cleared
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ProductSetting {
    /// Whether the row is frozen (reads still work, writes are rejected)
    pub fn is_tombstoned(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Immutable record of one accepted product-setting change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChangelogEntry {
    /// Product the change applies to
    pub product_id: i64,
    /// Setting name
    pub setting_name: String,
    /// Version of the setting AFTER the change
    pub version: i64,
    /// Reversible textual patch from the previous value to this one
    pub patch: String,
    /// User who made the change
    pub editor_id: i64,
    /// When the change committed
    pub created_at: DateTime<Utc>,
}

/// Result of a versioned write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new version was committed together with its changelog entry
    Committed(ProductSetting),
    /// The candidate equalled the current value; nothing changed
    Unchanged(ProductSetting),
}

impl UpdateOutcome {
    /// The setting row in its post-call state
    pub fn setting(&self) -> &ProductSetting {
        match self {
            Self::Committed(s) | Self::Unchanged(s) => s,
        }
    }

    /// Consume the outcome, keeping the row
    pub fn into_setting(self) -> ProductSetting {
        match self {
            Self::Committed(s) | Self::Unchanged(s) => s,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
