//! Host server entity - per-guild bookkeeping for game hosting.
//!
//! Not used by the interview module; it records which channels and roles a
//! guild has designated for hosting, keyed by a free-form kind.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Host server database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "host_servers")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    #[sea_orm(unique)]
    pub guild_id: String,
    /// Guild name
    pub name: String,
    /// Template sheet name
    pub sheet: String,
    /// Category holding role PMs
    pub role_pms_id: Option<String>,
}

/// A host server owns its roles and channels
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Designated roles
    #[sea_orm(has_many = "super::host_role::Entity")]
    Roles,
    /// Designated channels
    #[sea_orm(has_many = "super::host_channel::Entity")]
    Channels,
}

impl Related<super::host_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl Related<super::host_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Channels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
