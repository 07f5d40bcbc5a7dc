//! Host role entity - a Discord role designated for hosting.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Host role database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "host_roles")]
pub struct Model {
    /// Discord role ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// What the role is used for, e.g. `"host"` or `"spectator"`
    pub kind: String,
    /// Owning host server row
    pub server_id: i64,
}

/// Each role belongs to one host server
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning server
    #[sea_orm(
        belongs_to = "super::host_server::Entity",
        from = "Column::ServerId",
        to = "super::host_server::Column::Id"
    )]
    Server,
}

impl Related<super::host_server::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Server.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
