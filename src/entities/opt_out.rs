//! Opt-out entity - members who cannot be voted for.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Opt-out database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_opt_outs")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Server the member opted out on
    pub server_id: i64,
    /// Discord user ID of the member
    pub user_id: String,
}

/// Each opt-out belongs to one server
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning server
    #[sea_orm(
        belongs_to = "super::interview_server::Entity",
        from = "Column::ServerId",
        to = "super::interview_server::Column::Id"
    )]
    Server,
}

impl Related<super::interview_server::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Server.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
