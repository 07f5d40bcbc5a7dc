//! Vote entity - one row per (voter, candidate) pair on a server.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vote database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_votes")]
pub struct Model {
    /// Unique identifier for the vote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Server the vote was cast on
    pub server_id: i64,
    /// Discord user ID of the voter
    pub voter_id: String,
    /// Discord user ID of the nominee
    pub candidate_id: String,
    /// When the vote was cast
    pub timestamp: DateTimeUtc,
}

/// Each vote belongs to one server
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
