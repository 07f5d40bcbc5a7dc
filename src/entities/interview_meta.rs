//! Interview meta entity - the state of the current interview round.
//!
//! Holds the current interviewee, when their round started, how many
//! questions have been numbered so far, and whether voting and asking are open.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Interview meta database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_meta")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning server row
    #[sea_orm(unique)]
    pub server_id: i64,
    /// Discord user ID of the current interviewee, None before the first round
    pub interviewee_id: Option<String>,
    /// When the current round started
    pub start_time: DateTimeUtc,
    /// Last question number handed out this round
    pub num_questions: i32,
    /// Questions asked after this time are refused
    pub question_limit: Option<DateTimeUtc>,
    /// Whether past interviewees may be voted for again
    pub reinterviews_allowed: bool,
    /// Whether voting and asking are open
    pub active: bool,
}

/// Each meta row belongs to one server
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
