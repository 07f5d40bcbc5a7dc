//! Question entity - questions asked during an interview round.
//!
//! Each question is numbered per interviewee round, keeps the location of the
//! message it was asked in so answers can link back to it, and carries the
//! answer once the interviewee attaches one. `posted` flips after the answer
//! has gone out to the answer channel.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Question database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_questions")]
pub struct Model {
    /// Unique identifier for the question
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Server the question was asked on
    pub server_id: i64,
    /// Discord user ID of the interviewee the question is for
    pub interviewee_id: String,
    /// 1-based number within the interviewee's round
    pub question_num: i32,
    /// Discord user ID of the asker
    pub asker_id: String,
    /// Display name of the asker when the question was asked
    pub asker_name: String,
    /// Question text
    pub question: String,
    /// Answer text, None until answered
    pub answer: Option<String>,
    /// Channel the question was asked in
    pub channel_id: String,
    /// Message the question was asked in
    pub message_id: String,
    /// When the question was asked
    pub asked_at: DateTimeUtc,
    /// Whether the answer has been posted
    pub posted: bool,
}

/// Each question belongs to one server
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
