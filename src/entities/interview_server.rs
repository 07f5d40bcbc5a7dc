//! Interview server entity - one row per guild that has run `/iv setup`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Interview server database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_servers")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID
    #[sea_orm(unique)]
    pub guild_id: String,
    /// Name of the interview sheet kept by the hosts
    pub sheet_name: String,
    /// Channel that answers are posted to
    pub answer_channel_id: String,
    /// Private channel used to drive the bot and preview answers
    pub backstage_channel_id: String,
}

/// Defines relationships between a server and its interview data
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One server has one meta row
    #[sea_orm(has_one = "super::interview_meta::Entity")]
    Meta,
    /// One server has many votes
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
    /// One server has many opt-outs
    #[sea_orm(has_many = "super::opt_out::Entity")]
    OptOuts,
    /// One server has many questions
    #[sea_orm(has_many = "super::question::Entity")]
    Questions,
}

impl Related<super::interview_meta::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meta.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::opt_out::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OptOuts.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
