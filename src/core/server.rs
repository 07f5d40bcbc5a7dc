//! Interview server lifecycle - setup, enabling, and starting new rounds.
//!
//! A guild becomes interview-capable with [`setup_server`], which also creates
//! the single meta row that tracks the current round. Everything else in
//! `core` looks the guild up through [`require_server`] and [`get_meta`].

use crate::{
    entities::{
        InterviewMeta, InterviewServer, Question, Vote, interview_meta, interview_server,
        question, vote,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;

/// Snapshot of the current round for `/iv stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewStats {
    /// Current interviewee, if a round has started
    pub interviewee_id: Option<String>,
    /// When the round started
    pub start_time: DateTime<Utc>,
    /// Whether voting and asking are open
    pub active: bool,
    /// Questions asked this round
    pub asked: u64,
    /// Questions with an answer attached
    pub answered: u64,
    /// Answers already posted
    pub posted: u64,
    /// Members with a ballot in
    pub voters: usize,
}

/// Finds the interview server row for a guild.
pub async fn get_server<C>(db: &C, guild_id: &str) -> Result<Option<interview_server::Model>>
where
    C: ConnectionTrait,
{
    InterviewServer::find()
        .filter(interview_server::Column::GuildId.eq(guild_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_server`], but a missing row is an error.
pub async fn require_server<C>(db: &C, guild_id: &str) -> Result<interview_server::Model>
where
    C: ConnectionTrait,
{
    get_server(db, guild_id)
        .await?
        .ok_or_else(|| Error::ServerNotConfigured {
            guild_id: guild_id.to_string(),
        })
}

/// Loads the meta row of a configured server.
pub async fn get_meta<C>(db: &C, server: &interview_server::Model) -> Result<interview_meta::Model>
where
    C: ConnectionTrait,
{
    InterviewMeta::find()
        .filter(interview_meta::Column::ServerId.eq(server.id))
        .one(db)
        .await?
        .ok_or_else(|| Error::ServerNotConfigured {
            guild_id: server.guild_id.clone(),
        })
}

/// Sets a guild up for interviews, or re-points an existing setup at new channels.
///
/// New setups start disabled with no interviewee.
pub async fn setup_server(
    db: &DatabaseConnection,
    guild_id: &str,
    answer_channel_id: &str,
    backstage_channel_id: &str,
    sheet_name: &str,
) -> Result<interview_server::Model> {
    let txn = db.begin().await?;

    let server = if let Some(existing) = get_server(&txn, guild_id).await? {
        let mut server: interview_server::ActiveModel = existing.into();
        server.answer_channel_id = Set(answer_channel_id.to_string());
        server.backstage_channel_id = Set(backstage_channel_id.to_string());
        server.sheet_name = Set(sheet_name.to_string());
        server.update(&txn).await?
    } else {
        let server = interview_server::ActiveModel {
            guild_id: Set(guild_id.to_string()),
            sheet_name: Set(sheet_name.to_string()),
            answer_channel_id: Set(answer_channel_id.to_string()),
            backstage_channel_id: Set(backstage_channel_id.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        interview_meta::ActiveModel {
            server_id: Set(server.id),
            interviewee_id: Set(None),
            start_time: Set(Utc::now()),
            num_questions: Set(0),
            question_limit: Set(None),
            reinterviews_allowed: Set(false),
            active: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        server
    };

    txn.commit().await?;
    tracing::info!(guild_id, "Interview server configured");
    Ok(server)
}

async fn update_meta<F>(db: &DatabaseConnection, guild_id: &str, edit: F) -> Result<interview_meta::Model>
where
    F: FnOnce(&mut interview_meta::ActiveModel),
{
    let server = require_server(db, guild_id).await?;
    let mut meta: interview_meta::ActiveModel = get_meta(db, &server).await?.into();
    edit(&mut meta);
    meta.update(db).await.map_err(Into::into)
}

/// Opens or closes voting and asking.
///
/// Returns `Ok(false)` without touching anything when already in that state.
pub async fn set_active(db: &DatabaseConnection, guild_id: &str, active: bool) -> Result<bool> {
    let server = require_server(db, guild_id).await?;
    let meta = get_meta(db, &server).await?;
    if meta.active == active {
        return Ok(false);
    }
    update_meta(db, guild_id, |meta| meta.active = Set(active)).await?;
    Ok(true)
}

/// Allows or forbids voting for members who have already been interviewed.
pub async fn set_reinterviews_allowed(
    db: &DatabaseConnection,
    guild_id: &str,
    allowed: bool,
) -> Result<interview_meta::Model> {
    update_meta(db, guild_id, |meta| meta.reinterviews_allowed = Set(allowed)).await
}

/// Sets or clears the time after which questions are refused.
pub async fn set_question_limit(
    db: &DatabaseConnection,
    guild_id: &str,
    limit: Option<DateTime<Utc>>,
) -> Result<interview_meta::Model> {
    update_meta(db, guild_id, |meta| meta.question_limit = Set(limit)).await
}

/// Starts a new round for `interviewee_id`.
///
/// Question numbering restarts at 1, the deadline is cleared, and every
/// ballot from the previous vote is discarded.
pub async fn start_interview(
    db: &DatabaseConnection,
    guild_id: &str,
    interviewee_id: &str,
) -> Result<interview_meta::Model> {
    let txn = db.begin().await?;
    let server = require_server(&txn, guild_id).await?;

    let mut meta: interview_meta::ActiveModel = get_meta(&txn, &server).await?.into();
    meta.interviewee_id = Set(Some(interviewee_id.to_string()));
    meta.start_time = Set(Utc::now());
    meta.num_questions = Set(0);
    meta.question_limit = Set(None);
    let meta = meta.update(&txn).await?;

    let cleared = Vote::delete_many()
        .filter(vote::Column::ServerId.eq(server.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(
        guild_id,
        interviewee_id,
        votes_cleared = cleared.rows_affected,
        "Started new interview"
    );
    Ok(meta)
}

/// Counts for the current round.
pub async fn interview_stats(db: &DatabaseConnection, guild_id: &str) -> Result<InterviewStats> {
    let server = require_server(db, guild_id).await?;
    let meta = get_meta(db, &server).await?;

    let round = Question::find()
        .filter(question::Column::ServerId.eq(server.id))
        .filter(question::Column::IntervieweeId.eq(meta.interviewee_id.clone().unwrap_or_default()))
        .filter(question::Column::AskedAt.gte(meta.start_time));

    let asked = round.clone().count(db).await?;
    let answered = round
        .clone()
        .filter(question::Column::Answer.is_not_null())
        .filter(question::Column::Answer.ne(""))
        .count(db)
        .await?;
    let posted = round
        .filter(question::Column::Posted.eq(true))
        .count(db)
        .await?;

    let voters = Vote::find()
        .filter(vote::Column::ServerId.eq(server.id))
        .all(db)
        .await?
        .into_iter()
        .map(|v| v.voter_id)
        .collect::<HashSet<_>>()
        .len();

    Ok(InterviewStats {
        interviewee_id: meta.interviewee_id,
        start_time: meta.start_time,
        active: meta.active,
        asked,
        answered,
        posted,
        voters,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_setup_creates_inactive_meta() -> Result<()> {
        let db = setup_test_db().await?;
        let server = setup_server(&db, "100", "200", "300", "interview sheet").await?;
        assert_eq!(server.guild_id, "100");
        assert_eq!(server.answer_channel_id, "200");

        let meta = get_meta(&db, &server).await?;
        assert!(!meta.active);
        assert_eq!(meta.num_questions, 0);
        assert!(meta.interviewee_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_setup_twice_updates_channels() -> Result<()> {
        let db = setup_test_db().await?;
        let first = setup_server(&db, "100", "200", "300", "sheet").await?;
        let second = setup_server(&db, "100", "201", "301", "sheet 2").await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.answer_channel_id, "201");
        assert_eq!(second.sheet_name, "sheet 2");
        Ok(())
    }

    #[tokio::test]
    async fn test_unconfigured_server_is_error() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_server(&db, "999").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ServerNotConfigured { guild_id } if guild_id == "999"
        ));
        assert!(set_active(&db, "999", true).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_active_reports_no_change() -> Result<()> {
        let db = setup_active_server().await?;
        assert!(!set_active(&db, TEST_GUILD, true).await?);
        assert!(set_active(&db, TEST_GUILD, false).await?);
        assert!(!set_active(&db, TEST_GUILD, false).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_start_interview_resets_round() -> Result<()> {
        let db = setup_active_server().await?;
        start_interview(&db, TEST_GUILD, "1").await?;
        ask_test_question(&db, "10", "first?").await?;
        crate::core::vote::cast_votes(&db, TEST_GUILD, "10", &["2".to_string()]).await?;

        let meta = start_interview(&db, TEST_GUILD, "2").await?;
        assert_eq!(meta.interviewee_id.as_deref(), Some("2"));
        assert_eq!(meta.num_questions, 0);

        let stats = interview_stats(&db, TEST_GUILD).await?;
        assert_eq!(stats.voters, 0);
        assert_eq!(stats.asked, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_counts_round() -> Result<()> {
        let db = setup_active_server().await?;
        start_interview(&db, TEST_GUILD, "1").await?;
        ask_test_question(&db, "10", "one?").await?;
        ask_test_question(&db, "11", "two?").await?;
        crate::core::question::set_answer(&db, TEST_GUILD, "1", 1, "yes").await?;
        crate::core::vote::cast_votes(&db, TEST_GUILD, "10", &["2".to_string(), "3".to_string()])
            .await?;

        let stats = interview_stats(&db, TEST_GUILD).await?;
        assert_eq!(stats.interviewee_id.as_deref(), Some("1"));
        assert!(stats.active);
        assert_eq!(stats.asked, 2);
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.posted, 0);
        assert_eq!(stats.voters, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_meta_settings() -> Result<()> {
        let db = setup_active_server().await?;
        let meta = set_reinterviews_allowed(&db, TEST_GUILD, true).await?;
        assert!(meta.reinterviews_allowed);

        let deadline = Utc::now();
        let meta = set_question_limit(&db, TEST_GUILD, Some(deadline)).await?;
        assert!(meta.question_limit.is_some());
        let meta = set_question_limit(&db, TEST_GUILD, None).await?;
        assert!(meta.question_limit.is_none());
        Ok(())
    }
}
