//! Question business logic - asking, answering, and collecting answers to post.
//!
//! Questions are numbered per interviewee round from the meta row's counter.
//! A round is every question for the current interviewee asked since the
//! round's start time, so re-interviewing someone starts with a clean slate.

use crate::{
    core::{
        packer::{Participant, QuestionRecord},
        server, text,
    },
    entities::{Question, interview_meta, interview_server, question},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};

/// Where a question was asked, used to link back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOrigin {
    /// Channel the message is in
    pub channel_id: String,
    /// The message itself
    pub message_id: String,
}

fn round_questions(
    server: &interview_server::Model,
    meta: &interview_meta::Model,
    interviewee_id: &str,
) -> Select<Question> {
    Question::find()
        .filter(question::Column::ServerId.eq(server.id))
        .filter(question::Column::IntervieweeId.eq(interviewee_id))
        .filter(question::Column::AskedAt.gte(meta.start_time))
}

async fn ask_in<C>(
    db: &C,
    guild_id: &str,
    asker: &Participant,
    text: &str,
    origin: &MessageOrigin,
) -> Result<question::Model>
where
    C: ConnectionTrait,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput {
            message: "Question cannot be empty".to_string(),
        });
    }

    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    if !meta.active {
        return Err(Error::InterviewDisabled);
    }
    let Some(interviewee_id) = meta.interviewee_id.clone() else {
        return Err(Error::NoInterviewee);
    };
    if meta.question_limit.is_some_and(|limit| Utc::now() > limit) {
        return Err(Error::QuestionsClosed);
    }

    let number = meta.num_questions + 1;
    let mut meta: interview_meta::ActiveModel = meta.into();
    meta.num_questions = Set(number);
    meta.update(db).await?;

    let question = question::ActiveModel {
        server_id: Set(server.id),
        interviewee_id: Set(interviewee_id),
        question_num: Set(number),
        asker_id: Set(asker.id.clone()),
        asker_name: Set(asker.name.clone()),
        question: Set(text.to_string()),
        answer: Set(None),
        channel_id: Set(origin.channel_id.clone()),
        message_id: Set(origin.message_id.clone()),
        asked_at: Set(Utc::now()),
        posted: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!(guild_id, number, asker = %asker.id, "Question recorded");
    Ok(question)
}

/// Records a question for the current interviewee and assigns it the next number.
///
/// Fails when interviews are disabled, no interviewee is set, or the
/// question deadline has passed.
pub async fn ask_question(
    db: &DatabaseConnection,
    guild_id: &str,
    asker: &Participant,
    text: &str,
    origin: &MessageOrigin,
) -> Result<question::Model> {
    let txn = db.begin().await?;
    let question = ask_in(&txn, guild_id, asker, text, origin).await?;
    txn.commit().await?;
    Ok(question)
}

/// Records one question per non-blank line, all or nothing.
pub async fn ask_many(
    db: &DatabaseConnection,
    guild_id: &str,
    asker: &Participant,
    text: &str,
    origin: &MessageOrigin,
) -> Result<Vec<question::Model>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(Error::InvalidInput {
            message: "No questions given".to_string(),
        });
    }

    let txn = db.begin().await?;
    let mut questions = Vec::with_capacity(lines.len());
    for line in lines {
        questions.push(ask_in(&txn, guild_id, asker, line, origin).await?);
    }
    txn.commit().await?;
    Ok(questions)
}

/// Attaches an answer to question `number` of the current round.
///
/// Only the current interviewee may answer. A blank answer clears it.
pub async fn set_answer(
    db: &DatabaseConnection,
    guild_id: &str,
    interviewee_id: &str,
    number: i32,
    answer: &str,
) -> Result<question::Model> {
    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    if meta.interviewee_id.as_deref() != Some(interviewee_id) {
        return Err(Error::NotInterviewee);
    }

    let existing = round_questions(&server, &meta, interviewee_id)
        .filter(question::Column::QuestionNum.eq(number))
        .one(db)
        .await?
        .ok_or(Error::QuestionNotFound { number })?;

    let answer = answer.trim();
    let mut model: question::ActiveModel = existing.into();
    model.answer = Set((!answer.is_empty()).then(|| answer.to_string()));
    model.update(db).await.map_err(Into::into)
}

/// Questions of the current round still waiting for an answer, in order.
pub async fn unanswered(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<question::Model>> {
    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    let Some(interviewee_id) = meta.interviewee_id.as_deref() else {
        return Ok(Vec::new());
    };

    let questions = round_questions(&server, &meta, interviewee_id)
        .order_by_asc(question::Column::QuestionNum)
        .all(db)
        .await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.answer.as_deref().is_none_or(|a| a.trim().is_empty()))
        .collect())
}

/// Converts a stored question into a packer record.
pub fn to_record(guild_id: &str, model: question::Model) -> Result<QuestionRecord> {
    let number = u32::try_from(model.question_num).map_err(|_| Error::InvalidInput {
        message: format!("question number {} is negative", model.question_num),
    })?;
    Ok(QuestionRecord {
        number,
        link: text::message_link(guild_id, &model.channel_id, &model.message_id),
        asker: Participant::new(model.asker_id, model.asker_name),
        question: model.question,
        answer: model.answer.unwrap_or_default(),
        asked_at: model.asked_at,
    })
}

/// Answered questions of the current round that have not been posted, in
/// question order, along with the interviewee they belong to.
pub async fn answered_unposted(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<(String, Vec<QuestionRecord>)> {
    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    let Some(interviewee_id) = meta.interviewee_id.clone() else {
        return Err(Error::NoInterviewee);
    };

    let questions = round_questions(&server, &meta, &interviewee_id)
        .filter(question::Column::Posted.eq(false))
        .filter(question::Column::Answer.is_not_null())
        .order_by_asc(question::Column::QuestionNum)
        .all(db)
        .await?;

    let records = questions
        .into_iter()
        .filter(|q| q.answer.as_deref().is_some_and(|a| !a.trim().is_empty()))
        .map(|q| to_record(guild_id, q))
        .collect::<Result<Vec<_>>>()?;
    Ok((interviewee_id, records))
}

/// Flags questions of the current round as posted.
pub async fn mark_posted(db: &DatabaseConnection, guild_id: &str, numbers: &[u32]) -> Result<u64> {
    use sea_orm::sea_query::Expr;

    if numbers.is_empty() {
        return Ok(0);
    }
    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    let Some(interviewee_id) = meta.interviewee_id.as_deref() else {
        return Err(Error::NoInterviewee);
    };

    let result = Question::update_many()
        .col_expr(question::Column::Posted, Expr::value(true))
        .filter(question::Column::ServerId.eq(server.id))
        .filter(question::Column::IntervieweeId.eq(interviewee_id))
        .filter(question::Column::AskedAt.gte(meta.start_time))
        .filter(question::Column::QuestionNum.is_in(numbers.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_questions_are_numbered_in_order() -> Result<()> {
        let db = setup_round("1").await?;
        let first = ask_test_question(&db, "10", "first?").await?;
        let second = ask_test_question(&db, "11", "second?").await?;
        assert_eq!(first.question_num, 1);
        assert_eq!(second.question_num, 2);
        assert_eq!(second.interviewee_id, "1");
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_requires_active_interview() -> Result<()> {
        let db = setup_round("1").await?;
        server::set_active(&db, TEST_GUILD, false).await?;
        let result = ask_test_question(&db, "10", "closed?").await;
        assert!(matches!(result.unwrap_err(), Error::InterviewDisabled));
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_requires_interviewee() -> Result<()> {
        let db = setup_active_server().await?;
        let result = ask_test_question(&db, "10", "who?").await;
        assert!(matches!(result.unwrap_err(), Error::NoInterviewee));
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_after_deadline_is_refused() -> Result<()> {
        let db = setup_round("1").await?;
        server::set_question_limit(&db, TEST_GUILD, Some(Utc::now() - chrono::Duration::hours(1)))
            .await?;
        let result = ask_test_question(&db, "10", "late?").await;
        assert!(matches!(result.unwrap_err(), Error::QuestionsClosed));
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_many_skips_blank_lines() -> Result<()> {
        let db = setup_round("1").await?;
        let asker = Participant::new("10", "asker");
        let questions = ask_many(&db, TEST_GUILD, &asker, "one?\n\n  two?  \n", &test_origin()).await?;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question, "two?");
        assert_eq!(questions[1].question_num, 2);

        let result = ask_many(&db, TEST_GUILD, &asker, "\n \n", &test_origin()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_only_interviewee_can_answer() -> Result<()> {
        let db = setup_round("1").await?;
        ask_test_question(&db, "10", "q?").await?;

        let result = set_answer(&db, TEST_GUILD, "10", 1, "sneaky").await;
        assert!(matches!(result.unwrap_err(), Error::NotInterviewee));

        let result = set_answer(&db, TEST_GUILD, "1", 5, "nope").await;
        assert!(matches!(result.unwrap_err(), Error::QuestionNotFound { number: 5 }));

        let answered = set_answer(&db, TEST_GUILD, "1", 1, "  yes  ").await?;
        assert_eq!(answered.answer.as_deref(), Some("yes"));
        Ok(())
    }

    #[tokio::test]
    async fn test_answered_unposted_and_mark_posted() -> Result<()> {
        let db = setup_round("1").await?;
        ask_test_question(&db, "10", "one?").await?;
        ask_test_question(&db, "11", "two?").await?;
        ask_test_question(&db, "10", "three?").await?;
        set_answer(&db, TEST_GUILD, "1", 3, "third").await?;
        set_answer(&db, TEST_GUILD, "1", 1, "first").await?;

        let (interviewee, records) = answered_unposted(&db, TEST_GUILD).await?;
        assert_eq!(interviewee, "1");
        assert_eq!(records.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(records[0].asker.id, "10");
        assert_eq!(
            records[0].link,
            text::message_link(TEST_GUILD, "500", "600")
        );
        assert_eq!(unanswered(&db, TEST_GUILD).await?.len(), 1);

        assert_eq!(mark_posted(&db, TEST_GUILD, &[1, 3]).await?, 2);
        let (_, records) = answered_unposted(&db, TEST_GUILD).await?;
        assert!(records.is_empty());
        Ok(())
    }

    #[test]
    fn test_to_record_rejects_negative_number() {
        let model = question::Model {
            id: 1,
            server_id: 1,
            interviewee_id: "1".to_string(),
            question_num: -1,
            asker_id: "2".to_string(),
            asker_name: "asker".to_string(),
            question: "q".to_string(),
            answer: Some("a".to_string()),
            channel_id: "3".to_string(),
            message_id: "4".to_string(),
            asked_at: Utc::now(),
            posted: false,
        };
        assert!(matches!(to_record("1", model), Err(Error::InvalidInput { .. })));
    }
}
