//! Question commands - asking, answering, and posting answers.
//!
//! Members ask with `/ask` or `/mask`. The interviewee attaches answers with
//! `/reply`, then `/answer` packs every new answer into embeds and posts them
//! to the answer channel. `/preview` does the same into the backstage channel
//! without marking anything as posted.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            handlers::autocomplete,
            helpers::{self, Context},
            render,
        },
        core::{
            packer::{self, Packed, Participant},
            question::{self, MessageOrigin},
            server,
            vote::MEMBER_LEFT,
        },
        entities::interview_server,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    async fn asker(ctx: Context<'_>) -> Participant {
        let name = ctx
            .author_member()
            .await
            .map_or_else(|| ctx.author().name.clone(), |m| m.display_name().to_string());
        Participant::new(ctx.author().id, name)
    }

    /// Works out which message a question links back to.
    ///
    /// Prefix questions link to the invoking message. Slash questions have no
    /// message of their own, so a placeholder reply is sent and linked instead.
    async fn question_origin(
        ctx: Context<'_>,
    ) -> Result<(MessageOrigin, Option<poise::ReplyHandle<'_>>)> {
        if let poise::Context::Prefix(prefix) = ctx {
            let origin = MessageOrigin {
                channel_id: prefix.msg.channel_id.to_string(),
                message_id: prefix.msg.id.to_string(),
            };
            return Ok((origin, None));
        }

        let handle = ctx.say("📝 Recording your question...").await?;
        let message = handle.message().await?;
        let origin = MessageOrigin {
            channel_id: message.channel_id.to_string(),
            message_id: message.id.to_string(),
        };
        Ok((origin, Some(handle)))
    }

    async fn finish(
        ctx: Context<'_>,
        handle: Option<poise::ReplyHandle<'_>>,
        result: Result<String>,
    ) -> Result<()> {
        match (handle, result) {
            (Some(handle), Ok(text)) => {
                handle.edit(ctx, poise::CreateReply::default().content(text)).await?;
            }
            (None, Ok(text)) => {
                ctx.say(text).await?;
            }
            (Some(handle), Err(e)) => {
                if let Err(delete_err) = handle.delete(ctx).await {
                    tracing::warn!("Failed to remove placeholder reply: {}", delete_err);
                }
                return Err(e);
            }
            (None, Err(e)) => return Err(e),
        }
        Ok(())
    }

    /// Asks the current interviewee a question.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn ask(
        ctx: Context<'_>,
        #[description = "Your question"]
        #[rest]
        question: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?.to_string();
        let asker = asker(ctx).await;
        let (origin, handle) = question_origin(ctx).await?;

        let result = question::ask_question(&ctx.data().database, &guild_id, &asker, &question, &origin)
            .await
            .map(|q| {
                format!(
                    "✅ Question #{} recorded for <@{}>.",
                    q.question_num, q.interviewee_id
                )
            });
        finish(ctx, handle, result).await
    }

    /// Asks several questions at once, one per line.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn mask(
        ctx: Context<'_>,
        #[description = "Your questions, one per line"]
        #[rest]
        questions: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?.to_string();
        let asker = asker(ctx).await;
        let (origin, handle) = question_origin(ctx).await?;

        let result = question::ask_many(&ctx.data().database, &guild_id, &asker, &questions, &origin)
            .await
            .map(|asked| {
                let numbers = asked
                    .iter()
                    .map(|q| format!("#{}", q.question_num))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("✅ Recorded {} questions: {numbers}.", asked.len())
            });
        finish(ctx, handle, result).await
    }

    /// Answers one of your interview questions.
    ///
    /// Only the current interviewee can reply. An empty answer clears it.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn reply(
        ctx: Context<'_>,
        #[description = "Question number"]
        #[autocomplete = "autocomplete::autocomplete_question_number"]
        number: u32,
        #[description = "Your answer"]
        #[rest]
        answer: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?.to_string();
        let number = i32::try_from(number).map_err(|_| Error::InvalidInput {
            message: format!("Question #{number} does not exist"),
        })?;

        let saved = question::set_answer(
            &ctx.data().database,
            &guild_id,
            &ctx.author().id.to_string(),
            number,
            &answer,
        )
        .await?;

        let text = if saved.answer.is_some() {
            format!("✅ Answer to question #{number} saved. Post it with `/answer`.")
        } else {
            format!("🗑️ Answer to question #{number} cleared.")
        };
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PostSummary {
        documents: usize,
        answers: usize,
        rejected: usize,
    }

    fn preview_summary(summary: &PostSummary, backstage: serenity::ChannelId) -> String {
        if summary.answers == 0 && summary.rejected == 0 {
            return "No new answers to preview.".to_string();
        }
        let mut text = format!(
            "👀 Preview of {} answers sent to <#{backstage}>.",
            summary.answers
        );
        if summary.rejected > 0 {
            let _ = write!(
                text,
                "\n⚠️ {} answers are too long to post and were reported there too.",
                summary.rejected
            );
        }
        text
    }

    /// Packs every answered, unposted question and sends the embeds to
    /// `target`. Records too long to post are reported backstage.
    async fn post_answers(
        ctx: Context<'_>,
        guild: serenity::GuildId,
        target: serenity::ChannelId,
        backstage: serenity::ChannelId,
        mark_posted: bool,
    ) -> Result<PostSummary> {
        let db = &ctx.data().database;
        let guild_id = guild.to_string();
        let (interviewee_id, records) = question::answered_unposted(db, &guild_id).await?;

        let member = helpers::find_member(ctx, guild, &interviewee_id).await;
        let fallback_avatar = member.as_ref().map(serenity::Member::face);
        let name = member.as_ref().map_or_else(
            || MEMBER_LEFT.to_string(),
            |m| m.display_name().to_string(),
        );
        let interviewee = Participant::new(interviewee_id, name);

        let mut summary = PostSummary {
            documents: 0,
            answers: 0,
            rejected: 0,
        };
        let limits = ctx.data().settings.packer;
        for packed in packer::pack(interviewee, records, None, limits) {
            match packed? {
                Packed::DocumentReady(document) => {
                    let embed = render::document_embed(&document, fallback_avatar.as_deref());
                    target
                        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
                        .await?;
                    if mark_posted {
                        question::mark_posted(db, &guild_id, &document.numbers).await?;
                    }
                    summary.documents += 1;
                    summary.answers += document.numbers.len();
                }
                Packed::RecordRejected(record) => {
                    tracing::warn!(%guild_id, number = record.number, "Answer too long to post");
                    backstage
                        .send_message(
                            ctx,
                            serenity::CreateMessage::new().content(render::rejection_message(&record)),
                        )
                        .await?;
                    if mark_posted {
                        question::mark_posted(db, &guild_id, &[record.number]).await?;
                    }
                    summary.rejected += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn require_interviewee(
        ctx: Context<'_>,
        guild_id: &str,
    ) -> Result<interview_server::Model> {
        let db = &ctx.data().database;
        let server = server::require_server(db, guild_id).await?;
        let meta = server::get_meta(db, &server).await?;
        let author = ctx.author().id.to_string();
        match meta.interviewee_id.as_deref() {
            None => Err(Error::NoInterviewee),
            Some(id) if id == author => Ok(server),
            Some(_) => Err(Error::NotInterviewee),
        }
    }

    /// Posts every new answer to the answer channel.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn answer(ctx: Context<'_>) -> Result<()> {
        let guild = helpers::guild_id(ctx)?;
        let server = require_interviewee(ctx, &guild.to_string()).await?;
        let target = helpers::parse_channel(&server.answer_channel_id)?;
        let backstage = helpers::parse_channel(&server.backstage_channel_id)?;

        ctx.defer().await?;
        let summary = post_answers(ctx, guild, target, backstage, true).await?;

        let mut text = if summary.answers == 0 {
            "No new answers to post. Answer questions with `/reply` first.".to_string()
        } else {
            format!(
                "✅ Posted {} answers in {} messages to <#{target}>.",
                summary.answers, summary.documents
            )
        };
        if summary.rejected > 0 {
            write!(
                text,
                "\n⚠️ {} answers were too long to post; see <#{backstage}>.",
                summary.rejected
            )?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// Shows your new answers backstage without posting them.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn preview(ctx: Context<'_>) -> Result<()> {
        let guild = helpers::guild_id(ctx)?;
        let server = require_interviewee(ctx, &guild.to_string()).await?;
        let backstage = helpers::parse_channel(&server.backstage_channel_id)?;

        ctx.defer().await?;
        let summary = post_answers(ctx, guild, backstage, backstage, false).await?;

        let text = preview_summary(&summary, backstage);
        ctx.say(text).await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const BACKSTAGE_ID: u64 = 300;

        fn backstage() -> serenity::ChannelId {
            serenity::ChannelId::new(BACKSTAGE_ID)
        }

        #[test]
        fn test_preview_summary_mentions_rejections() {
            let summary = PostSummary {
                documents: 1,
                answers: 2,
                rejected: 1,
            };
            let text = preview_summary(&summary, backstage());
            assert!(text.contains("Preview of 2 answers sent to <#300>"));
            assert!(text.contains("1 answers are too long"));
        }

        #[test]
        fn test_preview_summary_with_only_rejections() {
            let summary = PostSummary {
                documents: 0,
                answers: 0,
                rejected: 2,
            };
            let text = preview_summary(&summary, backstage());
            assert!(text.contains("2 answers are too long"));
        }

        #[test]
        fn test_preview_summary_nothing_new() {
            let summary = PostSummary {
                documents: 0,
                answers: 0,
                rejected: 0,
            };
            assert_eq!(preview_summary(&summary, backstage()), "No new answers to preview.");
        }
    }
}

// Re-export all commands
pub use inner::*;
