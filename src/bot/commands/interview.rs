//! Interview administration commands - setup, starting rounds, and switches.
//!
//! Everything here sits under the administrator-only `/iv` group.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::helpers::{self, Context},
        core::server,
        errors::{Error, Result},
    };
    use chrono::{Duration, Utc};
    use poise::serenity_prelude as serenity;

    /// Parent command for running interviews.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        subcommands(
            "iv_setup",
            "iv_next",
            "iv_enable",
            "iv_disable",
            "iv_stats",
            "iv_deadline",
            "iv_reinterviews"
        )
    )]
    pub async fn iv(ctx: Context<'_>) -> Result<()> {
        let help_text = "Interview administration. Available subcommands:\n\
            `/iv setup` - Choose the answer and backstage channels\n\
            `/iv next` - Start interviewing a member\n\
            `/iv enable` / `/iv disable` - Open or close voting and questions\n\
            `/iv stats` - Show the current round\n\
            `/iv deadline` - Stop accepting questions after some hours\n\
            `/iv reinterviews` - Allow votes for the current interviewee";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets the server up for interviews, or moves its channels.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "setup"
    )]
    pub async fn iv_setup(
        ctx: Context<'_>,
        #[description = "Channel answers are posted in"]
        #[channel_types("Text")]
        answer_channel: serenity::GuildChannel,
        #[description = "Channel for previews and warnings"]
        #[channel_types("Text")]
        backstage_channel: serenity::GuildChannel,
        #[description = "Name of the interview sheet"] sheet_name: Option<String>,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let sheet_name = sheet_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Interviews".to_string());

        server::setup_server(
            &ctx.data().database,
            &guild_id.to_string(),
            &answer_channel.id.to_string(),
            &backstage_channel.id.to_string(),
            &sheet_name,
        )
        .await?;

        ctx.say(format!(
            "✅ Interviews set up. Answers go to <#{}>, previews and warnings to <#{}>. \
             Use `/iv next` to pick an interviewee and `/iv enable` to open voting.",
            answer_channel.id, backstage_channel.id
        ))
        .await?;
        Ok(())
    }

    /// Starts a new interview round for a member.
    ///
    /// Clears every vote and restarts question numbering.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "next"
    )]
    pub async fn iv_next(
        ctx: Context<'_>,
        #[description = "Member to interview"] member: serenity::Member,
    ) -> Result<()> {
        if member.user.bot {
            return Err(Error::InvalidInput {
                message: "Bots can't be interviewed".to_string(),
            });
        }
        let guild_id = helpers::guild_id(ctx)?;
        server::start_interview(
            &ctx.data().database,
            &guild_id.to_string(),
            &member.user.id.to_string(),
        )
        .await?;

        ctx.say(format!(
            "🎤 **{}** is now being interviewed! Ask them questions with `/ask`. \
             All votes have been cleared.",
            member.display_name()
        ))
        .await?;
        Ok(())
    }

    /// Opens voting and asking.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "enable"
    )]
    pub async fn iv_enable(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let changed = server::set_active(&ctx.data().database, &guild_id.to_string(), true).await?;
        let reply = if changed {
            "✅ Interviews enabled."
        } else {
            "Interviews are already enabled."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Closes voting and asking.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "disable"
    )]
    pub async fn iv_disable(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let changed = server::set_active(&ctx.data().database, &guild_id.to_string(), false).await?;
        let reply = if changed {
            "✅ Interviews disabled."
        } else {
            "Interviews are already disabled."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the state of the current round.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "stats"
    )]
    pub async fn iv_stats(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let stats = server::interview_stats(&ctx.data().database, &guild_id.to_string()).await?;

        let interviewee = stats
            .interviewee_id
            .as_deref()
            .map_or_else(|| "nobody yet".to_string(), |id| format!("<@{id}>"));
        let status = if stats.active { "open" } else { "closed" };

        ctx.say(format!(
            "📊 **Interview stats**\n\
             Interviewee: {interviewee} (since <t:{}:R>)\n\
             Voting and questions: {status}\n\
             Questions: {} asked, {} answered, {} posted\n\
             Members voting: {}",
            stats.start_time.timestamp(),
            stats.asked,
            stats.answered,
            stats.posted,
            stats.voters
        ))
        .await?;
        Ok(())
    }

    /// Stops accepting questions after a number of hours; no value clears it.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "deadline"
    )]
    pub async fn iv_deadline(
        ctx: Context<'_>,
        #[description = "Hours from now; leave empty to remove the deadline"] hours: Option<u32>,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let limit = hours.map(|h| Utc::now() + Duration::hours(i64::from(h)));
        server::set_question_limit(&ctx.data().database, &guild_id.to_string(), limit).await?;

        let reply = match limit {
            Some(limit) => format!("⏰ Questions close <t:{}:R>.", limit.timestamp()),
            None => "⏰ Question deadline removed.".to_string(),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Allows or forbids votes for the current interviewee.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "reinterviews"
    )]
    pub async fn iv_reinterviews(
        ctx: Context<'_>,
        #[description = "Whether the current interviewee can be voted for"] allowed: bool,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        server::set_reinterviews_allowed(&ctx.data().database, &guild_id.to_string(), allowed)
            .await?;

        let reply = if allowed {
            "✅ Members can vote for the current interviewee again."
        } else {
            "✅ The current interviewee can no longer be voted for."
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
