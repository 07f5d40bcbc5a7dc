//! Voting commands - ballots, tallies, and opting out of being voted for.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::helpers::{self, Context},
        core::{
            opt,
            vote::{self, Nominee, Voter},
        },
        errors::Result,
    };
    use chrono::DateTime;
    use poise::serenity_prelude as serenity;

    fn nominee(member: &serenity::Member) -> Nominee {
        Nominee {
            id: member.user.id.to_string(),
            is_bot: member.user.bot,
        }
    }

    /// Footer naming everyone on the author's ballot.
    async fn author_footer(ctx: Context<'_>, guild_id: serenity::GuildId) -> Result<String> {
        let ids = vote::votes_for_voter(
            &ctx.data().database,
            &guild_id.to_string(),
            &ctx.author().id.to_string(),
        )
        .await?;
        let mut names = Vec::with_capacity(ids.len());
        for id in &ids {
            names.push(helpers::display_name(ctx, guild_id, id).await);
        }
        Ok(vote::votes_footer(&names))
    }

    /// Votes for who should be interviewed next.
    ///
    /// Replaces any earlier ballot.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn vote(
        ctx: Context<'_>,
        #[description = "Member to vote for"] first: serenity::Member,
        #[description = "Another member to vote for"] second: Option<serenity::Member>,
        #[description = "Another member to vote for"] third: Option<serenity::Member>,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let joined_at = ctx
            .author_member()
            .await
            .and_then(|m| m.joined_at)
            .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0));
        let voter = Voter {
            id: ctx.author().id.to_string(),
            joined_at,
        };

        let nominees: Vec<Nominee> = std::iter::once(&first)
            .chain(second.as_ref())
            .chain(third.as_ref())
            .map(nominee)
            .collect();

        vote::submit_ballot(
            &ctx.data().database,
            &guild_id.to_string(),
            &voter,
            &nominees,
            ctx.data().settings.voting.max_votes,
        )
        .await?;

        let footer = author_footer(ctx, guild_id).await?;
        ctx.say(format!("🗳️ Vote recorded.\n{footer}")).await?;
        Ok(())
    }

    /// Withdraws all of your votes.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn unvote(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let removed = vote::clear_votes(
            &ctx.data().database,
            &guild_id.to_string(),
            &ctx.author().id.to_string(),
        )
        .await?;

        let reply = if removed == 0 {
            "You weren't voting for anyone."
        } else {
            "🗑️ Your votes have been removed."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows who you are voting for.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn votes(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let footer = author_footer(ctx, guild_id).await?;
        ctx.send(poise::CreateReply::default().content(footer).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows the vote tally.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn votals(
        ctx: Context<'_>,
        #[description = "List who voted for each member"] full: Option<bool>,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let votes = vote::all_votes(&ctx.data().database, &guild_id.to_string()).await?;
        if votes.is_empty() {
            ctx.say("No votes have been cast yet.").await?;
            return Ok(());
        }

        let ids = vote::participant_ids(&votes);
        let names = helpers::member_names(ctx, guild_id, &ids).await;
        let candidates = vote::tally(&votes, &names);
        let block = vote::format_votals(&candidates, full.unwrap_or(false))?;
        let footer = author_footer(ctx, guild_id).await?;

        ctx.say(format!("**__Votals__**```ini\n{block}```{footer}\n"))
            .await?;
        Ok(())
    }

    /// Parent command for opting out of interviews.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands("opt_out_self", "opt_in_self", "opt_list")
    )]
    pub async fn opt(ctx: Context<'_>) -> Result<()> {
        let help_text = "Interview opt-out. Available subcommands:\n\
            `/opt out` - Stop others from voting for you\n\
            `/opt in` - Let others vote for you again\n\
            `/opt list` - Show who has opted out";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Opts you out of being voted for. Votes for you are removed.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "out")]
    pub async fn opt_out_self(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let changed = opt::opt_out(
            &ctx.data().database,
            &guild_id.to_string(),
            &ctx.author().id.to_string(),
        )
        .await?;

        let reply = if changed {
            "✅ You have opted out of interviews. Any votes for you were removed."
        } else {
            "You are already opted out."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Opts you back in to being voted for.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "in")]
    pub async fn opt_in_self(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let changed = opt::opt_in(
            &ctx.data().database,
            &guild_id.to_string(),
            &ctx.author().id.to_string(),
        )
        .await?;

        let reply = if changed {
            "✅ You have opted back in to interviews."
        } else {
            "You weren't opted out."
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists members who have opted out.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "list")]
    pub async fn opt_list(ctx: Context<'_>) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let ids = opt::list_opt_outs(&ctx.data().database, &guild_id.to_string()).await?;
        if ids.is_empty() {
            ctx.say("Nobody has opted out.").await?;
            return Ok(());
        }

        let mut names = Vec::with_capacity(ids.len());
        for id in &ids {
            names.push(helpers::display_name(ctx, guild_id, id).await);
        }
        names.sort_by_key(|name| name.to_lowercase());
        ctx.say(format!("**Opted out:** {}", names.join(", "))).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
