//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::helpers::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Interview Bot Help**\n\
        Every round one member is interviewed: the server votes on who, asks \
        them questions, and their answers are posted as embeds.\n\n\
        **Questions**\n\
        • `/ask <question>` - Asks the current interviewee a question.\n\
        • `/mask <questions>` - Asks several questions, one per line.\n\
        • `/reply <number> <answer>` - (Interviewee) Answers a question.\n\
        • `/answer` - (Interviewee) Posts every new answer.\n\
        • `/preview` - (Interviewee) Posts new answers backstage without marking them posted.\n\n\
        **Voting**\n\
        • `/vote <member> [member] [member]` - Votes for the next interviewee.\n\
        • `/unvote` - Withdraws your votes.\n\
        • `/votes` - Shows who you are voting for.\n\
        • `/votals [full]` - Shows the vote tally.\n\
        • `/opt out|in|list` - Opts out of (or back into) being voted for.\n\n\
        **Administration**\n\
        • `/iv setup|next|enable|disable|stats|deadline|reinterviews` - Runs the interviews.\n\
        • `/host register|role|channel|show` - Records which roles and channels the server uses.\n\n\
        **Other**\n\
        • `/bidoof [key]`, `/sadcat [key]` - Posts a random picture.\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
