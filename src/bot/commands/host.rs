//! Hosting bookkeeping commands - which roles and channels a server uses.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::helpers::{self, Context},
        core::host,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    fn normalize_kind(kind: &str) -> Result<String> {
        let kind = kind.trim().to_lowercase();
        if kind.is_empty() {
            return Err(Error::InvalidInput {
                message: "Kind cannot be empty".to_string(),
            });
        }
        Ok(kind)
    }

    /// Parent command for hosting bookkeeping.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        subcommands("host_register", "host_role", "host_channel", "host_show")
    )]
    pub async fn host(ctx: Context<'_>) -> Result<()> {
        let help_text = "Hosting bookkeeping. Available subcommands:\n\
            `/host register` - Register this server for hosting\n\
            `/host role` - Mark a role as used for something\n\
            `/host channel` - Mark a channel as used for something\n\
            `/host show` - List roles and channels of one kind";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers this server, or updates its name and sheet.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "register"
    )]
    pub async fn host_register(
        ctx: Context<'_>,
        #[description = "Name of the hosting sheet"]
        #[rest]
        sheet: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let name = ctx
            .guild()
            .map(|guild| guild.name.clone())
            .unwrap_or_else(|| guild_id.to_string());
        let server = host::register_server(&ctx.data().database, &guild_id.to_string(), &name, sheet.trim())
            .await?;
        ctx.say(format!("✅ Registered **{}** with sheet `{}`.", server.name, server.sheet))
            .await?;
        Ok(())
    }

    /// Marks a role as used for a kind of thing, e.g. `host` or `spectator`.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "role"
    )]
    pub async fn host_role(
        ctx: Context<'_>,
        #[description = "Role to mark"] role: serenity::Role,
        #[description = "What the role is used for"] kind: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let kind = normalize_kind(&kind)?;
        host::designate_role(&ctx.data().database, &guild_id.to_string(), &role.id.to_string(), &kind)
            .await?;
        ctx.say(format!("✅ <@&{}> is now a `{kind}` role.", role.id)).await?;
        Ok(())
    }

    /// Marks a channel as used for a kind of thing, e.g. `signups`.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "channel"
    )]
    pub async fn host_channel(
        ctx: Context<'_>,
        #[description = "Channel to mark"] channel: serenity::GuildChannel,
        #[description = "What the channel is used for"] kind: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?;
        let kind = normalize_kind(&kind)?;
        host::designate_channel(
            &ctx.data().database,
            &guild_id.to_string(),
            &channel.id.to_string(),
            &kind,
        )
        .await?;
        ctx.say(format!("✅ <#{}> is now a `{kind}` channel.", channel.id)).await?;
        Ok(())
    }

    /// Lists the roles and channels marked with a kind.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        rename = "show"
    )]
    pub async fn host_show(
        ctx: Context<'_>,
        #[description = "Kind to list"] kind: String,
    ) -> Result<()> {
        let guild_id = helpers::guild_id(ctx)?.to_string();
        let kind = normalize_kind(&kind)?;
        let db = &ctx.data().database;
        let roles = host::roles_of_kind(db, &guild_id, &kind).await?;
        let channels = host::channels_of_kind(db, &guild_id, &kind).await?;

        let listed = |items: Vec<String>| {
            if items.is_empty() {
                "none".to_string()
            } else {
                items.join(", ")
            }
        };
        let roles = listed(roles.iter().map(|id| format!("<@&{id}>")).collect());
        let channels = listed(channels.iter().map(|id| format!("<#{id}>")).collect());
        ctx.say(format!("**`{kind}`**\nRoles: {roles}\nChannels: {channels}"))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
