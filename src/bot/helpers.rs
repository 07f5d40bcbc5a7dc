//! Lookups shared by commands: guild ids, member names, channel ids.

use crate::{
    bot::BotData,
    core::vote::MEMBER_LEFT,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

/// Poise context type used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// The invoking guild's id as stored in the database.
///
/// Commands are `guild_only`, so a missing guild means a misconfigured command.
pub fn guild_id(ctx: Context<'_>) -> Result<serenity::GuildId> {
    ctx.guild_id().ok_or_else(|| Error::InvalidInput {
        message: "This command only works in a server".to_string(),
    })
}

/// Parses a stored channel id.
pub fn parse_channel(id: &str) -> Result<serenity::ChannelId> {
    id.parse::<u64>()
        .ok()
        .filter(|raw| *raw != 0)
        .map(serenity::ChannelId::new)
        .ok_or_else(|| Error::Config {
            message: format!("stored channel id `{id}` is not a Discord id"),
        })
}

/// Parses a stored user id.
pub fn parse_user(id: &str) -> Result<serenity::UserId> {
    id.parse::<u64>()
        .ok()
        .filter(|raw| *raw != 0)
        .map(serenity::UserId::new)
        .ok_or_else(|| Error::InvalidInput {
            message: format!("`{id}` is not a Discord user id"),
        })
}

/// Guild member for a stored user id, None if they have left.
pub async fn find_member(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    user_id: &str,
) -> Option<serenity::Member> {
    let user = parse_user(user_id).ok()?;
    match guild_id.member(ctx, user).await {
        Ok(member) => Some(member),
        Err(e) => {
            tracing::debug!(user_id, "Member lookup failed: {}", e);
            None
        }
    }
}

/// Display name of a stored user id, or [`MEMBER_LEFT`].
pub async fn display_name(ctx: Context<'_>, guild_id: serenity::GuildId, user_id: &str) -> String {
    find_member(ctx, guild_id, user_id)
        .await
        .map_or_else(|| MEMBER_LEFT.to_string(), |m| m.display_name().to_string())
}

/// Display names of every id in `ids` that is still a guild member.
pub async fn member_names<'a, I>(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    ids: I,
) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut names = HashMap::new();
    for id in ids {
        if names.contains_key(id) {
            continue;
        }
        if let Some(member) = find_member(ctx, guild_id, id).await {
            names.insert(id.clone(), member.display_name().to_string());
        }
    }
    names
}
