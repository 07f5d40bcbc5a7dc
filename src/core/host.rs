//! Host bookkeeping - which roles and channels a guild uses for hosting games.

use crate::{
    entities::{HostChannel, HostRole, HostServer, host_channel, host_role, host_server},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};

/// Registers a guild, or renames it and updates its sheet if already known.
pub async fn register_server(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    sheet: &str,
) -> Result<host_server::Model> {
    if let Some(existing) = find_server(db, guild_id).await? {
        let mut server: host_server::ActiveModel = existing.into();
        server.name = Set(name.to_string());
        server.sheet = Set(sheet.to_string());
        return server.update(db).await.map_err(Into::into);
    }

    host_server::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        name: Set(name.to_string()),
        sheet: Set(sheet.to_string()),
        role_pms_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a registered guild.
pub async fn find_server(db: &DatabaseConnection, guild_id: &str) -> Result<Option<host_server::Model>> {
    HostServer::find()
        .filter(host_server::Column::GuildId.eq(guild_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_server(db: &DatabaseConnection, guild_id: &str) -> Result<host_server::Model> {
    find_server(db, guild_id)
        .await?
        .ok_or_else(|| Error::ServerNotConfigured {
            guild_id: guild_id.to_string(),
        })
}

/// Marks a role as used for `kind`, replacing any earlier designation.
pub async fn designate_role(db: &DatabaseConnection, guild_id: &str, role_id: &str, kind: &str) -> Result<()> {
    let server = require_server(db, guild_id).await?;
    HostRole::insert(host_role::ActiveModel {
        id: Set(role_id.to_string()),
        kind: Set(kind.to_string()),
        server_id: Set(server.id),
    })
    .on_conflict(
        OnConflict::column(host_role::Column::Id)
            .update_columns([host_role::Column::Kind, host_role::Column::ServerId])
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Marks a channel as used for `kind`, replacing any earlier designation.
pub async fn designate_channel(
    db: &DatabaseConnection,
    guild_id: &str,
    channel_id: &str,
    kind: &str,
) -> Result<()> {
    let server = require_server(db, guild_id).await?;
    HostChannel::insert(host_channel::ActiveModel {
        id: Set(channel_id.to_string()),
        kind: Set(kind.to_string()),
        server_id: Set(server.id),
    })
    .on_conflict(
        OnConflict::column(host_channel::Column::Id)
            .update_columns([host_channel::Column::Kind, host_channel::Column::ServerId])
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Role ids designated for `kind` in a guild.
pub async fn roles_of_kind(db: &DatabaseConnection, guild_id: &str, kind: &str) -> Result<Vec<String>> {
    let server = require_server(db, guild_id).await?;
    Ok(server
        .find_related(HostRole)
        .filter(host_role::Column::Kind.eq(kind))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect())
}

/// Channel ids designated for `kind` in a guild.
pub async fn channels_of_kind(db: &DatabaseConnection, guild_id: &str, kind: &str) -> Result<Vec<String>> {
    let server = require_server(db, guild_id).await?;
    Ok(server
        .find_related(HostChannel)
        .filter(host_channel::Column::Kind.eq(kind))
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect())
}
