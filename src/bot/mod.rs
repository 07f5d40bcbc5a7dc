//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the interview module,
//! including all commands, autocomplete handlers, embed rendering, and the
//! shared bot context.

/// Discord command implementations (interview, questions, votes, host, macros, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Lookups shared by commands
pub mod helpers;
/// Turning packed documents into embeds
pub mod render;

use crate::{
    config::settings::Settings,
    core::album::ImgurClient,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at startup
    pub settings: Settings,
    /// Image host client, None when no client id is configured
    pub imgur: Option<ImgurClient>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        settings: Settings,
        imgur: Option<ImgurClient>,
    ) -> Self {
        Self {
            database,
            settings,
            imgur,
        }
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::iv(),
        commands::ask(),
        commands::mask(),
        commands::reply(),
        commands::answer(),
        commands::preview(),
        commands::vote(),
        commands::unvote(),
        commands::votes(),
        commands::votals(),
        commands::opt(),
        commands::host(),
        commands::bidoof(),
        commands::sadcat(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                tracing::debug!("Command `{}` refused: {}", ctx.command().name, error);
                format!("❌ {error}")
            } else {
                tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
                format!("An error occurred: {error}")
            };
            if let Err(e) = ctx.say(reply).await {
                tracing::error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework around `data` and runs the client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| tracing::error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| tracing::error!("Client error: {:?}", e))?;
    Ok(())
}
