use dotenvy::dotenv;
use hostbot::{
    bot::{self, BotData},
    config::{database, settings},
    core::album::ImgurClient,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Optional image host
    let imgur = settings::imgur_client_id().map(ImgurClient::new);
    if imgur.is_none() {
        warn!("IMGUR_CLIENT_ID not set, picture commands are disabled");
    }

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, settings, imgur)).await
}
