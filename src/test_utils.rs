//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and interview rounds with sensible defaults.

use crate::{
    core::{
        packer::Participant,
        question::{self, MessageOrigin},
        server,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Guild id every helper configures.
pub const TEST_GUILD: &str = "100";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up [`TEST_GUILD`] for interviews and enables them.
///
/// # Defaults
/// * answer channel: `"200"`
/// * backstage channel: `"300"`
/// * no interviewee
pub async fn setup_active_server() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    server::setup_server(&db, TEST_GUILD, "200", "300", "test sheet").await?;
    server::set_active(&db, TEST_GUILD, true).await?;
    Ok(db)
}

/// Like [`setup_active_server`], with a round started for `interviewee_id`.
pub async fn setup_round(interviewee_id: &str) -> Result<DatabaseConnection> {
    let db = setup_active_server().await?;
    server::start_interview(&db, TEST_GUILD, interviewee_id).await?;
    Ok(db)
}

/// Origin every test question claims to come from.
#[must_use]
pub fn test_origin() -> MessageOrigin {
    MessageOrigin {
        channel_id: "500".to_string(),
        message_id: "600".to_string(),
    }
}

/// Asks a question in [`TEST_GUILD`] as `asker_id`.
pub async fn ask_test_question(
    db: &DatabaseConnection,
    asker_id: &str,
    text: &str,
) -> Result<entities::question::Model> {
    let asker = Participant::new(asker_id, format!("asker {asker_id}"));
    question::ask_question(db, TEST_GUILD, &asker, text, &test_origin()).await
}
