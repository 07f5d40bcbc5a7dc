//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    HostChannel, HostRole, HostServer, InterviewMeta, InterviewServer, OptOut, Question, Vote,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/hostbot.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Directory a file-backed `SQLite` URL points into, if any.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    Path::new(path).parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// The directory holding a `SQLite` file is created if missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table the bot uses, skipping ones that already exist.
///
/// Parent tables are created before the tables holding foreign keys to them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, InterviewServer).await?;
    create_table(db, &schema, InterviewMeta).await?;
    create_table(db, &schema, Vote).await?;
    create_table(db, &schema, OptOut).await?;
    create_table(db, &schema, Question).await?;

    create_table(db, &schema, HostServer).await?;
    create_table(db, &schema, HostRole).await?;
    create_table(db, &schema, HostChannel).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{InterviewMetaModel, InterviewServerModel, QuestionModel, VoteModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<InterviewServerModel> = InterviewServer::find().limit(1).all(&db).await?;
        let _: Vec<InterviewMetaModel> = InterviewMeta::find().limit(1).all(&db).await?;
        let _: Vec<VoteModel> = Vote::find().limit(1).all(&db).await?;
        let _: Vec<QuestionModel> = Question::find().limit(1).all(&db).await?;
        let _ = OptOut::find().limit(1).all(&db).await?;
        let _ = HostServer::find().limit(1).all(&db).await?;
        let _ = HostRole::find().limit(1).all(&db).await?;
        let _ = HostChannel::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/hostbot.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://hostbot.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://localhost/db"), None);
    }
}
