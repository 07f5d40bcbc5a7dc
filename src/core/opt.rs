//! Opting out of interview voting.
//!
//! Opted-out members cannot be voted for; opting out also throws away every
//! vote currently naming them.

use crate::{
    core::server,
    entities::{OptOut, Vote, opt_out, vote},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Opts a member out. Returns `Ok(false)` if they were already out.
pub async fn opt_out(db: &DatabaseConnection, guild_id: &str, user_id: &str) -> Result<bool> {
    let txn = db.begin().await?;
    let server = server::require_server(&txn, guild_id).await?;

    let existing = OptOut::find()
        .filter(opt_out::Column::ServerId.eq(server.id))
        .filter(opt_out::Column::UserId.eq(user_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    opt_out::ActiveModel {
        server_id: Set(server.id),
        user_id: Set(user_id.to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let nulled = Vote::delete_many()
        .filter(vote::Column::ServerId.eq(server.id))
        .filter(vote::Column::CandidateId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(guild_id, user_id, votes_removed = nulled.rows_affected, "Member opted out");
    Ok(true)
}

/// Opts a member back in. Returns `Ok(false)` if they were not opted out.
pub async fn opt_in(db: &DatabaseConnection, guild_id: &str, user_id: &str) -> Result<bool> {
    let server = server::require_server(db, guild_id).await?;
    let result = OptOut::delete_many()
        .filter(opt_out::Column::ServerId.eq(server.id))
        .filter(opt_out::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// User ids of every opted-out member, oldest first.
pub async fn list_opt_outs(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<String>> {
    let server = server::require_server(db, guild_id).await?;
    Ok(OptOut::find()
        .filter(opt_out::Column::ServerId.eq(server.id))
        .order_by_asc(opt_out::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|o| o.user_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_opt_out_and_back_in() -> Result<()> {
        let db = setup_active_server().await?;
        assert!(opt_out(&db, TEST_GUILD, "5").await?);
        assert!(!opt_out(&db, TEST_GUILD, "5").await?);
        assert_eq!(list_opt_outs(&db, TEST_GUILD).await?, vec!["5".to_string()]);

        assert!(opt_in(&db, TEST_GUILD, "5").await?);
        assert!(!opt_in(&db, TEST_GUILD, "5").await?);
        assert!(list_opt_outs(&db, TEST_GUILD).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_opt_out_removes_votes_for_member() -> Result<()> {
        let db = setup_active_server().await?;
        crate::core::vote::cast_votes(&db, TEST_GUILD, "1", &["5".to_string(), "6".to_string()])
            .await?;
        opt_out(&db, TEST_GUILD, "5").await?;

        let remaining = crate::core::vote::votes_for_voter(&db, TEST_GUILD, "1").await?;
        assert_eq!(remaining, vec!["6".to_string()]);
        Ok(())
    }
}
