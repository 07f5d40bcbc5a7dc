//! Voting business logic - ballots, vote legality, and vote tallies.
//!
//! Each member holds at most one ballot of up to `max_votes` nominees; casting
//! a new ballot replaces the old one. Tallies are rendered as fixed-width text
//! for an `ini` code block.

use crate::{
    core::server,
    entities::{OptOut, Vote, interview_meta, opt_out, vote},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Shown in place of members who are no longer in the guild.
pub const MEMBER_LEFT: &str = "[Member Left]";

/// Tally text is cut off before it grows past this many characters.
pub const MAX_VOTALS_LENGTH: usize = 1750;

/// The member casting a ballot.
#[derive(Debug, Clone)]
pub struct Voter {
    /// Discord user ID
    pub id: String,
    /// When the voter joined the guild, if known
    pub joined_at: Option<DateTime<Utc>>,
}

/// A member named on a ballot.
#[derive(Debug, Clone)]
pub struct Nominee {
    /// Discord user ID
    pub id: String,
    /// Whether the account is a bot
    pub is_bot: bool,
}

/// One candidate in a tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Display name, or [`MEMBER_LEFT`]
    pub name: String,
    /// Display names of the voters, sorted case-insensitively
    pub voters: Vec<String>,
}

impl Candidate {
    fn label(&self, width: usize) -> String {
        format!("{:<width$}", format!("{}:", self.name), width = width + 1)
    }

    /// `name: count`
    #[must_use]
    pub fn basic_line(&self, width: usize) -> String {
        format!("{} {}", self.label(width), self.voters.len())
    }

    /// `name: count (voter, voter)`
    #[must_use]
    pub fn full_line(&self, width: usize) -> String {
        format!("{} ({})", self.basic_line(width), self.voters.join(", "))
    }
}

fn illegal(reason: impl Into<String>) -> Error {
    Error::IllegalVote {
        reason: reason.into(),
    }
}

/// Checks a ballot against the voting rules and returns the distinct nominee ids.
///
/// Rules: interviews must be enabled; at most `max_votes` nominees; no voting
/// for yourself, for bots, or for opted-out members; no voting for the current
/// interviewee unless re-interviews are allowed; no voting if you joined after
/// the current interview started.
pub fn check_ballot(
    meta: &interview_meta::Model,
    opted_out: &HashSet<String>,
    voter: &Voter,
    nominees: &[Nominee],
    max_votes: usize,
) -> Result<Vec<String>> {
    if !meta.active {
        return Err(Error::InterviewDisabled);
    }
    if voter.joined_at.is_some_and(|joined| joined > meta.start_time) {
        return Err(illegal(
            "You joined after this interview started, so you can't vote until the next one.",
        ));
    }

    let mut ids: Vec<String> = Vec::new();
    for nominee in nominees {
        if ids.contains(&nominee.id) {
            continue;
        }
        if nominee.id == voter.id {
            return Err(illegal("You can't vote for yourself."));
        }
        if nominee.is_bot {
            return Err(illegal("You can't vote for bots."));
        }
        if opted_out.contains(&nominee.id) {
            return Err(illegal(format!("<@{}> has opted out of interviews.", nominee.id)));
        }
        if !meta.reinterviews_allowed && meta.interviewee_id.as_deref() == Some(nominee.id.as_str()) {
            return Err(illegal(format!("<@{}> was interviewed too recently.", nominee.id)));
        }
        ids.push(nominee.id.clone());
    }

    if ids.is_empty() {
        return Err(illegal("Name at least one member to vote for."));
    }
    if ids.len() > max_votes {
        return Err(illegal(format!("You can vote for at most {max_votes} members.")));
    }
    Ok(ids)
}

/// Replaces the voter's ballot with `candidate_ids`. No legality checks.
pub async fn cast_votes(
    db: &DatabaseConnection,
    guild_id: &str,
    voter_id: &str,
    candidate_ids: &[String],
) -> Result<Vec<vote::Model>> {
    let txn = db.begin().await?;
    let server = server::require_server(&txn, guild_id).await?;

    Vote::delete_many()
        .filter(vote::Column::ServerId.eq(server.id))
        .filter(vote::Column::VoterId.eq(voter_id))
        .exec(&txn)
        .await?;

    let now = Utc::now();
    let mut votes = Vec::with_capacity(candidate_ids.len());
    for candidate_id in candidate_ids {
        let vote = vote::ActiveModel {
            server_id: Set(server.id),
            voter_id: Set(voter_id.to_string()),
            candidate_id: Set(candidate_id.clone()),
            timestamp: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        votes.push(vote);
    }

    txn.commit().await?;
    Ok(votes)
}

/// Checks a ballot against the current round and records it.
pub async fn submit_ballot(
    db: &DatabaseConnection,
    guild_id: &str,
    voter: &Voter,
    nominees: &[Nominee],
    max_votes: usize,
) -> Result<Vec<vote::Model>> {
    let server = server::require_server(db, guild_id).await?;
    let meta = server::get_meta(db, &server).await?;
    let opted_out: HashSet<String> = OptOut::find()
        .filter(opt_out::Column::ServerId.eq(server.id))
        .all(db)
        .await?
        .into_iter()
        .map(|o| o.user_id)
        .collect();

    let ids = check_ballot(&meta, &opted_out, voter, nominees, max_votes)?;
    tracing::debug!(guild_id, voter = %voter.id, ?ids, "Ballot accepted");
    cast_votes(db, guild_id, &voter.id, &ids).await
}

/// Deletes the voter's ballot. Returns how many votes were removed.
pub async fn clear_votes(db: &DatabaseConnection, guild_id: &str, voter_id: &str) -> Result<u64> {
    let server = server::require_server(db, guild_id).await?;
    let result = Vote::delete_many()
        .filter(vote::Column::ServerId.eq(server.id))
        .filter(vote::Column::VoterId.eq(voter_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Every vote cast on the server.
pub async fn all_votes(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<vote::Model>> {
    let server = server::require_server(db, guild_id).await?;
    Vote::find()
        .filter(vote::Column::ServerId.eq(server.id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Candidate ids on the voter's ballot.
pub async fn votes_for_voter(
    db: &DatabaseConnection,
    guild_id: &str,
    voter_id: &str,
) -> Result<Vec<String>> {
    Ok(all_votes(db, guild_id)
        .await?
        .into_iter()
        .filter(|v| v.voter_id == voter_id)
        .map(|v| v.candidate_id)
        .collect())
}

/// Every voter and candidate id mentioned in `votes`, once each, sorted.
#[must_use]
pub fn participant_ids(votes: &[vote::Model]) -> Vec<String> {
    let mut ids: Vec<String> = votes
        .iter()
        .flat_map(|v| [v.voter_id.clone(), v.candidate_id.clone()])
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    ids.sort_unstable();
    ids
}

/// Groups votes by candidate.
///
/// `names` maps the ids of current guild members to display names; votes
/// from voters missing from it are ignored and candidates missing from it are
/// shown as [`MEMBER_LEFT`]. Sorted by vote count, then name.
#[must_use]
pub fn tally(votes: &[vote::Model], names: &HashMap<String, String>) -> Vec<Candidate> {
    let mut by_candidate: HashMap<&str, Vec<String>> = HashMap::new();
    for vote in votes {
        let voters = by_candidate.entry(vote.candidate_id.as_str()).or_default();
        if let Some(voter) = names.get(&vote.voter_id) {
            voters.push(voter.clone());
        }
    }

    let mut candidates: Vec<Candidate> = by_candidate
        .into_iter()
        .map(|(id, mut voters)| {
            voters.sort_by_key(|name| name.to_lowercase());
            Candidate {
                name: names.get(id).cloned().unwrap_or_else(|| MEMBER_LEFT.to_string()),
                voters,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.voters
            .len()
            .cmp(&a.voters.len())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    candidates
}

/// Renders a tally, one candidate per line, padded to a common width.
///
/// Stops before the text would exceed [`MAX_VOTALS_LENGTH`].
pub fn format_votals(candidates: &[Candidate], full: bool) -> Result<String> {
    let width = candidates
        .iter()
        .map(|c| c.name.chars().count())
        .chain(std::iter::once(MEMBER_LEFT.len()))
        .max()
        .unwrap_or_default();

    let mut text = String::new();
    for candidate in candidates {
        let line = if full {
            candidate.full_line(width)
        } else {
            candidate.basic_line(width)
        };
        if text.chars().count() + line.chars().count() > MAX_VOTALS_LENGTH {
            break;
        }
        writeln!(&mut text, "{line}")?;
    }
    Ok(text)
}

/// Footer telling a member who they are voting for.
#[must_use]
pub fn votes_footer(candidate_names: &[String]) -> String {
    if candidate_names.is_empty() {
        return "_You are not currently voting; vote with `/vote`._".to_string();
    }
    let mut names = candidate_names.to_vec();
    names.sort_by_key(|name| name.to_lowercase());
    let listed = names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("_You are currently voting for: {listed}._")
}
