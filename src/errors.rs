//! Unified error type for the bot.
//!
//! Every fallible operation in `core`, `config` and `bot` returns [`Result`].
//! Commands propagate with `?` and the poise `on_error` hook reports the
//! message back to the invoking user.

use thiserror::Error;

/// Errors produced anywhere in the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Caller supplied data that breaks a documented precondition
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What went wrong
        message: String,
    },

    /// The guild has not run `/iv setup`
    #[error("Interviews are not set up for server {guild_id}")]
    ServerNotConfigured {
        /// Discord guild id
        guild_id: String,
    },

    /// Voting and asking are closed for the guild
    #[error("Interviews are currently disabled")]
    InterviewDisabled,

    /// No interviewee has been chosen yet
    #[error("There is no interviewee for the current interview")]
    NoInterviewee,

    /// The question deadline for this round has passed
    #[error("Questions are closed for this interview")]
    QuestionsClosed,

    /// A ballot broke one of the voting rules
    #[error("{reason}")]
    IllegalVote {
        /// Which rule, phrased for the voter
        reason: String,
    },

    /// Question number does not exist in the current round
    #[error("Question #{number} not found")]
    QuestionNotFound {
        /// Sequence number the caller asked for
        number: i32,
    },

    /// Only the current interviewee may do this
    #[error("Only the current interviewee can do that")]
    NotInterviewee,

    /// Image host request failed
    #[error("Image host error: {0}")]
    ImageHost(#[from] reqwest::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/poise failure
    #[error("Serenity/Poise framework error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Serenity(Box::new(value))
    }
}

impl Error {
    /// Whether the message is meant for the member who ran the command,
    /// as opposed to an internal failure worth logging.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::ServerNotConfigured { .. }
                | Self::InterviewDisabled
                | Self::NoInterviewee
                | Self::QuestionsClosed
                | Self::IllegalVote { .. }
                | Self::QuestionNotFound { .. }
                | Self::NotInterviewee
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
