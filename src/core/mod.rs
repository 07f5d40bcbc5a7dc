//! Core business logic - framework-agnostic interview, voting and image operations.
//!
//! Nothing in here touches Discord types; the bot layer resolves members,
//! names and links before calling in.

/// Random images from image-host albums
pub mod album;
/// Channel and role bookkeeping for game hosting
pub mod host;
/// Opting out of interview voting
pub mod opt;
/// Packing answered questions into embed-sized documents
pub mod packer;
/// Asking, answering and collecting questions
pub mod question;
/// Interview server setup and round lifecycle
pub mod server;
/// Markup escaping, quoting and chunking helpers
pub mod text;
/// Ballots and tallies
pub mod vote;
