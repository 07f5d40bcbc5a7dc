//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Hosting bookkeeping commands
pub mod host;

/// Interview administration commands
pub mod interview;

/// Random image commands
pub mod macros;

/// Asking, answering, and posting questions
pub mod questions;

/// Voting and opt-out commands
pub mod votes;

// Export commands
pub use general::*;
pub use host::*;
pub use interview::*;
pub use macros::*;
pub use questions::*;
pub use votes::*;
