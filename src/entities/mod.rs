//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.
//!
//! Discord snowflakes are stored as strings; row ids are local integers.

pub mod host_channel;
pub mod host_role;
pub mod host_server;
pub mod interview_meta;
pub mod interview_server;
pub mod opt_out;
pub mod question;
pub mod vote;

// Re-export specific types to avoid conflicts
pub use host_channel::{Entity as HostChannel, Model as HostChannelModel};
pub use host_role::{Entity as HostRole, Model as HostRoleModel};
pub use host_server::{Entity as HostServer, Model as HostServerModel};
pub use interview_meta::{
    Column as InterviewMetaColumn, Entity as InterviewMeta, Model as InterviewMetaModel,
};
pub use interview_server::{
    Column as InterviewServerColumn, Entity as InterviewServer, Model as InterviewServerModel,
};
pub use opt_out::{Column as OptOutColumn, Entity as OptOut, Model as OptOutModel};
pub use question::{Column as QuestionColumn, Entity as Question, Model as QuestionModel};
pub use vote::{Column as VoteColumn, Entity as Vote, Model as VoteModel};
