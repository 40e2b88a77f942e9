//! # missive-client
//!
//! The read path of the messenger core: merge the SMS and MMS ledgers of a
//! conversation into one bounded view, classify each message, and assemble
//! the finished [`Conversation`](missive_shared::Conversation) with its title,
//! unread count, mute flag and composite icon.

pub mod config;
pub mod conversation;
pub mod error;
pub mod fetch;
pub mod merge;

pub use config::ClientConfig;
pub use conversation::{assemble_conversation, format_title};
pub use error::ClientError;
pub use fetch::{fetch_complete_conversation, Contact, ContactResolver, MessageProvider, NoContacts};
pub use merge::{merge_and_classify, merge_rows, MergeResult};
