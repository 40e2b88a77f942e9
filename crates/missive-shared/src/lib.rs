//! # missive-shared
//!
//! Types shared by every Missive crate: the parsed and classified message
//! model, the [`Conversation`](conversation::Conversation) aggregate, the
//! provider row format read from the SMS and MMS ledgers, and the error
//! taxonomy used at component boundaries.

pub mod constants;
pub mod conversation;
pub mod error;
pub mod parser;
pub mod types;

pub use conversation::{Conversation, ConversationBuilder};
pub use error::{MalformedRecordError, StorageLookupError};
pub use parser::{parse_row, ProviderRow};
pub use types::*;
