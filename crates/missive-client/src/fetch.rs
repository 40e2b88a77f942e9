//! End-to-end conversation fetch and the collaborators it pulls from.

use image::RgbaImage;

use missive_shared::{Conversation, Person, ProviderRow, SourceType};
use missive_store::Database;

use crate::config::ClientConfig;
use crate::conversation::assemble_conversation;
use crate::error::ClientError;
use crate::merge::merge_rows;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Source of ledger rows and participant addresses for a conversation.
pub trait MessageProvider {
    /// Participant addresses of `conversation_id`, in thread order.
    fn participants(&self, conversation_id: &str) -> Result<Vec<String>, ClientError>;

    /// Up to `limit` rows of one ledger, newest first.
    fn rows(
        &self,
        conversation_id: &str,
        source: SourceType,
        limit: usize,
    ) -> Result<Vec<ProviderRow>, ClientError>;
}

/// What the contact-resolution service knows about an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub display_name: String,
    pub contact_ref: Option<String>,
}

pub trait ContactResolver {
    fn resolve(&self, address: &str) -> Option<Contact>;

    /// Avatar for a participant, if the service has one.
    fn avatar(&self, _person: &Person) -> Option<RgbaImage> {
        None
    }

    /// Participant for `address`, falling back to the bare address.
    fn person(&self, address: &str) -> Person {
        match self.resolve(address) {
            Some(contact) => Person {
                display_name: contact.display_name,
                contact_ref: contact.contact_ref,
            },
            None => Person::new(address),
        }
    }
}

/// Resolver that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContacts;

impl ContactResolver for NoContacts {
    fn resolve(&self, _address: &str) -> Option<Contact> {
        None
    }
}

/// The local ledger serves single-party threads keyed by address, SMS only.
impl MessageProvider for Database {
    fn participants(&self, conversation_id: &str) -> Result<Vec<String>, ClientError> {
        Ok(vec![conversation_id.to_string()])
    }

    fn rows(
        &self,
        conversation_id: &str,
        source: SourceType,
        limit: usize,
    ) -> Result<Vec<ProviderRow>, ClientError> {
        match source {
            SourceType::Sms => {
                let limit = u32::try_from(limit).unwrap_or(u32::MAX);
                Ok(self.ledger_rows(conversation_id, limit)?)
            }
            SourceType::Mms => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Build the finished conversation for `conversation_id`.
///
/// Provider failures never surface: a ledger that cannot be read counts as
/// empty and a participant list that cannot be read counts as none, each with
/// a warning. The worst case is a conversation with no messages.
pub fn fetch_complete_conversation(
    conversation_id: &str,
    provider: &dyn MessageProvider,
    contacts: &dyn ContactResolver,
    muted: impl Fn(&str) -> bool,
    config: &ClientConfig,
) -> Conversation {
    let limit = config.conversation_size_limit;

    let ledgers: Vec<Vec<ProviderRow>> = [SourceType::Sms, SourceType::Mms]
        .into_iter()
        .map(|source| {
            provider
                .rows(conversation_id, source, limit)
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        %conversation_id,
                        ?source,
                        error = %e,
                        "ledger unavailable, treating as empty"
                    );
                    Vec::new()
                })
        })
        .collect();

    let addresses = provider.participants(conversation_id).unwrap_or_else(|e| {
        tracing::warn!(%conversation_id, error = %e, "participants unavailable");
        Vec::new()
    });
    let participants: Vec<Person> = addresses.iter().map(|a| contacts.person(a)).collect();

    let merged = merge_rows(&ledgers, limit, contacts);

    tracing::debug!(
        %conversation_id,
        messages = merged.messages.len(),
        unread = merged.unread_prefix_count,
        "fetched conversation"
    );

    assemble_conversation(
        conversation_id,
        participants,
        merged,
        muted,
        |person| contacts.avatar(person),
        config,
    )
}
