use serde::{Deserialize, Serialize};

/// Which ledger a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Sms,
    Mms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// One ledger row in canonical form, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message text; empty when the provider stored no text.
    pub text: String,
    pub timestamp_millis: i64,
    pub direction: Direction,
    /// Provider `read` flag.
    pub read: bool,
    pub sender_address: String,
    pub source: SourceType,
}

impl RawMessage {
    /// True when the text is empty after trimming.
    ///
    /// A text message sent together with media can show up as two rows, one
    /// of them blank; blank rows never reach the merged view.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Sent,
    Inbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageStatus {
    None,
    Read,
    Unread,
}

/// A conversation participant.
///
/// Avatars are deliberately not carried here: a conversation may reference
/// many participants, and the composite icon lives on the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub display_name: String,
    /// Opaque reference into the contact-resolution service, if any.
    pub contact_ref: Option<String>,
}

impl Person {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            contact_ref: None,
        }
    }

    pub fn with_contact_ref(mut self, contact_ref: impl Into<String>) -> Self {
        self.contact_ref = Some(contact_ref.into());
        self
    }
}

/// A classified message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub timestamp_millis: i64,
    pub message_type: MessageType,
    /// Always [`MessageStatus::None`] for sent messages.
    pub status: MessageStatus,
    pub sender: Person,
}

impl Message {
    pub fn sent(text: impl Into<String>, timestamp_millis: i64, sender: Person) -> Self {
        Self {
            text: text.into(),
            timestamp_millis,
            message_type: MessageType::Sent,
            status: MessageStatus::None,
            sender,
        }
    }

    pub fn received(
        text: impl Into<String>,
        timestamp_millis: i64,
        sender: Person,
        read: bool,
    ) -> Self {
        Self {
            text: text.into(),
            timestamp_millis,
            message_type: MessageType::Inbox,
            status: if read {
                MessageStatus::Read
            } else {
                MessageStatus::Unread
            },
            sender,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.message_type == MessageType::Sent
    }

    pub fn is_unread(&self) -> bool {
        self.message_type == MessageType::Inbox && self.status == MessageStatus::Unread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        let mut msg = RawMessage {
            text: "  \n\t".to_string(),
            timestamp_millis: 1,
            direction: Direction::Inbound,
            read: false,
            sender_address: "555".to_string(),
            source: SourceType::Mms,
        };
        assert!(msg.is_blank());

        msg.text = " hi ".to_string();
        assert!(!msg.is_blank());
    }

    #[test]
    fn test_sent_message_has_no_status() {
        let msg = Message::sent("ok", 5, Person::new("me"));
        assert_eq!(msg.status, MessageStatus::None);
        assert!(!msg.is_unread());
    }
}
