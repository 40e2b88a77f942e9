//! The [`Conversation`] aggregate handed to UI collaborators.
//!
//! A conversation is built fresh on every fetch through
//! [`ConversationBuilder`] and is immutable once built. Messages are stored
//! oldest first.

use image::RgbaImage;

use crate::constants::MAX_UNREAD_COUNT;
use crate::types::{Message, Person};

#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    title: String,
    participants: Vec<Person>,
    messages: Vec<Message>,
    unread_count: usize,
    muted: bool,
    icon: Option<RgbaImage>,
}

impl Conversation {
    pub fn builder(id: impl Into<String>) -> ConversationBuilder {
        ConversationBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Participants in first-seen order, without duplicates.
    pub fn participants(&self) -> &[Person] {
        &self.participants
    }

    /// Messages in ascending timestamp order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn icon(&self) -> Option<&RgbaImage> {
        self.icon.as_ref()
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Timestamp of the most recent message (received or replied), or 0.
    pub fn timestamp(&self) -> i64 {
        self.last_message().map_or(0, |m| m.timestamp_millis)
    }

    /// True when the most recent message was sent by the user.
    pub fn is_replied(&self) -> bool {
        self.last_message().is_some_and(Message::is_sent)
    }

    pub fn last_message_preview(&self) -> &str {
        self.last_message().map_or("", |m| m.text.as_str())
    }

    /// Unread count as shown in a conversation list ("10+" past the cap).
    pub fn unread_count_label(&self) -> String {
        if self.unread_count > MAX_UNREAD_COUNT {
            format!("{MAX_UNREAD_COUNT}+")
        } else {
            self.unread_count.to_string()
        }
    }
}

/// Accumulates the parts of a [`Conversation`] during a fetch.
#[derive(Debug, Clone)]
pub struct ConversationBuilder {
    id: String,
    title: String,
    participants: Vec<Person>,
    messages: Vec<Message>,
    unread_count: usize,
    muted: bool,
    icon: Option<RgbaImage>,
}

impl ConversationBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            participants: Vec::new(),
            messages: Vec::new(),
            unread_count: 0,
            muted: false,
            icon: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Add a participant unless an equal one was already added.
    pub fn participant(mut self, person: Person) -> Self {
        if !self.participants.contains(&person) {
            self.participants.push(person);
        }
        self
    }

    pub fn participants(self, people: impl IntoIterator<Item = Person>) -> Self {
        people.into_iter().fold(self, Self::participant)
    }

    /// Messages must already be in ascending timestamp order.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        debug_assert!(messages
            .windows(2)
            .all(|w| w[0].timestamp_millis <= w[1].timestamp_millis));
        self.messages = messages;
        self
    }

    pub fn unread_count(mut self, unread_count: usize) -> Self {
        self.unread_count = unread_count;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn icon(mut self, icon: Option<RgbaImage>) -> Self {
        self.icon = icon;
        self
    }

    pub fn build(self) -> Conversation {
        Conversation {
            id: self.id,
            title: self.title,
            participants: self.participants,
            messages: self.messages,
            unread_count: self.unread_count,
            muted: self.muted,
            icon: self.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me() -> Person {
        Person::new("self")
    }

    #[test]
    fn test_last_message_none_when_empty() {
        let conv = Conversation::builder("0").build();
        assert!(conv.last_message().is_none());
        assert_eq!(conv.timestamp(), 0);
        assert_eq!(conv.last_message_preview(), "");
        assert!(!conv.is_replied());
    }

    #[test]
    fn test_last_message_and_timestamp() {
        let conv = Conversation::builder("0")
            .messages(vec![
                Message::received("msg", 0, me(), true),
                Message::received("msg2", 1, me(), false),
            ])
            .build();

        assert_eq!(conv.last_message().map(|m| m.text.as_str()), Some("msg2"));
        assert_eq!(conv.timestamp(), 1);
        assert!(!conv.is_replied());
    }

    #[test]
    fn test_preview_and_replied() {
        let conv = Conversation::builder("0")
            .messages(vec![
                Message::received("msg", 0, me(), true),
                Message::sent("reply", 1, me()),
            ])
            .build();

        assert_eq!(conv.last_message_preview(), "reply");
        assert!(conv.is_replied());
    }

    #[test]
    fn test_participants_are_unique_in_first_seen_order() {
        let conv = Conversation::builder("0")
            .participants([Person::new("b"), Person::new("a"), Person::new("b")])
            .build();

        let names: Vec<_> = conv
            .participants()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_unread_count_label_overflow() {
        let conv = Conversation::builder("0").unread_count(4).build();
        assert_eq!(conv.unread_count_label(), "4");

        let conv = Conversation::builder("0").unread_count(11).build();
        assert_eq!(conv.unread_count_label(), "10+");
    }
}
