//! Merge & classify.
//!
//! Each ledger arrives newest first and is classified on its own: walking
//! it from the newest message down, blank messages are dropped, and once an
//! outbound message has been seen every older inbound message in that
//! ledger counts as read.
//!
//! The classified ledgers are then concatenated, stably sorted newest first
//! and truncated. Equal timestamps keep ledger order, then row order.

use missive_shared::{parse_row, Direction, Message, Person, ProviderRow, RawMessage};

use crate::fetch::ContactResolver;

/// Output of [`merge_and_classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    /// Classified messages, newest first.
    pub messages: Vec<Message>,
    /// Length of the run of unread inbound messages at the head of
    /// `messages`.
    pub unread_prefix_count: usize,
    /// True when the newest message is outbound.
    pub has_reply: bool,
}

impl MergeResult {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Merge raw streams and classify them, naming senders by address.
pub fn merge_and_classify(streams: Vec<Vec<RawMessage>>, limit: usize) -> MergeResult {
    merge(streams, limit, |address| Person::new(address))
}

/// Parse provider rows, skipping malformed ones, then merge and classify.
///
/// Senders are named through `contacts`; unknown addresses fall back to the
/// address itself.
pub fn merge_rows(
    ledgers: &[Vec<ProviderRow>],
    limit: usize,
    contacts: &dyn ContactResolver,
) -> MergeResult {
    let streams = ledgers
        .iter()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| match parse_row(row) {
                    Ok(raw) => Some(raw),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed provider row");
                        None
                    }
                })
                .collect()
        })
        .collect();

    merge(streams, limit, |address| contacts.person(address))
}

fn merge(
    streams: Vec<Vec<RawMessage>>,
    limit: usize,
    sender: impl Fn(&str) -> Person,
) -> MergeResult {
    let mut messages: Vec<Message> = streams
        .into_iter()
        .flat_map(|stream| classify_ledger(stream, &sender))
        .collect();

    // Stable, so ties keep their concatenation order.
    messages.sort_by(|a, b| b.timestamp_millis.cmp(&a.timestamp_millis));
    messages.truncate(limit);

    let has_reply = messages.first().is_some_and(Message::is_sent);
    let unread_prefix_count = messages.iter().take_while(|m| m.is_unread()).count();

    MergeResult {
        messages,
        unread_prefix_count,
        has_reply,
    }
}

/// Classify one newest-first ledger, dropping blank messages.
fn classify_ledger(ledger: Vec<RawMessage>, sender: &impl Fn(&str) -> Person) -> Vec<Message> {
    let mut reply_seen = false;
    ledger
        .into_iter()
        .filter(|raw| {
            if raw.is_blank() {
                tracing::debug!(
                    timestamp = raw.timestamp_millis,
                    source = ?raw.source,
                    "dropping blank message"
                );
                false
            } else {
                true
            }
        })
        .map(|raw| {
            let person = sender(&raw.sender_address);
            match raw.direction {
                Direction::Outbound => {
                    reply_seen = true;
                    Message::sent(raw.text, raw.timestamp_millis, person)
                }
                Direction::Inbound => Message::received(
                    raw.text,
                    raw.timestamp_millis,
                    person,
                    raw.read || reply_seen,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use missive_shared::constants::columns;
    use missive_shared::{MessageStatus, MessageType, SourceType};

    use super::*;
    use crate::fetch::{Contact, NoContacts};

    fn raw(text: &str, ts: i64, direction: Direction, read: bool) -> RawMessage {
        RawMessage {
            text: text.to_string(),
            timestamp_millis: ts,
            direction,
            read,
            sender_address: "555".to_string(),
            source: SourceType::Sms,
        }
    }

    fn inbound(text: &str, ts: i64, read: bool) -> RawMessage {
        raw(text, ts, Direction::Inbound, read)
    }

    fn outbound(text: &str, ts: i64) -> RawMessage {
        raw(text, ts, Direction::Outbound, true)
    }

    fn texts(result: &MergeResult) -> Vec<(&str, i64)> {
        result
            .messages
            .iter()
            .map(|m| (m.text.as_str(), m.timestamp_millis))
            .collect()
    }

    #[test]
    fn test_two_ledgers_one_unread() {
        let result = merge_and_classify(
            vec![vec![inbound("hi", 10, false)], vec![inbound("yo", 5, true)]],
            5,
        );
        assert_eq!(texts(&result), vec![("hi", 10), ("yo", 5)]);
        assert_eq!(result.unread_prefix_count, 1);
        assert!(!result.has_reply);
    }

    #[test]
    fn test_reply_suppresses_unread() {
        let result = merge_and_classify(
            vec![vec![outbound("ok", 20), inbound("hey", 15, false)]],
            5,
        );
        assert_eq!(result.unread_prefix_count, 0);
        assert!(result.has_reply);
        assert_eq!(result.messages[0].message_type, MessageType::Sent);
        assert_eq!(result.messages[0].status, MessageStatus::None);
        // Older than the reply, so implicitly read.
        assert_eq!(result.messages[1].status, MessageStatus::Read);
    }

    #[test]
    fn test_reply_only_marks_its_own_ledger_read() {
        let mut mms_reply = outbound("sent pic", 12);
        mms_reply.source = SourceType::Mms;

        let result = merge_and_classify(
            vec![
                vec![inbound("new", 20, false), inbound("old", 10, false)],
                vec![mms_reply, inbound("older mms", 5, false)],
            ],
            10,
        );
        let statuses: Vec<_> = result.messages.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![
                MessageStatus::Unread,
                MessageStatus::None,
                MessageStatus::Unread,
                MessageStatus::Read
            ]
        );
        assert_eq!(result.unread_prefix_count, 1);
        assert!(!result.has_reply);
    }

    #[test]
    fn test_blank_reply_does_not_mark_read() {
        let result = merge_and_classify(
            vec![vec![
                raw(" ", 20, Direction::Outbound, true),
                inbound("hey", 10, false),
            ]],
            10,
        );
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.unread_prefix_count, 1);
        assert!(!result.has_reply);
    }

    #[test]
    fn test_unread_run_stops_at_read() {
        let result = merge_and_classify(
            vec![vec![
                inbound("a", 40, false),
                inbound("b", 30, false),
                inbound("c", 20, true),
                inbound("d", 10, false),
            ]],
            10,
        );
        assert_eq!(result.unread_prefix_count, 2);
    }

    #[test]
    fn test_blank_messages_dropped() {
        let result = merge_and_classify(
            vec![
                vec![inbound("text", 10, false)],
                vec![inbound("   ", 10, false), inbound("", 9, false)],
            ],
            10,
        );
        assert_eq!(texts(&result), vec![("text", 10)]);
    }

    #[test]
    fn test_limit_and_descending_order() {
        let sms = vec![inbound("s3", 30, true), inbound("s1", 10, true)];
        let mms = vec![inbound("m4", 40, true), inbound("m2", 20, true), inbound("m0", 0, true)];

        for limit in 0..7 {
            let result = merge_and_classify(vec![sms.clone(), mms.clone()], limit);
            assert!(result.messages.len() <= limit);
            assert!(result
                .messages
                .windows(2)
                .all(|w| w[0].timestamp_millis > w[1].timestamp_millis));
        }

        let result = merge_and_classify(vec![sms, mms], 3);
        assert_eq!(texts(&result), vec![("m4", 40), ("s3", 30), ("m2", 20)]);
    }

    #[test]
    fn test_ties_keep_stream_order() {
        let result = merge_and_classify(
            vec![vec![inbound("sms", 10, true)], vec![inbound("mms", 10, true)]],
            10,
        );
        assert_eq!(texts(&result), vec![("sms", 10), ("mms", 10)]);
    }

    #[test]
    fn test_empty_input() {
        let result = merge_and_classify(Vec::new(), 10);
        assert!(result.is_empty());
        assert_eq!(result, MergeResult::default());
    }

    struct OneContact;

    impl ContactResolver for OneContact {
        fn resolve(&self, address: &str) -> Option<Contact> {
            (address == "555").then(|| Contact {
                display_name: "Ada".into(),
                contact_ref: Some("c1".into()),
            })
        }
    }

    #[test]
    fn test_merge_rows_skips_malformed() {
        let sms = vec![
            ProviderRow::new()
                .with(columns::ADDRESS, "555")
                .with(columns::BODY, "hello")
                .with(columns::DATE, 2_000)
                .with(columns::TYPE, 1)
                .with(columns::READ, 0),
            // No date column.
            ProviderRow::new()
                .with(columns::ADDRESS, "555")
                .with(columns::BODY, "broken")
                .with(columns::TYPE, 1)
                .with(columns::READ, 0),
        ];
        let mms = vec![ProviderRow::new()
            .with(columns::ADDRESS, "777")
            .with(columns::TEXT, "pic")
            .with(columns::DATE, 3)
            .with(columns::MSG_BOX, 1)
            .with(columns::READ, 1)];

        let result = merge_rows(&[sms, mms], 10, &OneContact);
        assert_eq!(texts(&result), vec![("pic", 3_000), ("hello", 2_000)]);
        assert_eq!(result.messages[0].sender, Person::new("777"));
        assert_eq!(result.messages[1].sender, Person::new("Ada").with_contact_ref("c1"));

        let unnamed = merge_rows(&[], 10, &NoContacts);
        assert!(unnamed.is_empty());
    }
}
