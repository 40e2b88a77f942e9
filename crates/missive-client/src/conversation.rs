//! Conversation assembly.

use image::RgbaImage;

use missive_media::compose_avatar;
use missive_shared::constants::{MAX_TITLE_NAMES, TITLE_DELIMITER};
use missive_shared::{Conversation, Person};

use crate::config::ClientConfig;
use crate::merge::MergeResult;

/// Join the first three participant names; more than three get an overflow
/// suffix rendered from `overflow_template` (`{count}` is the number left
/// out).
pub fn format_title(participants: &[Person], overflow_template: &str) -> String {
    let mut title = participants
        .iter()
        .take(MAX_TITLE_NAMES)
        .map(|p| p.display_name.as_str())
        .collect::<Vec<_>>()
        .join(TITLE_DELIMITER);

    if participants.len() > MAX_TITLE_NAMES {
        let hidden = participants.len() - MAX_TITLE_NAMES;
        title.push_str(&overflow_template.replace("{count}", &hidden.to_string()));
    }
    title
}

/// Build the finished conversation from a merge result.
///
/// `muted` is asked once for `id`. `avatar` is asked for participants in
/// order until enough images for the group icon have been collected.
pub fn assemble_conversation(
    id: &str,
    participants: Vec<Person>,
    merge: MergeResult,
    muted: impl Fn(&str) -> bool,
    avatar: impl Fn(&Person) -> Option<RgbaImage>,
    config: &ClientConfig,
) -> Conversation {
    let mut unique: Vec<Person> = Vec::with_capacity(participants.len());
    for person in participants {
        if !unique.contains(&person) {
            unique.push(person);
        }
    }

    let title = format_title(&unique, &config.overflow_template);

    let images: Vec<RgbaImage> = unique
        .iter()
        .filter_map(&avatar)
        .take(config.avatar.max_group_size)
        .collect();
    let icon = compose_avatar(&images, &config.avatar);

    let MergeResult {
        mut messages,
        unread_prefix_count,
        ..
    } = merge;
    messages.reverse();

    Conversation::builder(id)
        .title(title)
        .participants(unique)
        .messages(messages)
        .unread_count(unread_prefix_count)
        .muted(muted(id))
        .icon(icon)
        .build()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use image::Rgba;
    use missive_shared::{Direction, RawMessage, SourceType};

    use super::*;
    use crate::merge::merge_and_classify;

    fn people(names: &[&str]) -> Vec<Person> {
        names.iter().map(|n| Person::new(*n)).collect()
    }

    #[test]
    fn test_title_three_or_fewer() {
        assert_eq!(format_title(&people(&["Ada"]), " +{count} more"), "Ada");
        assert_eq!(
            format_title(&people(&["Ada", "Bob", "Cy"]), " +{count} more"),
            "Ada, Bob, Cy"
        );
        assert_eq!(format_title(&[], " +{count} more"), "");
    }

    #[test]
    fn test_title_overflow() {
        let five = people(&["Ada", "Bob", "Cy", "Di", "Ed"]);
        assert_eq!(format_title(&five, " +{count} more"), "Ada, Bob, Cy +2 more");
        assert_eq!(format_title(&five, " (+{count})"), "Ada, Bob, Cy (+2)");
    }

    fn raw(text: &str, ts: i64, direction: Direction) -> RawMessage {
        RawMessage {
            text: text.into(),
            timestamp_millis: ts,
            direction,
            read: false,
            sender_address: "555".into(),
            source: SourceType::Sms,
        }
    }

    #[test]
    fn test_assemble_orders_ascending() {
        let merge = merge_and_classify(
            vec![vec![
                raw("c", 30, Direction::Inbound),
                raw("b", 20, Direction::Inbound),
                raw("a", 10, Direction::Outbound),
            ]],
            10,
        );

        let conversation = assemble_conversation(
            "555",
            people(&["Ada", "Ada", "Bob"]),
            merge,
            |_| false,
            |_| None,
            &ClientConfig::default(),
        );

        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(conversation.unread_count(), 2);
        assert_eq!(conversation.participants().len(), 2);
        assert_eq!(conversation.title(), "Ada, Bob");
        assert!(!conversation.is_muted());
        assert!(conversation.icon().is_none());
    }

    #[test]
    fn test_assemble_reverses_ties_across_ledgers() {
        let mut mms = raw("mms", 10, Direction::Inbound);
        mms.source = SourceType::Mms;
        let merge = merge_and_classify(
            vec![vec![raw("sms", 10, Direction::Inbound)], vec![mms]],
            10,
        );

        let conversation = assemble_conversation(
            "555",
            people(&["Ada"]),
            merge,
            |_| false,
            |_| None,
            &ClientConfig::default(),
        );

        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["mms", "sms"]);
    }

    #[test]
    fn test_assemble_requests_bounded_avatars() {
        let asked = Cell::new(0);
        let mut config = ClientConfig::default();
        config.avatar.max_group_size = 2;

        let conversation = assemble_conversation(
            "group",
            people(&["A", "B", "C", "D", "E"]),
            MergeResult::default(),
            |id| id == "group",
            |_| {
                asked.set(asked.get() + 1);
                Some(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255])))
            },
            &config,
        );

        assert_eq!(asked.get(), 2);
        assert!(conversation.is_muted());
        assert_eq!(conversation.title(), "A, B, C +2 more");
        assert_eq!(conversation.icon().map(|i| i.dimensions()), Some((128, 128)));
    }
}
