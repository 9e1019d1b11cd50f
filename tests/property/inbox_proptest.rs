//! Property-based tests for inbox ordering

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use wanderhub::shared::messaging::{compare_inbox_entries, sort_inbox};
use wanderhub::shared::{InboxEntry, MessageSummary};

fn entry_strategy() -> impl Strategy<Value = InboxEntry> {
    (0u32..20, proptest::option::of(0i64..1_000_000), 0u64..50).prop_map(|(unread, at, count)| {
        InboxEntry {
            community_id: Uuid::new_v4(),
            name: "community".to_string(),
            last_message: at.map(|secs| MessageSummary {
                id: Uuid::new_v4(),
                preview: "hi".to_string(),
                sender_id: Uuid::new_v4(),
                sender_username: "someone".to_string(),
                is_image: false,
                timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            }),
            unread_count: unread,
            message_count: count,
        }
    })
}

proptest! {
    #[test]
    fn test_sorted_inbox_is_ordered(mut entries in proptest::collection::vec(entry_strategy(), 0..30)) {
        sort_inbox(&mut entries);

        for pair in entries.windows(2) {
            prop_assert_ne!(compare_inbox_entries(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            prop_assert!(pair[0].unread_count >= pair[1].unread_count);
        }
    }

    #[test]
    fn test_sort_is_idempotent(mut entries in proptest::collection::vec(entry_strategy(), 0..30)) {
        sort_inbox(&mut entries);
        let once: Vec<Uuid> = entries.iter().map(|e| e.community_id).collect();
        sort_inbox(&mut entries);
        let twice: Vec<Uuid> = entries.iter().map(|e| e.community_id).collect();
        prop_assert_eq!(once, twice);
    }
}
