//! Property-based tests for the client chat store

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use wanderhub::client::{ApplyKind, ChatStore};
use wanderhub::shared::event::RoomTarget;
use wanderhub::shared::messaging::SenderProfile;
use wanderhub::shared::Message;

fn profile(name: &str) -> SenderProfile {
    SenderProfile {
        id: Uuid::new_v4(),
        username: name.to_string(),
        avatar: None,
    }
}

fn message(sender: &SenderProfile, community: Uuid, seq: u64) -> Message {
    Message {
        id: Uuid::new_v4(),
        content: format!("message {seq}"),
        image: None,
        is_image: false,
        sender: sender.clone(),
        community_id: community,
        channel_id: None,
        client_id: None,
        seq,
        timestamp: Utc::now(),
    }
}

fn confirmed_seqs(store: &ChatStore, community: Uuid) -> Vec<u64> {
    store.messages(community).iter().filter_map(|e| e.seq).collect()
}

proptest! {
    #[test]
    fn test_redelivery_never_duplicates(
        seqs in proptest::collection::btree_set(1u64..500, 1..40),
        repeats in 1usize..4,
    ) {
        let me = profile("me");
        let other = profile("other");
        let community = Uuid::new_v4();
        let mut store = ChatStore::new(me);
        let messages: Vec<Message> = seqs.iter().map(|&s| message(&other, community, s)).collect();

        for _ in 0..repeats {
            for m in &messages {
                store.apply_new_message(m.clone());
            }
        }

        prop_assert_eq!(store.messages(community).len(), messages.len());
        let kind = store.apply_new_message(messages[0].clone()).kind;
        prop_assert_eq!(kind, ApplyKind::Duplicate);
    }

    #[test]
    fn test_timeline_stays_in_seq_order(
        seqs in proptest::collection::vec(1u64..500, 1..40),
        split in 0usize..40,
    ) {
        let other = profile("other");
        let community = Uuid::new_v4();
        let mut store = ChatStore::new(profile("me"));
        let messages: Vec<Message> = seqs.iter().map(|&s| message(&other, community, s)).collect();
        let split = split.min(messages.len());

        // Live events and backfill may interleave in any order
        for m in &messages[split..] {
            store.apply_new_message(m.clone());
        }
        store.apply_backfill(community, messages[..split].to_vec());

        let ordered = confirmed_seqs(&store, community);
        prop_assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(store.backfill_cursor(community), seqs.iter().copied().max());
    }

    #[test]
    fn test_pending_sends_stay_after_confirmed(
        confirmed in proptest::collection::btree_set(1u64..100, 0..10),
        pending in 1usize..5,
    ) {
        let other = profile("other");
        let community = Uuid::new_v4();
        let mut store = ChatStore::new(profile("me"));

        for _ in 0..pending {
            store.begin_send(RoomTarget::community(community), "draft", None);
        }
        for &seq in &confirmed {
            store.apply_new_message(message(&other, community, seq));
        }

        let timeline = store.messages(community);
        let first_pending = timeline.iter().position(|e| e.is_pending()).unwrap_or(timeline.len());
        prop_assert!(timeline[first_pending..].iter().all(|e| e.is_pending()));
        prop_assert_eq!(timeline.len(), confirmed.len() + pending);
    }
}
