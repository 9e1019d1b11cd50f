//! Property-based tests for the event codec

use proptest::prelude::*;
use uuid::Uuid;

use wanderhub::shared::event::{RoomRef, SendMessagePayload};
use wanderhub::shared::{ClientEvent, ClientFrame, ServerEvent};

proptest! {
    #[test]
    fn test_decode_never_panics(text in ".*") {
        let _ = ClientFrame::decode(&text);
        let _ = ServerEvent::decode(&text);
    }

    #[test]
    fn test_send_frame_survives_encoding(
        content in ".{0,200}",
        client_id in proptest::option::of("[a-z0-9-]{1,36}"),
        ack in proptest::option::of(any::<u64>()),
    ) {
        let payload = SendMessagePayload {
            community_id: Some(Uuid::new_v4().to_string()),
            content,
            client_id,
            ..Default::default()
        };
        let mut frame = ClientFrame::new(ClientEvent::SendMessage(payload));
        if let Some(ack) = ack {
            frame = frame.with_ack(ack);
        }

        let decoded = ClientFrame::decode(&frame.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn test_ack_survives_malformed_body(ack in any::<u64>(), junk in "[1-9][0-9]{0,5}") {
        let text = format!(r#"{{"event":"send_message","data":{junk},"ack":{ack}}}"#);
        let err = ClientFrame::decode(&text).unwrap_err();
        prop_assert_eq!(err.ack, Some(ack));
    }

    #[test]
    fn test_blank_room_ids_resolve_to_none(blank in "[ \t]{0,5}") {
        let room = RoomRef::Id(blank);
        prop_assert_eq!(room.resolve().unwrap(), None);
    }

    #[test]
    fn test_non_uuid_room_ids_are_rejected(raw in "[g-z]{1,20}") {
        let room = RoomRef::Id(raw);
        prop_assert!(room.resolve().is_err());
    }
}
