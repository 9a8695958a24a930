use ripple_chat_types::{Author, ChatMessage, Presence, TypingIndicator};
use ripple_core::wire::Codec;

fn worked_example() -> ChatMessage {
    ChatMessage {
        sent_at_unix_ms: 1_735_689_600_000,
        author: Author {
            display_name: "ripple-bot".to_string(),
            presence: Presence::AWAY,
        },
        body_len: 11,
        body: b"hello world".to_vec(),
    }
}

#[test]
fn worked_example_round_trips_and_reports_exact_size() {
    let msg = worked_example();
    let expected_size = ripple_core::wire::HASH_PREFIX_LEN // frame hash
        + 8                                                // sent_at_unix_ms
        + (4 + "ripple-bot".len() + 1)                      // author.display_name
        + 4                                                 // author.presence
        + 4                                                 // body_len
        + 11; // body
    assert_eq!(msg.encoded_size(), expected_size);

    let mut buf = vec![0u8; msg.encoded_size()];
    let written = msg.encode(&mut buf).unwrap();
    assert_eq!(written, expected_size);

    let decoded = ChatMessage::decode(&buf[..written]).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn undersized_buffer_reports_encode_overflow_not_a_panic() {
    let msg = worked_example();
    let mut too_small = vec![0u8; msg.encoded_size() - 1];
    let err = msg.encode(&mut too_small).unwrap_err();
    assert!(matches!(err, ripple_core::Error::EncodeOverflow { .. }));
}

#[test]
fn truncated_frame_reports_decode_truncated_not_a_panic() {
    let msg = worked_example();
    let mut buf = vec![0u8; msg.encoded_size()];
    msg.encode(&mut buf).unwrap();
    let err = ChatMessage::decode(&buf[..buf.len() - 3]).unwrap_err();
    assert!(matches!(err, ripple_core::Error::DecodeTruncated { .. }));
}

#[test]
fn typing_indicator_boolean_and_string_round_trip() {
    let indicator = TypingIndicator {
        user: "ripple-bot".to_string(),
        is_typing: false,
    };
    let mut buf = vec![0u8; indicator.encoded_size()];
    indicator.encode(&mut buf).unwrap();
    let decoded = TypingIndicator::decode(&buf).unwrap();
    assert_eq!(decoded, indicator);
}
