//! Exercises the registry against real generated wire frames instead of
//! raw bytes, the way a `{type}_subscribe` trampoline would.

use std::sync::{Arc, Mutex};

use ripple_chat_types::{Author, ChatMessage, Presence};
use ripple_core::wire::Codec;
use ripple_runtime::Registry;

fn encode(msg: &ChatMessage) -> Vec<u8> {
    let mut buf = vec![0u8; msg.encoded_size()];
    let written = msg.encode(&mut buf).unwrap();
    buf.truncate(written);
    buf
}

#[test]
fn typed_handler_decodes_a_real_generated_frame() {
    let registry = Registry::new();
    let received: Arc<Mutex<Vec<ChatMessage>>> = Arc::new(Mutex::new(Vec::new()));
    let received_for_handler = received.clone();

    registry
        .subscribe(
            "chat\\..*",
            Arc::new(move |_channel, frame: &[u8]| {
                if let Ok(msg) = ChatMessage::decode(frame) {
                    received_for_handler.lock().unwrap().push(msg);
                }
            }),
        )
        .unwrap();

    let msg = ChatMessage {
        sent_at_unix_ms: 42,
        author: Author {
            display_name: "room-a".to_string(),
            presence: Presence::ONLINE,
        },
        body_len: 2,
        body: b"hi".to_vec(),
    };
    registry.dispatch("chat.room1", &encode(&msg));

    assert_eq!(*received.lock().unwrap(), vec![msg]);
}

#[test]
fn a_frame_with_the_wrong_type_hash_is_dropped_not_delivered() {
    let registry = Registry::new();
    let hits = Arc::new(Mutex::new(0usize));
    let hits_for_handler = hits.clone();

    registry
        .subscribe(
            "chat\\..*",
            Arc::new(move |_channel, frame: &[u8]| {
                if ChatMessage::decode(frame).is_ok() {
                    *hits_for_handler.lock().unwrap() += 1;
                }
            }),
        )
        .unwrap();

    // A frame encoded with a foreign 8-byte hash prefix never decodes as
    // ChatMessage, so the handler body's `is_ok()` branch never fires —
    // this is the behavior `ripple_runtime::trampoline::subscribe_typed`
    // builds on, just inlined here instead of logging-and-dropping.
    let mut bogus = vec![0u8; 16];
    bogus[7] = 0xff;
    registry.dispatch("chat.room1", &bogus);

    assert_eq!(*hits.lock().unwrap(), 0);
}
