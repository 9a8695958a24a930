//! Generated per-type glue (§4.H): the generic engine behind every
//! emitted `S_publish`/`S_subscribe` pair.
//!
//! Grounded in `original_source/lcm/lcm-cpp.hpp`'s typed subscribe
//! template and `summit-services::messaging_service`'s
//! decode-then-log-and-drop pattern for malformed payloads.

use std::sync::Arc;

use ripple_core::wire::Codec;
use ripple_core::Error;

use crate::registry::SubscriptionId;
use crate::runtime::Runtime;

/// Sizes, encodes, and publishes `msg`. Every generated `S_publish`
/// function is a one-line call to this.
pub fn publish_typed<T: Codec>(rt: &Runtime, channel: &str, msg: &T) -> Result<(), Error> {
    let mut buf = vec![0u8; msg.encoded_size()];
    let written = msg.encode(&mut buf)?;
    rt.publish(channel, &buf[..written])
}

/// Registers a raw handler that decodes each frame as `T` before
/// calling the user's typed closure. A frame that fails to decode
/// (wrong type on the channel, corrupt data, hash mismatch) is logged
/// and dropped — it never reaches the user's handler and is never
/// surfaced as an error, since one malformed publisher shouldn't be
/// able to kill every other subscriber on the channel.
pub fn subscribe_typed<T, F>(rt: &Runtime, pattern: &str, handler: F) -> Result<SubscriptionId, Error>
where
    T: Codec + Send + Sync + 'static,
    F: Fn(&T, &str) + Send + Sync + 'static,
{
    rt.subscribe(
        pattern,
        Arc::new(move |channel: &str, frame: &[u8]| match T::decode(frame) {
            Ok(value) => handler(&value, channel),
            Err(error) => tracing::warn!(channel, %error, "dropping frame: decode failed"),
        }),
    )
}
