//! The transport abstraction (§4.F): a pluggable `Provider` trait plus
//! the reference UDP multicast implementation in [`udpm`].
//!
//! Grounded in `summit-services::service::ChunkService`'s trait shape
//! (minimal, `Send + Sync`, one method per lifecycle event) and
//! `summitd`'s `capability/{broadcast,listener}.rs` tokio UDP socket
//! use.

pub mod udpm;

use ripple_core::{Error, ParsedUrl};

use crate::registry::Registry;

/// A transport a [`crate::Runtime`] can publish through and listen on.
///
/// `Drop` stands in for `original_source/lcm/lcm.c`'s explicit
/// `destroy` call — the idiomatic Rust translation of "must be
/// callable exactly once, on every exit path" is to tie the release
/// to scope exit instead of asking every caller to remember it.
pub trait Provider: Send + Sync {
    /// Builds a provider from the parsed target/args of a provider
    /// URL (the scheme itself has already been used to select this
    /// provider).
    fn create(url: &ParsedUrl) -> Result<Self, Error>
    where
        Self: Sized;

    /// Sends one frame on `channel`. `bytes` is the already-encoded
    /// frame (hash prefix included).
    fn publish(&self, channel: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Blocks for exactly one inbound frame and dispatches it through
    /// `registry`. Returns once dispatch (and therefore every matching
    /// handler) has returned.
    fn handle(&self, registry: &Registry) -> Result<(), Error>;

    /// The provider's underlying file descriptor, for callers that
    /// want to multiplex it into their own event loop instead of
    /// calling `handle` directly.
    fn fileno(&self) -> std::os::unix::io::RawFd;
}
