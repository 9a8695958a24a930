//! The runtime facade (§4.G): selects a [`Provider`] by URL scheme,
//! owns the [`Registry`], and exposes the
//! publish/subscribe/unsubscribe/handle/timed_handle/fileno surface
//! every generated type's glue (§4.H) is built on.
//!
//! Grounded in `lcm_create`'s walk over a static `providers` table for
//! the `PROVIDERS` lookup below. The blocking-transport-under-async
//! bridge (`spawn_blocking` wrapped in a `timeout`, in
//! [`Runtime::timed_handle`]) isn't copied from a specific teacher
//! file — `summitd/src/main.rs` composes its long-running tasks with
//! `tokio::select!`, but none of them wraps a blocking call this way —
//! it's this crate's own application of the standard idiom for giving
//! a blocking `recv_from` (§4.F) a timeout from async code.

use std::sync::Arc;
use std::time::Duration;

use ripple_core::{Error, ParsedUrl};

use crate::provider::{udpm, Provider};
use crate::registry::{RawHandler, Registry, SubscriptionId};

type ProviderFactory = fn(&ParsedUrl) -> Result<Box<dyn Provider>, Error>;

const PROVIDERS: &[(&str, ProviderFactory)] = &[("udpm", |url| {
    udpm::UdpMulticastProvider::create(url).map(|p| Box::new(p) as Box<dyn Provider>)
})];

/// The pub/sub bus: one provider, one registry, reachable by URL.
///
/// `Runtime::new("")` resolves the `RIPPLE_DEFAULT_URL` environment
/// variable (falling back to `udpm://239.255.76.67:7667`), matching
/// `lcm_create(NULL)`'s behavior.
pub struct Runtime {
    provider: Box<dyn Provider>,
    registry: Registry,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(url: &str) -> Result<Self, Error> {
        let parsed: ParsedUrl = url.parse()?;
        let factory = PROVIDERS
            .iter()
            .find(|(scheme, _)| *scheme == parsed.provider)
            .map(|(_, factory)| *factory)
            .ok_or_else(|| Error::NoProvider(parsed.provider.clone()))?;
        let provider = factory(&parsed)?;
        Ok(Self {
            provider,
            registry: Registry::new(),
        })
    }

    /// Publishes an already-encoded frame. Generated `S_publish`
    /// wrappers call this through [`crate::trampoline::publish_typed`]
    /// after encoding their typed argument.
    pub fn publish(&self, channel: &str, frame: &[u8]) -> Result<(), Error> {
        self.provider.publish(channel, frame)
    }

    pub fn subscribe(&self, pattern: &str, handler: Arc<RawHandler>) -> Result<SubscriptionId, Error> {
        self.registry.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), Error> {
        self.registry.unsubscribe(id)
    }

    /// Blocks until the provider delivers one frame, dispatching it
    /// through the registry before returning.
    pub fn handle(&self) -> Result<(), Error> {
        self.provider.handle(&self.registry)
    }

    /// Runs [`Runtime::handle`] on a blocking task under a timeout.
    /// Returns `Ok(true)` if a frame was handled, `Ok(false)` on
    /// timeout.
    ///
    /// Requires `Arc<Self>` because the blocking task must own a
    /// `'static` handle to the runtime. If the timeout elapses first,
    /// the spawned task is left running — it will still complete
    /// (and its frame still dispatch) whenever the provider's next
    /// datagram arrives; this call simply stops waiting for it.
    pub async fn timed_handle(self: &Arc<Self>, timeout: Duration) -> Result<bool, Error> {
        let rt = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || rt.handle());
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(Ok(()))) => Ok(true),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(_join_error)) => Err(Error::Transport("handle task panicked".to_string())),
            Err(_elapsed) => Ok(false),
        }
    }

    pub fn fileno(&self) -> std::os::unix::io::RawFd {
        self.provider.fileno()
    }
}
