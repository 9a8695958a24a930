//! The subscription registry (§4.E): a keyed table of handlers plus a
//! per-channel cache, guarded by a single lock that is never held
//! across a handler call.
//!
//! The snapshot-then-dispatch shape is grounded in
//! `original_source/lcm/lcm.c`'s `lcm_subscribe`/`lcm_get_handlers`/
//! `lcm_dispatch_handlers`: `dispatch` snapshots the handler list,
//! marks it `in_dispatch`, drops the lock, runs the handlers, then
//! reacquires the lock to clear `in_dispatch` and reap anything
//! unsubscribed mid-dispatch. The teacher itself has no subscription
//! table of this shape; its closest keyed table,
//! `summit-services::peer::PeerRegistry`, is a bare
//! `Arc<DashMap<[u8; 32], PeerEntry>>` with no slot reuse or
//! generation counters. `SubscriptionId`'s `{index, generation}` pair
//! is grounded instead on
//! `Dicklesworthstone-glibc_rust::safety::registry::PointerRegistry`'s
//! `generation: u64` field, bumped on free to tell a reused slot apart
//! from the one that occupied it before — the same ABA guard applied
//! here to subscription slots instead of allocations. The lock itself
//! is `parking_lot::Mutex` rather than `std::sync::Mutex`, following
//! `rng-ops-gossip::gossipd::membership`'s `parking_lot::RwLock`
//! around its own `HashMap`-keyed membership table (also the shape
//! `Dicklesworthstone-glibc_rust`'s `PointerRegistry` above uses) —
//! the teacher repo does not depend on `parking_lot` anywhere.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use regex::Regex;

use ripple_core::Error;

/// A raw (undecoded) channel handler: the channel name the frame
/// arrived on, and the frame's body bytes.
pub type RawHandler = dyn Fn(&str, &[u8]) + Send + Sync;

/// A generational handle to a live subscription. Stable across
/// `subscribe`/`unsubscribe` calls on other subscriptions; becomes
/// invalid (and `unsubscribe` returns [`Error::NotFound`]) once its
/// slot is reused by a later `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    index: u32,
    generation: u32,
}

struct Subscription {
    channel_pattern: String,
    regex: Regex,
    handler: Arc<RawHandler>,
    in_dispatch: bool,
    pending_delete: bool,
}

struct Slot {
    subscription: Option<Subscription>,
    generation: u32,
}

#[derive(Default)]
struct Inner {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_channel: HashMap<String, Vec<SubscriptionId>>,
}

/// `{ all: ordered sequence of subscription, by_channel: map
/// channel-name -> ordered sequence of subscription }`, per §3.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` as `^pattern$` (subscribe patterns always
    /// anchor the full channel name — the adopted resolution of
    /// spec.md's open question on optional anchoring) and registers
    /// `handler` for every channel currently cached that matches.
    pub fn subscribe(&self, pattern: &str, handler: Arc<RawHandler>) -> Result<SubscriptionId, Error> {
        let anchored = format!("^{pattern}$");
        let regex = Regex::new(&anchored).map_err(|source| Error::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut inner = self.inner.lock();
        let subscription = Subscription {
            channel_pattern: pattern.to_string(),
            regex,
            handler,
            in_dispatch: false,
            pending_delete: false,
        };

        let id = if let Some(index) = inner.free.pop() {
            let slot = &mut inner.slots[index as usize];
            slot.subscription = Some(subscription);
            SubscriptionId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = inner.slots.len() as u32;
            inner.slots.push(Slot {
                subscription: Some(subscription),
                generation: 0,
            });
            SubscriptionId { index, generation: 0 }
        };

        let matches_channel = inner.slots[id.index as usize]
            .subscription
            .as_ref()
            .map(|s| s.regex.clone());
        if let Some(regex) = matches_channel {
            for (channel, ids) in inner.by_channel.iter_mut() {
                if regex.is_match(channel) {
                    ids.push(id);
                }
            }
        }

        Ok(id)
    }

    /// Removes `id` immediately, unless it is currently mid-dispatch —
    /// in that case removal is deferred until `dispatch` finishes with
    /// it, per spec.md's `pending_delete` rule.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        let in_dispatch = {
            let sub = live_subscription(&mut inner, id).ok_or(Error::NotFound)?;
            sub.in_dispatch
        };
        if in_dispatch {
            live_subscription(&mut inner, id).unwrap().pending_delete = true;
        } else {
            remove_locked(&mut inner, id);
        }
        Ok(())
    }

    /// Handler ids registered for `channel`, populating the
    /// `by_channel` cache on a miss. The cache is never invalidated by
    /// later `subscribe` calls on channels it already covers — new
    /// subscriptions append directly into every cached list they
    /// match (see [`Registry::subscribe`]).
    pub fn get_handlers(&self, channel: &str) -> Vec<SubscriptionId> {
        let mut inner = self.inner.lock();
        get_or_cache(&mut inner, channel)
    }

    /// Dispatches one frame to every subscriber whose pattern matches
    /// `channel`, in subscribe order.
    ///
    /// The handler list is snapshotted once, marked `in_dispatch`, and
    /// the lock is dropped before any handler runs — handlers may
    /// freely call `subscribe`/`unsubscribe`/`publish` on this
    /// registry's owning runtime without deadlocking.
    pub fn dispatch(&self, channel: &str, frame: &[u8]) {
        let mut snapshot = Vec::new();
        {
            let mut inner = self.inner.lock();
            let ids = get_or_cache(&mut inner, channel);
            for id in ids {
                if let Some(sub) = live_subscription(&mut inner, id) {
                    sub.in_dispatch = true;
                    snapshot.push((id, sub.handler.clone()));
                }
            }
        }

        for (_, handler) in &snapshot {
            handler(channel, frame);
        }

        let mut inner = self.inner.lock();
        for (id, _) in snapshot {
            let mut delete = false;
            if let Some(sub) = live_subscription(&mut inner, id) {
                sub.in_dispatch = false;
                delete = sub.pending_delete;
            }
            if delete {
                remove_locked(&mut inner, id);
            }
        }
    }

    /// Number of live subscriptions, for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.inner.lock().slots.iter().filter(|s| s.subscription.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn live_subscription(inner: &mut Inner, id: SubscriptionId) -> Option<&mut Subscription> {
    let slot = inner.slots.get_mut(id.index as usize)?;
    if slot.generation != id.generation {
        return None;
    }
    slot.subscription.as_mut()
}

fn remove_locked(inner: &mut Inner, id: SubscriptionId) {
    if let Some(slot) = inner.slots.get_mut(id.index as usize) {
        if slot.generation == id.generation && slot.subscription.is_some() {
            slot.subscription = None;
            slot.generation = slot.generation.wrapping_add(1);
            inner.free.push(id.index);
            for ids in inner.by_channel.values_mut() {
                ids.retain(|&cached| cached != id);
            }
        }
    }
}

fn get_or_cache(inner: &mut Inner, channel: &str) -> Vec<SubscriptionId> {
    if let Some(ids) = inner.by_channel.get(channel) {
        return ids.clone();
    }
    let mut ids = Vec::new();
    for (index, slot) in inner.slots.iter().enumerate() {
        if let Some(sub) = &slot.subscription {
            if sub.regex.is_match(channel) {
                ids.push(SubscriptionId {
                    index: index as u32,
                    generation: slot.generation,
                });
            }
        }
    }
    inner.by_channel.insert(channel.to_string(), ids.clone());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dispatch_calls_matching_subscribers_in_order() {
        let registry = Registry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = order.clone();
        registry.subscribe("chat\\..*", Arc::new(move |_ch, _f| o1.lock().push(1))).unwrap();
        let o2 = order.clone();
        registry.subscribe("chat\\..*", Arc::new(move |_ch, _f| o2.lock().push(2))).unwrap();

        registry.dispatch("chat.room1", b"hi");
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn unmatched_pattern_is_not_invoked() {
        let registry = Registry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        registry.subscribe("other", Arc::new(move |_ch, _f| { h.fetch_add(1, Ordering::SeqCst); })).unwrap();

        registry.dispatch("chat.room1", b"hi");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pattern_is_anchored_on_both_ends() {
        let registry = Registry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        registry.subscribe("chat", Arc::new(move |_ch, _f| { h.fetch_add(1, Ordering::SeqCst); })).unwrap();

        registry.dispatch("chat.room1", b"hi");
        assert_eq!(hits.load(Ordering::SeqCst), 0, "unanchored substring match must not fire");
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let registry = Registry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let id = registry.subscribe("chat", Arc::new(move |_ch, _f| { h.fetch_add(1, Ordering::SeqCst); })).unwrap();

        registry.unsubscribe(id).unwrap();
        registry.dispatch("chat", b"hi");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_unknown_id_is_not_found() {
        let registry = Registry::new();
        let id = registry.subscribe("chat", Arc::new(|_ch, _f| {})).unwrap();
        registry.unsubscribe(id).unwrap();
        assert!(matches!(registry.unsubscribe(id), Err(Error::NotFound)));
    }

    #[test]
    fn self_unsubscribe_during_dispatch_is_deferred_and_reaped() {
        let registry = Arc::new(Registry::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let registry_for_handler = registry.clone();
        let hits_for_handler = hits.clone();
        let id_cell: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let id_cell_for_handler = id_cell.clone();

        let id = registry
            .subscribe(
                "chat",
                Arc::new(move |_ch, _f| {
                    hits_for_handler.fetch_add(1, Ordering::SeqCst);
                    let id = *id_cell_for_handler.lock();
                    if let Some(id) = id {
                        registry_for_handler.unsubscribe(id).unwrap();
                    }
                }),
            )
            .unwrap();
        *id_cell.lock() = Some(id);

        registry.dispatch("chat", b"first");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        registry.dispatch("chat", b"second");
        assert_eq!(hits.load(Ordering::SeqCst), 1, "handler must not fire again after self-unsubscribe");
    }

    #[test]
    fn late_subscriber_is_appended_to_cached_channel_list() {
        let registry = Registry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.dispatch("chat", b"warm the cache");

        let h = hits.clone();
        registry.subscribe("chat", Arc::new(move |_ch, _f| { h.fetch_add(1, Ordering::SeqCst); })).unwrap();

        registry.dispatch("chat", b"now");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
