//! Capabilities consumed from the hosting UI environment.
//!
//! The tracking core never touches a real event loop. Everything it needs
//! from the outside world (element lookup, signal subscriptions, geometry,
//! notification delivery, one-shot timers) goes through [`Host`].
//!
//! The host calls back into [`TrackerRegistry`](crate::state::TrackerRegistry)
//! when a subscribed signal fires or a scheduled timer expires.

use crate::model::{ElementHandle, ElementId, Geometry, ListenerId, Region, Signal};
use std::time::Duration;

/// Receipt for one live signal subscription.
///
/// Returned by [`Host::subscribe`] and handed back to
/// [`Host::unsubscribe`] exactly once. Not `Clone`: a token can only be
/// released by whoever holds it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    id: u64,
    signal: Signal,
}

impl SubscriptionToken {
    /// Mint a token. Only hosts should call this.
    pub fn new(id: u64, signal: Signal) -> Self {
        Self { id, signal }
    }

    /// Host-assigned subscription id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Signal the subscription listens for.
    pub fn signal(&self) -> Signal {
        self.signal
    }
}

/// Identity of a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Wrap a host-assigned timer id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw timer id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The hosting environment as seen by the tracking core.
///
/// All methods are infallible from the core's point of view. A host that
/// can fail internally (a dead notification channel, a detached element)
/// handles that itself.
pub trait Host {
    /// Resolve an element identifier to a live element.
    ///
    /// `None` means the element does not exist; the registry then treats
    /// the request as a no-op.
    fn resolve_element(&mut self, id: &ElementId) -> Option<ElementHandle>;

    /// Start delivering `signal` for `region`.
    fn subscribe(&mut self, region: Region, signal: Signal) -> SubscriptionToken;

    /// Stop delivering the signal described by `token`.
    fn unsubscribe(&mut self, token: SubscriptionToken);

    /// Current geometry of `region`.
    fn geometry(&self, region: Region) -> Geometry;

    /// Deliver a "reached bottom" notification to `listener`.
    ///
    /// Fire-and-forget: the host must return without waiting for delivery,
    /// and a failure for one listener must not affect the others.
    fn notify_reached_bottom(&mut self, listener: ListenerId);

    /// Schedule a one-shot timer that expires after `delay`.
    fn schedule_timer(&mut self, delay: Duration) -> TimerToken;

    /// Cancel a timer. Cancelling an expired or unknown timer is a no-op.
    fn cancel_timer(&mut self, timer: TimerToken);
}
