//! In-memory host with a virtual clock.
//!
//! [`SimulatedHost`] stands in for a real UI environment in tests and in
//! the trace replay binary. Time only moves when [`SimulatedHost::advance`]
//! is called, which makes debounce behaviour fully deterministic.

use crate::host::{Host, SubscriptionToken, TimerToken};
use crate::model::{ElementHandle, ElementId, Geometry, ListenerId, Region, Signal};
use crate::state::{Evaluation, TrackerRegistry};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use tracing::{trace, warn};

/// A delivered "reached bottom" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Virtual time of delivery, in milliseconds.
    pub at_ms: u64,
    /// Recipient.
    pub listener: ListenerId,
}

/// Deterministic [`Host`] implementation.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    now_ms: u64,
    next_id: u64,
    elements: HashMap<ElementId, ElementHandle>,
    geometry: HashMap<Region, Geometry>,
    subscriptions: HashMap<u64, (Region, Signal)>,
    /// timer id → deadline
    timers: BTreeMap<u64, u64>,
    notifications: Vec<Notification>,
    unreachable: HashSet<ListenerId>,
    failed_deliveries: Vec<Notification>,
}

impl SimulatedHost {
    /// Empty host at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Create an element reachable under `id`, returning its region.
    ///
    /// Adding an id that already exists returns the existing element.
    pub fn add_element(&mut self, id: &ElementId) -> Region {
        if let Some(handle) = self.elements.get(id) {
            return Region::Element(*handle);
        }
        let handle = ElementHandle::new(self.next_id());
        self.elements.insert(id.clone(), handle);
        Region::Element(handle)
    }

    /// Region for an existing element id, if any.
    pub fn element(&self, id: &ElementId) -> Option<Region> {
        self.elements.get(id).copied().map(Region::Element)
    }

    /// Set the geometry reported for `region`. Unset regions report zeros.
    pub fn set_geometry(&mut self, region: Region, geometry: Geometry) {
        self.geometry.insert(region, geometry);
    }

    /// Make deliveries to `listener` fail.
    pub fn make_unreachable(&mut self, listener: ListenerId) {
        self.unreachable.insert(listener);
    }

    /// Whether the host would currently deliver `signal` for `region`.
    pub fn is_subscribed(&self, region: Region, signal: Signal) -> bool {
        self.subscriptions
            .values()
            .any(|&(r, s)| r == region && s == signal)
    }

    /// Number of live subscriptions across all regions.
    pub fn live_subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of timers scheduled and not yet fired or cancelled.
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Notifications delivered so far.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Notifications that could not be delivered.
    pub fn failed_deliveries(&self) -> &[Notification] {
        &self.failed_deliveries
    }

    /// Deliver `signal` for `region` the way a real host would: only if
    /// something is subscribed to it.
    ///
    /// Returns whether the signal was delivered.
    pub fn emit(&mut self, registry: &mut TrackerRegistry, region: Region, signal: Signal) -> bool {
        if !self.is_subscribed(region, signal) {
            trace!(%region, %signal, "no subscriber, signal dropped");
            return false;
        }
        registry.handle_signal(self, region, signal);
        true
    }

    /// Move the clock forward by `ms`, firing due timers in deadline order.
    ///
    /// Timers scheduled while firing are honoured if they fall inside the
    /// window. Returns the evaluations that ran.
    pub fn advance(&mut self, registry: &mut TrackerRegistry, ms: u64) -> Vec<Evaluation> {
        let mut evaluations = Vec::new();
        self.advance_with(ms, |host, timer| {
            if let Some(evaluation) = registry.handle_timer(host, timer) {
                evaluations.push(evaluation);
            }
        });
        evaluations
    }

    /// Move the clock forward by `ms`, handing each due timer to `on_expiry`.
    pub fn advance_with(&mut self, ms: u64, mut on_expiry: impl FnMut(&mut Self, TimerToken)) {
        let target = self.now_ms.saturating_add(ms);

        while let Some((id, deadline)) = self.next_due(target) {
            self.timers.remove(&id);
            self.now_ms = deadline;
            on_expiry(self, TimerToken::new(id));
        }

        self.now_ms = target;
    }

    fn next_due(&self, target: u64) -> Option<(u64, u64)> {
        self.timers
            .iter()
            .filter(|&(_, &deadline)| deadline <= target)
            .min_by_key(|&(&id, &deadline)| (deadline, id))
            .map(|(&id, &deadline)| (id, deadline))
    }
}

impl Host for SimulatedHost {
    fn resolve_element(&mut self, id: &ElementId) -> Option<ElementHandle> {
        self.elements.get(id).copied()
    }

    fn subscribe(&mut self, region: Region, signal: Signal) -> SubscriptionToken {
        let id = self.next_id();
        self.subscriptions.insert(id, (region, signal));
        SubscriptionToken::new(id, signal)
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) {
        self.subscriptions.remove(&token.id());
    }

    fn geometry(&self, region: Region) -> Geometry {
        self.geometry.get(&region).copied().unwrap_or_default()
    }

    fn notify_reached_bottom(&mut self, listener: ListenerId) {
        let notification = Notification {
            at_ms: self.now_ms,
            listener,
        };
        if self.unreachable.contains(&listener) {
            warn!(%listener, "notification delivery failed");
            self.failed_deliveries.push(notification);
            return;
        }
        self.notifications.push(notification);
    }

    fn schedule_timer(&mut self, delay: Duration) -> TimerToken {
        let id = self.next_id();
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.timers.insert(id, self.now_ms.saturating_add(delay_ms));
        TimerToken::new(id)
    }

    fn cancel_timer(&mut self, timer: TimerToken) {
        self.timers.remove(&timer.get());
    }
}
