//! Region → tracker registry.
//!
//! The registry is the public face of the tracking core. Callers register
//! and unregister listeners against an optional element identifier; the
//! host feeds signals and timer expiries back in.
//!
//! There is no hidden global: whoever owns the registry owns all tracking
//! state, including the pointer-ownership flag shared by its trackers.

use crate::config::TrackerConfig;
use crate::host::{Host, TimerToken};
use crate::model::{ElementId, ListenerId, Region, Signal};
use crate::state::tracker::{Evaluation, RegionTracker};
use crate::state::PointerOwnership;
use std::collections::HashMap;
use tracing::{info, warn};

/// All live trackers, at most one per region.
#[derive(Debug)]
pub struct TrackerRegistry {
    trackers: HashMap<Region, RegionTracker>,
    config: TrackerConfig,
    ownership: PointerOwnership,
}

impl Default for TrackerRegistry {
    fn default() -> Self {
        Self::new(TrackerConfig::default(), PointerOwnership::new())
    }
}

impl TrackerRegistry {
    /// Create a registry whose trackers use `config` and share `ownership`.
    pub fn new(config: TrackerConfig, ownership: PointerOwnership) -> Self {
        Self {
            trackers: HashMap::new(),
            config,
            ownership,
        }
    }

    /// Tracker parameters applied to newly created trackers.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The shared pointer-ownership flag.
    pub fn ownership(&self) -> &PointerOwnership {
        &self.ownership
    }

    /// Number of tracked regions.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Whether `region` has a live tracker.
    pub fn is_tracked(&self, region: Region) -> bool {
        self.trackers.contains_key(&region)
    }

    /// Listeners registered on `region`, in registration order.
    pub fn listeners(&self, region: Region) -> &[ListenerId] {
        self.trackers
            .get(&region)
            .map(RegionTracker::listeners)
            .unwrap_or_default()
    }

    /// The tracker for `region`, if any.
    pub fn tracker(&self, region: Region) -> Option<&RegionTracker> {
        self.trackers.get(&region)
    }

    /// Resolve an optional element id to a region.
    ///
    /// `None` is the viewport. An id the host cannot resolve yields `None`.
    pub fn resolve(host: &mut dyn Host, element: Option<&ElementId>) -> Option<Region> {
        match element {
            None => Some(Region::Viewport),
            Some(id) => match host.resolve_element(id) {
                Some(handle) => Some(Region::Element(handle)),
                None => {
                    warn!(element = %id, "element not found, ignoring request");
                    None
                }
            },
        }
    }

    /// Register `listener` on the region named by `element`.
    ///
    /// Joins the existing tracker for that region or starts a new one.
    /// Registering twice is a no-op.
    pub fn register(
        &mut self,
        host: &mut dyn Host,
        listener: ListenerId,
        element: Option<&ElementId>,
    ) {
        let Some(region) = Self::resolve(host, element) else {
            return;
        };

        if let Some(tracker) = self.trackers.get_mut(&region) {
            tracker.add_listener(listener);
            return;
        }

        let tracker = RegionTracker::new(
            host,
            region,
            listener,
            &self.config,
            self.ownership.clone(),
        );
        self.trackers.insert(region, tracker);
        info!(%region, %listener, "started tracking region");
    }

    /// Unregister `listener` from the region named by `element`.
    ///
    /// Unknown regions and listeners are ignored. The tracker is discarded
    /// once its last listener leaves.
    pub fn unregister(
        &mut self,
        host: &mut dyn Host,
        listener: ListenerId,
        element: Option<&ElementId>,
    ) {
        let Some(region) = Self::resolve(host, element) else {
            return;
        };
        let Some(tracker) = self.trackers.get_mut(&region) else {
            return;
        };

        tracker.remove_listener(host, listener);
        if tracker.is_empty() {
            self.trackers.remove(&region);
            info!(%region, "stopped tracking region");
        }
    }

    /// Register with a raw identifier. Absent or empty means the viewport.
    pub fn set_reference(
        &mut self,
        host: &mut dyn Host,
        listener: ListenerId,
        element_id: Option<&str>,
    ) {
        let element = ElementId::parse_optional(element_id);
        self.register(host, listener, element.as_ref());
    }

    /// Unregister with a raw identifier. Mirrors [`Self::set_reference`].
    pub fn unset_reference(
        &mut self,
        host: &mut dyn Host,
        listener: ListenerId,
        element_id: Option<&str>,
    ) {
        let element = ElementId::parse_optional(element_id);
        self.unregister(host, listener, element.as_ref());
    }

    /// Route a host-delivered signal to the tracker for `region`.
    pub fn handle_signal(&mut self, host: &mut dyn Host, region: Region, signal: Signal) {
        if let Some(tracker) = self.trackers.get_mut(&region) {
            tracker.handle_signal(host, signal);
        }
    }

    /// Route an expired timer to the tracker that scheduled it.
    ///
    /// Returns the evaluation, or `None` for stale or foreign timers.
    pub fn handle_timer(&mut self, host: &mut dyn Host, timer: TimerToken) -> Option<Evaluation> {
        self.trackers
            .values_mut()
            .find_map(|t| t.handle_timer(host, timer))
    }

    /// Stop tracking everything, releasing every subscription.
    pub fn clear(&mut self, host: &mut dyn Host) {
        for (region, mut tracker) in self.trackers.drain() {
            for listener in tracker.listeners().to_vec() {
                tracker.remove_listener(host, listener);
            }
            info!(%region, "stopped tracking region");
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
