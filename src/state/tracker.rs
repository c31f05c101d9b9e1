//! Per-region tracking state machine.
//!
//! A [`RegionTracker`] owns one region, the listeners interested in it, the
//! subscriptions that make the host deliver signals for it, and a single
//! debounce timer.
//!
//! # Modes
//!
//! The mode is fixed at construction:
//! - **Viewport**: wheel, touch-move and scroll are subscribed for the
//!   tracker's whole life. Everything is ignored while an inner region owns
//!   the pointer.
//! - **Element**: only engagement signals (mouse enter/leave, touch
//!   start/end) are subscribed up front. Scroll-related subscriptions exist
//!   only while the user is engaged with the element.
//!
//! # Debounce
//!
//! Every real or synthesized scroll cancels the pending timer and schedules
//! a new one. Only the timer that survives the debounce window is evaluated.

use crate::config::TrackerConfig;
use crate::host::{Host, TimerToken};
use crate::model::{Geometry, ListenerId, Region, Signal};
use crate::state::{PointerOwnership, SubscriptionSet};
use std::time::Duration;
use tracing::{debug, trace};

/// Signals a viewport tracker listens for during its whole life.
const VIEWPORT_SIGNALS: [Signal; 3] = [Signal::TouchMove, Signal::Wheel, Signal::Scroll];

/// Signals an element tracker listens for to detect engagement.
const ENGAGEMENT_SIGNALS: [Signal; 4] = [
    Signal::TouchStart,
    Signal::TouchEnd,
    Signal::MouseEnter,
    Signal::MouseLeave,
];

/// How the user is engaged with an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    /// Mouse pointer hovering the element.
    Pointer,
    /// Finger touching the element.
    Touch,
}

impl Engagement {
    /// Signals subscribed for the duration of this engagement.
    fn signals(self) -> &'static [Signal] {
        match self {
            Engagement::Pointer => &[Signal::Wheel, Signal::Scroll],
            Engagement::Touch => &[Signal::TouchMove, Signal::Scroll],
        }
    }
}

/// Mode-specific subscription state.
#[derive(Debug)]
enum TrackingMode {
    Viewport {
        base: SubscriptionSet,
    },
    Element {
        base: SubscriptionSet,
        pointer: Option<SubscriptionSet>,
        touch: Option<SubscriptionSet>,
    },
    /// Terminal: the last listener left and everything was released.
    Detached,
}

/// What a delivered signal means for this tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    Ignore,
    Scroll,
    Synthesize,
    Engage(Engagement),
    Disengage(Engagement),
}

/// Result of a debounce timer expiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Region that was evaluated.
    pub region: Region,
    /// Geometry read when the timer fired.
    pub geometry: Geometry,
    /// Whether the region was within the bottom margin.
    pub reached_bottom: bool,
    /// Listeners notified (empty when `reached_bottom` is false).
    pub notified: Vec<ListenerId>,
}

/// Tracks one region on behalf of its listeners.
#[derive(Debug)]
pub struct RegionTracker {
    region: Region,
    listeners: Vec<ListenerId>,
    mode: TrackingMode,
    pending: Option<TimerToken>,
    debounce: Duration,
    bottom_margin: u32,
    ownership: PointerOwnership,
}

impl RegionTracker {
    /// Start tracking `region` with `listener` as the first member.
    ///
    /// Subscriptions for the region's mode are attached immediately.
    pub fn new(
        host: &mut dyn Host,
        region: Region,
        listener: ListenerId,
        config: &TrackerConfig,
        ownership: PointerOwnership,
    ) -> Self {
        let mode = match region {
            Region::Viewport => TrackingMode::Viewport {
                base: SubscriptionSet::attach(host, region, &VIEWPORT_SIGNALS),
            },
            Region::Element(_) => TrackingMode::Element {
                base: SubscriptionSet::attach(host, region, &ENGAGEMENT_SIGNALS),
                pointer: None,
                touch: None,
            },
        };

        Self {
            region,
            listeners: vec![listener],
            mode,
            pending: None,
            debounce: config.debounce,
            bottom_margin: config.bottom_margin,
            ownership,
        }
    }

    /// The tracked region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Current listeners, in registration order.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Whether the last listener has left. Such a tracker is inert.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Whether a debounce timer is waiting to fire.
    pub fn has_pending_check(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the user is currently engaged with this element in `kind` mode.
    ///
    /// Always false for the viewport.
    pub fn is_engaged(&self, kind: Engagement) -> bool {
        match &self.mode {
            TrackingMode::Element { pointer, touch, .. } => match kind {
                Engagement::Pointer => pointer.is_some(),
                Engagement::Touch => touch.is_some(),
            },
            _ => false,
        }
    }

    /// Add a listener. Adding one that is already present does nothing.
    pub fn add_listener(&mut self, listener: ListenerId) {
        if self.listeners.contains(&listener) {
            trace!(region = %self.region, %listener, "listener already registered");
            return;
        }
        self.listeners.push(listener);
    }

    /// Remove a listener.
    ///
    /// When the last one leaves, every subscription is released and the
    /// pending check is cancelled. The tracker is then terminal.
    pub fn remove_listener(&mut self, host: &mut dyn Host, listener: ListenerId) {
        self.listeners.retain(|l| *l != listener);
        if self.listeners.is_empty() {
            self.detach(host);
        }
    }

    /// React to a signal the host delivered for this tracker's region.
    ///
    /// Signals without a live subscription are ignored.
    pub fn handle_signal(&mut self, host: &mut dyn Host, signal: Signal) {
        match self.route(signal) {
            Reaction::Ignore => {
                trace!(region = %self.region, %signal, "signal ignored");
            }
            Reaction::Scroll => self.on_native_scroll(host),
            Reaction::Synthesize => self.synthesize_scroll(host),
            Reaction::Engage(kind) => self.engage(host, kind),
            Reaction::Disengage(kind) => self.disengage(host, kind),
        }
    }

    /// Evaluate the bottom threshold if `timer` is this tracker's pending check.
    ///
    /// Returns `None` for timers this tracker does not own (including
    /// cancelled ones).
    pub fn handle_timer(&mut self, host: &mut dyn Host, timer: TimerToken) -> Option<Evaluation> {
        if self.pending != Some(timer) {
            return None;
        }
        self.pending = None;
        Some(self.evaluate(host))
    }

    /// Restart the debounce window.
    ///
    /// Shared by native scrolls and synthesized ones. A detached tracker
    /// never schedules anything.
    pub fn on_scroll_signal(&mut self, host: &mut dyn Host) {
        if matches!(self.mode, TrackingMode::Detached) {
            trace!(region = %self.region, "detached, scroll ignored");
            return;
        }
        if let Some(previous) = self.pending.take() {
            host.cancel_timer(previous);
        }
        self.pending = Some(host.schedule_timer(self.debounce));
        trace!(region = %self.region, delay_ms = self.debounce.as_millis() as u64, "check scheduled");
    }

    fn route(&self, signal: Signal) -> Reaction {
        match &self.mode {
            TrackingMode::Detached => Reaction::Ignore,
            TrackingMode::Viewport { base } => {
                if !base.covers(signal) {
                    return Reaction::Ignore;
                }
                match signal {
                    Signal::Scroll => Reaction::Scroll,
                    Signal::Wheel | Signal::TouchMove => Reaction::Synthesize,
                    _ => Reaction::Ignore,
                }
            }
            TrackingMode::Element { pointer, touch, .. } => {
                let engaged_covers = |s: Signal| {
                    pointer.as_ref().is_some_and(|p| p.covers(s))
                        || touch.as_ref().is_some_and(|t| t.covers(s))
                };
                match signal {
                    Signal::MouseEnter => Reaction::Engage(Engagement::Pointer),
                    Signal::MouseLeave => Reaction::Disengage(Engagement::Pointer),
                    Signal::TouchStart => Reaction::Engage(Engagement::Touch),
                    Signal::TouchEnd => Reaction::Disengage(Engagement::Touch),
                    Signal::Scroll if engaged_covers(signal) => Reaction::Scroll,
                    Signal::Wheel | Signal::TouchMove if engaged_covers(signal) => {
                        Reaction::Synthesize
                    }
                    _ => Reaction::Ignore,
                }
            }
        }
    }

    fn on_native_scroll(&mut self, host: &mut dyn Host) {
        if self.region.is_viewport() && self.ownership.is_owned() {
            debug!("viewport scroll suppressed: inner region owns the pointer");
            return;
        }
        self.on_scroll_signal(host);
    }

    /// Turn wheel/touch activity into a scroll when no scrollbar exists.
    fn synthesize_scroll(&mut self, host: &mut dyn Host) {
        if self.region.is_viewport() {
            if self.ownership.is_owned() {
                return;
            }
        } else {
            self.ownership.claim();
        }

        if host.geometry(self.region).fills_exactly() {
            debug!(region = %self.region, "no scrollbar, synthesizing scroll");
            self.on_scroll_signal(host);
        }
    }

    fn engage(&mut self, host: &mut dyn Host, kind: Engagement) {
        let region = self.region;
        let TrackingMode::Element { pointer, touch, .. } = &mut self.mode else {
            return;
        };
        let slot = match kind {
            Engagement::Pointer => pointer,
            Engagement::Touch => touch,
        };

        self.ownership.claim();
        if slot.is_none() {
            *slot = Some(SubscriptionSet::attach(host, region, kind.signals()));
            debug!(%region, ?kind, "engagement started");
        }
    }

    fn disengage(&mut self, host: &mut dyn Host, kind: Engagement) {
        let region = self.region;
        let TrackingMode::Element { pointer, touch, .. } = &mut self.mode else {
            return;
        };
        let slot = match kind {
            Engagement::Pointer => pointer,
            Engagement::Touch => touch,
        };

        if let Some(set) = slot.take() {
            set.release(host);
            debug!(%region, ?kind, "engagement ended");
        }
        self.ownership.release();
    }

    fn evaluate(&mut self, host: &mut dyn Host) -> Evaluation {
        let geometry = host.geometry(self.region);
        let reached_bottom = geometry.is_near_bottom(self.bottom_margin);

        let notified = if reached_bottom {
            for &listener in &self.listeners {
                host.notify_reached_bottom(listener);
            }
            self.listeners.clone()
        } else {
            Vec::new()
        };

        debug!(
            region = %self.region,
            content = geometry.content_height,
            visible = geometry.visible_height,
            offset = geometry.scroll_offset,
            reached_bottom,
            notified = notified.len(),
            "bottom check evaluated"
        );

        Evaluation {
            region: self.region,
            geometry,
            reached_bottom,
            notified,
        }
    }

    fn detach(&mut self, host: &mut dyn Host) {
        if let Some(timer) = self.pending.take() {
            host.cancel_timer(timer);
        }

        match std::mem::replace(&mut self.mode, TrackingMode::Detached) {
            TrackingMode::Viewport { base } => base.release(host),
            TrackingMode::Element {
                base,
                pointer,
                touch,
            } => {
                base.release(host);
                let was_engaged = pointer.is_some() || touch.is_some();
                for set in [pointer, touch].into_iter().flatten() {
                    set.release(host);
                }
                if was_engaged {
                    self.ownership.release();
                }
            }
            TrackingMode::Detached => {}
        }
        debug!(region = %self.region, "tracker detached");
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
