//! Trace replay: drives a registry against the simulated host.
//!
//! This is the glue the binary runs. Each [`TraceStep`] maps onto one host
//! or registry call; the resulting notifications are collected into a
//! [`ReplayReport`].

use crate::config::TrackerConfig;
use crate::model::{ElementId, Geometry, Region};
use crate::sim::{Notification, SimulatedHost};
use crate::source::TraceStep;
use crate::state::{PointerOwnership, TrackerRegistry};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of replaying a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Notifications delivered, in delivery order.
    pub notifications: Vec<Notification>,
    /// Bottom checks that ran.
    pub evaluations: usize,
    /// Bottom checks that found the region near its bottom.
    pub reached_bottom: usize,
    /// Signals the host delivered (had a live subscription).
    pub delivered_signals: usize,
    /// Signals dropped because nothing was subscribed.
    pub dropped_signals: usize,
    /// Steps referring to elements that were never declared.
    pub skipped_steps: usize,
    /// Regions still tracked when the trace ended.
    pub tracked_at_end: usize,
    /// Virtual time when the trace ended.
    pub end_ms: u64,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in &self.notifications {
            writeln!(f, "{} listener={}", n.at_ms, n.listener)?;
        }
        write!(
            f,
            "# evaluations={} reached_bottom={} notifications={} tracked_at_end={} end_ms={}",
            self.evaluations,
            self.reached_bottom,
            self.notifications.len(),
            self.tracked_at_end,
            self.end_ms
        )
    }
}

/// Replay `steps` with trackers configured by `config`.
///
/// Everything still tracked at the end is released before returning.
pub fn replay(steps: &[TraceStep], config: TrackerConfig) -> ReplayReport {
    let mut host = SimulatedHost::new();
    let mut registry = TrackerRegistry::new(config, PointerOwnership::new());
    let mut report = ReplayReport::default();

    for step in steps {
        debug!(?step, at_ms = host.now_ms(), "replaying step");
        match step {
            TraceStep::Element { id } => {
                host.add_element(id);
            }
            TraceStep::Geometry {
                element,
                content,
                visible,
                offset,
            } => {
                let Some(region) = lookup(&host, element.as_ref()) else {
                    report.skipped_steps += 1;
                    continue;
                };
                host.set_geometry(region, Geometry::new(*content, *visible, *offset));
            }
            TraceStep::Register { listener, element } => {
                registry.set_reference(&mut host, *listener, element.as_deref());
            }
            TraceStep::Unregister { listener, element } => {
                registry.unset_reference(&mut host, *listener, element.as_deref());
            }
            TraceStep::Signal { element, signal } => {
                let Some(region) = lookup(&host, element.as_ref()) else {
                    report.skipped_steps += 1;
                    continue;
                };
                if host.emit(&mut registry, region, *signal) {
                    report.delivered_signals += 1;
                } else {
                    report.dropped_signals += 1;
                }
            }
            TraceStep::Advance { ms } => {
                for evaluation in host.advance(&mut registry, *ms) {
                    report.evaluations += 1;
                    if evaluation.reached_bottom {
                        report.reached_bottom += 1;
                    }
                }
            }
        }
    }

    report.tracked_at_end = registry.len();
    report.end_ms = host.now_ms();
    registry.clear(&mut host);
    report.notifications = host.notifications().to_vec();
    report
}

fn lookup(host: &SimulatedHost, element: Option<&ElementId>) -> Option<Region> {
    match element {
        None => Some(Region::Viewport),
        Some(id) => {
            let region = host.element(id);
            if region.is_none() {
                warn!(element = %id, "trace refers to undeclared element");
            }
            region
        }
    }
}
