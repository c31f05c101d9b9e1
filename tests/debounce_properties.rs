//! Property-based tests for threshold and debounce behaviour.
//!
//! Black-box: everything goes through the public registry API and the
//! simulated host. Expectations are computed from the raw numbers, not
//! from the crate's own geometry helpers.

use proptest::prelude::*;
use scrollwatch::config::TrackerConfig;
use scrollwatch::model::{ElementId, Geometry, ListenerId, Region, Signal};
use scrollwatch::sim::SimulatedHost;
use scrollwatch::state::{PointerOwnership, TrackerRegistry};

// ===== Arbitrary Strategies =====

/// Strategy for viewport geometry: (content, visible, offset).
fn arb_geometry() -> impl Strategy<Value = (i64, i64, i64)> {
    (0i64..5000, 1i64..2000, 0i64..5000)
}

/// Strategy for a debounce delay plus gaps strictly shorter than it.
fn arb_burst() -> impl Strategy<Value = (u64, Vec<u64>)> {
    (1u64..500).prop_flat_map(|debounce| {
        (
            Just(debounce),
            prop::collection::vec(0..debounce, 0..12),
        )
    })
}

/// Strategy for signals an element can receive.
fn arb_signal() -> impl Strategy<Value = Signal> {
    prop::sample::select(Signal::ALL.to_vec())
}

fn registry(config: TrackerConfig) -> TrackerRegistry {
    TrackerRegistry::new(config, PointerOwnership::new())
}

// ===== Property Tests =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// One settled scroll notifies every listener iff the region is within the margin.
    #[test]
    fn settled_scroll_notifies_iff_within_margin(
        (content, visible, offset) in arb_geometry(),
        margin in 0u32..300,
        listener_count in 1u64..5,
    ) {
        let mut host = SimulatedHost::new();
        host.set_geometry(Region::Viewport, Geometry::new(content, visible, offset));
        let config = TrackerConfig::default().with_bottom_margin(margin);
        let mut registry = registry(config);
        for id in 1..=listener_count {
            registry.register(&mut host, ListenerId::new(id), None);
        }

        host.emit(&mut registry, Region::Viewport, Signal::Scroll);
        let evaluations = host.advance(&mut registry, 200);

        let expected = content - offset <= visible + i64::from(margin);
        prop_assert_eq!(evaluations.len(), 1);
        prop_assert_eq!(evaluations[0].reached_bottom, expected);
        let expected_count = if expected { listener_count as usize } else { 0 };
        prop_assert_eq!(host.notifications().len(), expected_count);

        registry.clear(&mut host);
    }

    /// The threshold holds for any geometry a host can report, extremes included.
    #[test]
    fn threshold_holds_over_full_i64_range(
        content in any::<i64>(),
        visible in any::<i64>(),
        offset in any::<i64>(),
        margin in any::<u32>(),
    ) {
        let mut host = SimulatedHost::new();
        host.set_geometry(Region::Viewport, Geometry::new(content, visible, offset));
        let mut registry = registry(TrackerConfig::default().with_bottom_margin(margin));
        registry.register(&mut host, ListenerId::new(1), None);

        host.emit(&mut registry, Region::Viewport, Signal::Scroll);
        let evaluations = host.advance(&mut registry, 200);

        let expected = i128::from(content) - i128::from(offset)
            <= i128::from(visible) + i128::from(margin);
        prop_assert_eq!(evaluations.len(), 1);
        prop_assert_eq!(evaluations[0].reached_bottom, expected);

        registry.clear(&mut host);
    }

    /// Any burst of scrolls closer together than the delay collapses to one check.
    #[test]
    fn burst_within_window_collapses_to_one_evaluation(
        (debounce, gaps) in arb_burst(),
    ) {
        let mut host = SimulatedHost::new();
        host.set_geometry(Region::Viewport, Geometry::new(800, 800, 0));
        let mut registry = registry(TrackerConfig::default().with_debounce_ms(debounce));
        registry.register(&mut host, ListenerId::new(1), None);

        let mut evaluations = 0;
        host.emit(&mut registry, Region::Viewport, Signal::Scroll);
        for gap in &gaps {
            evaluations += host.advance(&mut registry, *gap).len();
            host.emit(&mut registry, Region::Viewport, Signal::Scroll);
        }
        let last_scroll: u64 = gaps.iter().sum();
        evaluations += host.advance(&mut registry, debounce * 2).len();

        prop_assert_eq!(evaluations, 1);
        prop_assert_eq!(host.notifications().len(), 1);
        prop_assert_eq!(host.notifications()[0].at_ms, last_scroll + debounce);

        registry.clear(&mut host);
    }

    /// Scrolls spaced at least one delay apart are each evaluated.
    #[test]
    fn spaced_scrolls_are_evaluated_separately(
        debounce in 1u64..300,
        count in 1usize..8,
        extra in 0u64..100,
    ) {
        let mut host = SimulatedHost::new();
        host.set_geometry(Region::Viewport, Geometry::new(800, 800, 0));
        let mut registry = registry(TrackerConfig::default().with_debounce_ms(debounce));
        registry.register(&mut host, ListenerId::new(1), None);

        let mut evaluations = 0;
        for _ in 0..count {
            host.emit(&mut registry, Region::Viewport, Signal::Scroll);
            evaluations += host.advance(&mut registry, debounce + extra).len();
        }

        prop_assert_eq!(evaluations, count);

        registry.clear(&mut host);
    }

    /// Whatever happened before, unregistering everyone leaves nothing behind.
    #[test]
    fn teardown_releases_all_host_resources(
        signals in prop::collection::vec((any::<bool>(), arb_signal()), 0..40),
    ) {
        let mut host = SimulatedHost::new();
        let feed_id = ElementId::new("feed").unwrap();
        let feed = host.add_element(&feed_id);
        host.set_geometry(feed, Geometry::new(300, 300, 0));
        host.set_geometry(Region::Viewport, Geometry::new(600, 600, 0));
        let mut registry = registry(TrackerConfig::default());
        registry.register(&mut host, ListenerId::new(1), None);
        registry.register(&mut host, ListenerId::new(2), Some(&feed_id));

        for (on_feed, signal) in signals {
            let region = if on_feed { feed } else { Region::Viewport };
            host.emit(&mut registry, region, signal);
            host.advance(&mut registry, 20);
        }

        registry.unregister(&mut host, ListenerId::new(1), None);
        registry.unregister(&mut host, ListenerId::new(2), Some(&feed_id));

        prop_assert!(registry.is_empty());
        prop_assert_eq!(host.live_subscription_count(), 0);
        prop_assert_eq!(host.pending_timer_count(), 0);
        prop_assert!(!registry.ownership().is_owned());
    }

    /// Listener order is first-registration order with duplicates removed.
    #[test]
    fn registration_is_idempotent_and_ordered(
        ids in prop::collection::vec(1u64..6, 1..20),
    ) {
        let mut host = SimulatedHost::new();
        let mut registry = registry(TrackerConfig::default());

        for id in &ids {
            registry.register(&mut host, ListenerId::new(*id), None);
        }

        let mut expected: Vec<ListenerId> = Vec::new();
        for id in &ids {
            let listener = ListenerId::new(*id);
            if !expected.contains(&listener) {
                expected.push(listener);
            }
        }
        prop_assert_eq!(registry.listeners(Region::Viewport), expected.as_slice());
        prop_assert_eq!(registry.len(), 1);

        registry.clear(&mut host);
    }
}
