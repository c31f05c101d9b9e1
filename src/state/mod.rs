//! Scroll-region tracking state machine.
//!
//! [`TrackerRegistry`] maps regions to [`RegionTracker`]s; trackers own the
//! subscriptions, debounce timer and listener list for one region.

pub mod pointer_ownership;
pub mod registry;
pub mod subscriptions;
pub mod tracker;

// Re-export for convenience
pub use pointer_ownership::PointerOwnership;
pub use registry::TrackerRegistry;
pub use subscriptions::SubscriptionSet;
pub use tracker::{Engagement, Evaluation, RegionTracker};
