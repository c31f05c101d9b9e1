//! Scoped signal subscriptions.
//!
//! A [`SubscriptionSet`] is the only place subscription tokens live. The
//! set can only be emptied by [`SubscriptionSet::release`], which hands
//! every token back to the host, so each attach has exactly one detach.

use crate::host::{Host, SubscriptionToken};
use crate::model::{Region, Signal};
use tracing::{debug, error};

/// Live subscriptions acquired together and released together.
#[derive(Debug, Default)]
#[must_use = "subscriptions leak unless released back to the host"]
pub struct SubscriptionSet {
    tokens: Vec<SubscriptionToken>,
}

impl SubscriptionSet {
    /// Subscribe to each of `signals` on `region`.
    pub fn attach(host: &mut dyn Host, region: Region, signals: &[Signal]) -> Self {
        let tokens: Vec<_> = signals
            .iter()
            .map(|&signal| host.subscribe(region, signal))
            .collect();
        debug!(%region, signals = ?signals, "attached subscriptions");
        Self { tokens }
    }

    /// Whether the set holds a subscription for `signal`.
    pub fn covers(&self, signal: Signal) -> bool {
        self.tokens.iter().any(|t| t.signal() == signal)
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the set holds nothing.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Hand every token back to the host.
    pub fn release(mut self, host: &mut dyn Host) {
        let count = self.tokens.len();
        for token in self.tokens.drain(..) {
            host.unsubscribe(token);
        }
        debug!(count, "released subscriptions");
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        error!(
            count = self.tokens.len(),
            "subscription set dropped without release"
        );
    }
}
