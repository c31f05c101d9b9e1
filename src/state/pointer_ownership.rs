//! Shared pointer-ownership flag.
//!
//! True while the pointer or a finger is engaged with any tracked inner
//! element. Viewport trackers read it to stay quiet while a nested region
//! owns the interaction; element trackers are the only writers.

use std::cell::Cell;
use std::rc::Rc;

/// Handle to the process-wide ownership flag.
///
/// Clones share the same flag. The registry hands one clone to every
/// tracker it creates.
#[derive(Debug, Clone, Default)]
pub struct PointerOwnership {
    owned: Rc<Cell<bool>>,
}

impl PointerOwnership {
    /// A fresh, unowned flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an inner region currently owns pointer/touch interaction.
    pub fn is_owned(&self) -> bool {
        self.owned.get()
    }

    /// Mark the interaction as owned by an inner region.
    pub(crate) fn claim(&self) {
        self.owned.set(true);
    }

    /// Clear ownership.
    pub(crate) fn release(&self) {
        self.owned.set(false);
    }
}
