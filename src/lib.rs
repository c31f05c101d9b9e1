//! scrollwatch
//!
//! Debounced "reached bottom" detection for scrollable regions.
//!
//! Listeners register against the viewport or an element through
//! [`state::TrackerRegistry`]. The hosting UI environment, abstracted as
//! [`host::Host`], delivers pointer, touch, wheel and scroll signals back
//! into the registry; once scrolling settles near the bottom of a region,
//! every listener on it is notified.
//!
//! Pure core: [`model`], [`state`]. Impure shell: [`host`] implementations,
//! [`source`], [`logging`], the replay binary.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod sim;
pub mod source;
pub mod state;

// Trace replay used by the binary
pub mod integration;

#[cfg(test)]
mod tests;
