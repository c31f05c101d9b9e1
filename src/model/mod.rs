//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod region;

// Re-export for convenience
pub use identifiers::{ElementHandle, ElementId, InvalidElementId, ListenerId};
pub use region::{Geometry, Region, Signal};
