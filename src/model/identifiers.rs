//! Core identifier newtypes with smart constructors.
//!
//! Element identifiers validate non-empty strings at construction time.
//! Handles and listener ids are opaque numbers issued by the host (or by
//! [`ListenerId::generate`] at registration time).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Textual identifier a caller uses to name a trackable element.
///
/// An empty identifier is not an element: callers that pass one are
/// asking for the viewport (see [`ElementId::parse_optional`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(String);

impl ElementId {
    /// Smart constructor: validates non-empty element id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidElementId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidElementId::Empty);
        }
        Ok(Self(raw))
    }

    /// Map an optional raw identifier to an element id.
    ///
    /// `None` and `Some("")` both mean "the viewport" and yield `None`.
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| Self::new(s).ok())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ElementId {
    type Error = InvalidElementId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ElementId> for String {
    fn from(value: ElementId) -> Self {
        value.0
    }
}

/// Opaque host-issued identity of a resolved element.
///
/// Two handles are the same element iff the numbers match; the host
/// guarantees one handle per live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    /// Wrap a host-assigned raw handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a listener that wants "reached bottom" notifications.
///
/// Listeners compare equal iff their ids match; nothing else about the
/// notification target participates in equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap an id the host already assigned.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Generate a fresh, process-unique id.
    ///
    /// Generated ids start at 1 and increase monotonically; they never
    /// collide with each other, but may collide with ids created via
    /// [`ListenerId::new`] if a host mixes both schemes.
    pub fn generate() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== Error Types =====

/// Rejected element identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidElementId {
    /// Empty strings name the viewport, not an element.
    #[error("Element ID cannot be empty")]
    Empty,
}

// ===== Tests =====
