//! Tag domain model.
//!
//! # Responsibility
//! - Define the reusable label record owned by the tag registry.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused.
//! - `label` is mutable and carries no uniqueness constraint.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque, stable identifier for one tag.
///
/// Any string is accepted when loading; freshly created tags get a v4 UUID
/// in its hyphenated text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TagId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TagId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TagId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Reusable label attached to notes by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    /// Creates a tag with a caller-provided id.
    ///
    /// Registry code is responsible for picking an id that is not in use.
    pub fn with_id(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Extracts tag ids from full tag objects, keeping input order.
pub fn tag_ids_of(tags: &[Tag]) -> Vec<TagId> {
    tags.iter().map(|tag| tag.id.clone()).collect()
}
