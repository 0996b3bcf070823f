//! Note domain model.
//!
//! # Responsibility
//! - Define the durable `NormalizedNote` record and its JSON shape.
//! - Define the transient `DenormalizedNote` produced by the view layer.
//!
//! # Invariants
//! - `NormalizedNote::id` is unique across the repository at all times.
//! - `tag_ids` order is kept as supplied; duplicates carry no meaning.
//! - `DenormalizedNote` is derived state and is never serialized to storage.
//!
//! # See also
//! - `view::denormalize` for the join rules.

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque, stable identifier for one note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Durable note record; tags are referenced by id.
///
/// Serialized as `{ "id", "title", "markdown", "tagIds" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedNote {
    pub id: NoteId,
    pub title: String,
    /// Markdown source; rendered by the presentation layer, never parsed here.
    #[serde(rename = "markdown")]
    pub body: String,
    #[serde(rename = "tagIds")]
    pub tag_ids: Vec<TagId>,
}

impl NormalizedNote {
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        body: impl Into<String>,
        tag_ids: Vec<TagId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            tag_ids,
        }
    }

    /// Returns whether the note references `tag_id`, resolved or not.
    pub fn references_tag(&self, tag_id: &TagId) -> bool {
        self.tag_ids.contains(tag_id)
    }
}

/// Note with tag references resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenormalizedNote {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Resolved tags in registry order; dangling ids are omitted.
    pub tags: Vec<Tag>,
}

impl DenormalizedNote {
    /// Returns whether a tag with `tag_id` is among the resolved tags.
    pub fn has_tag(&self, tag_id: &TagId) -> bool {
        self.tags.iter().any(|tag| tag.id == *tag_id)
    }
}
