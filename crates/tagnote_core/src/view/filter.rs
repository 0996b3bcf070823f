//! Title and tag predicates over denormalized notes.
//!
//! # Invariants
//! - Empty title query and empty tag query each match every note.
//! - Tag matching is conjunctive and compares ids only.
//! - Output keeps input order.

use crate::model::note::DenormalizedNote;
use crate::model::tag::Tag;

/// The two filter inputs chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Case-insensitive substring of the title; empty matches all.
    pub title: String,
    /// Every one of these tags must be present; empty matches all.
    pub tags: Vec<Tag>,
}

impl NoteQuery {
    pub fn new(title: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            tags,
        }
    }
}

/// Returns the notes of `view` matching both predicates, in view order.
pub fn filter(
    view: &[DenormalizedNote],
    title_query: &str,
    tag_query: &[Tag],
) -> Vec<DenormalizedNote> {
    let needle = title_query.to_lowercase();
    view.iter()
        .filter(|note| title_matches(note, &needle) && tags_match(note, tag_query))
        .cloned()
        .collect()
}

/// Convenience wrapper over [`filter`] for a grouped query.
pub fn filter_by_query(view: &[DenormalizedNote], query: &NoteQuery) -> Vec<DenormalizedNote> {
    filter(view, &query.title, &query.tags)
}

/// `folded_needle` must already be lowercased.
fn title_matches(note: &DenormalizedNote, folded_needle: &str) -> bool {
    folded_needle.is_empty() || note.title.to_lowercase().contains(folded_needle)
}

fn tags_match(note: &DenormalizedNote, tag_query: &[Tag]) -> bool {
    tag_query.iter().all(|wanted| note.has_tag(&wanted.id))
}
