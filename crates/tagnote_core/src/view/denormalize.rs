//! Normalized-to-denormalized join with an identity-keyed cache.
//!
//! # Invariants
//! - Resolved tags follow registry order, not `tag_ids` order.
//! - Tag ids with no registry entry are omitted.
//! - The cache is recomputed exactly when either input identity changes.

use crate::model::note::{DenormalizedNote, NormalizedNote};
use crate::model::tag::{Tag, TagId};
use crate::store::ValueIdentity;
use log::debug;
use std::collections::HashSet;

/// Resolves every note's tag ids against `tags`.
pub fn join(notes: &[NormalizedNote], tags: &[Tag]) -> Vec<DenormalizedNote> {
    notes
        .iter()
        .map(|note| {
            let wanted: HashSet<TagId> = note.tag_ids.iter().cloned().collect();
            DenormalizedNote {
                id: note.id.clone(),
                title: note.title.clone(),
                body: note.body.clone(),
                tags: tags
                    .iter()
                    .filter(|tag| wanted.contains(&tag.id))
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}

struct CachedJoin {
    notes: ValueIdentity,
    tags: ValueIdentity,
    rows: Vec<DenormalizedNote>,
}

/// Memoized `join`, keyed by the identities of its two inputs.
#[derive(Default)]
pub struct DenormalizationView {
    cache: Option<CachedJoin>,
    recomputations: u64,
}

impl DenormalizationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the joined rows, recomputing when an identity differs from
    /// the cached one.
    ///
    /// Callers must pass the identity that belongs to the slice they pass.
    pub fn resolve(
        &mut self,
        notes: &[NormalizedNote],
        notes_identity: ValueIdentity,
        tags: &[Tag],
        tags_identity: ValueIdentity,
    ) -> &[DenormalizedNote] {
        let stale = self.cache.as_ref().map_or(true, |cached| {
            cached.notes != notes_identity || cached.tags != tags_identity
        });
        if stale {
            self.recomputations += 1;
            debug!(
                "event=view_recompute module=view status=ok notes={} tags={} recomputations={}",
                notes.len(),
                tags.len(),
                self.recomputations
            );
            self.cache = Some(CachedJoin {
                notes: notes_identity,
                tags: tags_identity,
                rows: join(notes, tags),
            });
        }

        self.cache
            .as_ref()
            .map_or(&[][..], |cached| cached.rows.as_slice())
    }

    /// Number of times `join` has run for this view.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
