//! Normalized note repository.
//!
//! # Responsibility
//! - Create, update and delete notes that reference tags by id.
//! - Offer the single bulk rewrite used by cascading tag cleanup.
//!
//! # Invariants
//! - Note ids are unique across the repository at all times.
//! - `update` replaces title, body and tag ids wholesale.
//! - Notes keep insertion order; updates never move a note.

use crate::model::note::{NormalizedNote, NoteId};
use crate::model::tag::TagId;
use crate::repo::fresh_id;
use crate::store::{DurableMedium, PersistentStore, StoreResult, ValueIdentity};
use log::info;
use std::collections::HashSet;
use std::rc::Rc;

pub struct NoteRepository<M: DurableMedium> {
    store: PersistentStore<Vec<NormalizedNote>, M>,
}

impl<M: DurableMedium> NoteRepository<M> {
    /// Binds the repository to `key`; an absent entry means "no notes yet".
    pub fn new(medium: Rc<M>, key: impl Into<String>) -> Self {
        Self {
            store: PersistentStore::with_default(medium, key, Vec::new()),
        }
    }

    /// Returns all notes in insertion order.
    pub fn notes(&self) -> StoreResult<&[NormalizedNote]> {
        Ok(self.store.get()?.as_slice())
    }

    pub fn get(&self, id: &NoteId) -> StoreResult<Option<&NormalizedNote>> {
        Ok(self.notes()?.iter().find(|note| note.id == *id))
    }

    pub fn identity(&self) -> ValueIdentity {
        self.store.identity()
    }

    /// Every tag id referenced by any note, resolved or dangling.
    pub fn referenced_tag_ids(&self) -> StoreResult<HashSet<TagId>> {
        Ok(self
            .notes()?
            .iter()
            .flat_map(|note| note.tag_ids.iter().cloned())
            .collect())
    }

    /// Appends a note with an id distinct from every existing note id.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        tag_ids: Vec<TagId>,
    ) -> StoreResult<NoteId> {
        let (title, body) = (title.into(), body.into());
        let tag_count = tag_ids.len();
        let id = self.store.modify(|notes| {
            let id: NoteId =
                fresh_id(|candidate: &NoteId| notes.iter().any(|note| note.id == *candidate));
            notes.push(NormalizedNote::with_id(id.clone(), title, body, tag_ids));
            id
        })?;
        info!(
            "event=note_create module=repo status=ok note_id={} tag_count={}",
            id, tag_count
        );
        Ok(id)
    }

    /// Replaces title, body and tag ids of note `id`. Returns whether a note
    /// matched; the repository is persisted either way.
    pub fn update(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        tag_ids: Vec<TagId>,
    ) -> StoreResult<bool> {
        let (title, body) = (title.into(), body.into());
        let matched = self.store.modify(|notes| {
            let Some(note) = notes.iter_mut().find(|note| note.id == *id) else {
                return false;
            };
            note.title = title;
            note.body = body;
            note.tag_ids = tag_ids;
            true
        })?;
        info!(
            "event=note_update module=repo status=ok note_id={} matched={}",
            id, matched
        );
        Ok(matched)
    }

    /// Removes note `id`. Returns whether a note was removed.
    pub fn delete(&mut self, id: &NoteId) -> StoreResult<bool> {
        let removed = self.store.modify(|notes| {
            let before = notes.len();
            notes.retain(|note| note.id != *id);
            notes.len() != before
        })?;
        info!(
            "event=note_delete module=repo status=ok note_id={} removed={}",
            id, removed
        );
        Ok(removed)
    }

    /// Strips `tag_id` from every note. Persists only when a note changed.
    ///
    /// Returns the number of notes that referenced the tag.
    pub fn strip_tag(&mut self, tag_id: &TagId) -> StoreResult<usize> {
        let affected = self
            .notes()?
            .iter()
            .filter(|note| note.references_tag(tag_id))
            .count();
        if affected == 0 {
            return Ok(0);
        }

        self.store.modify(|notes| {
            for note in notes.iter_mut() {
                note.tag_ids.retain(|id| id != tag_id);
            }
        })?;
        info!(
            "event=note_strip_tag module=repo status=ok tag_id={} affected={}",
            tag_id, affected
        );
        Ok(affected)
    }
}
