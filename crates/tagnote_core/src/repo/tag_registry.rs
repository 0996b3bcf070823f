//! Tag registry.
//!
//! # Responsibility
//! - Create, rename and delete reusable tags.
//! - Keep tags in insertion order.
//!
//! # Invariants
//! - Tag ids are unique within the registry and never reused. Ids the
//!   registry no longer holds (dangling note references) are passed in by the
//!   caller as reserved.
//! - Labels are not deduplicated.
//! - Deleting a tag never touches notes.

use crate::model::tag::{Tag, TagId};
use crate::repo::fresh_id;
use crate::store::{DurableMedium, PersistentStore, StoreResult, ValueIdentity};
use log::info;
use std::rc::Rc;

pub struct TagRegistry<M: DurableMedium> {
    store: PersistentStore<Vec<Tag>, M>,
}

impl<M: DurableMedium> TagRegistry<M> {
    /// Binds the registry to `key`; an absent entry means "no tags yet".
    pub fn new(medium: Rc<M>, key: impl Into<String>) -> Self {
        Self {
            store: PersistentStore::with_default(medium, key, Vec::new()),
        }
    }

    /// Returns all tags in registry order.
    pub fn tags(&self) -> StoreResult<&[Tag]> {
        Ok(self.store.get()?.as_slice())
    }

    pub fn get(&self, id: &TagId) -> StoreResult<Option<&Tag>> {
        Ok(self.tags()?.iter().find(|tag| tag.id == *id))
    }

    pub fn identity(&self) -> ValueIdentity {
        self.store.identity()
    }

    /// Appends a tag with a fresh id and persists the registry.
    pub fn create(&mut self, label: impl Into<String>) -> StoreResult<Tag> {
        self.create_avoiding(label, |_| false)
    }

    /// Like [`create`](Self::create), but the new id also avoids every id
    /// for which `is_reserved` holds.
    pub fn create_avoiding(
        &mut self,
        label: impl Into<String>,
        is_reserved: impl Fn(&TagId) -> bool,
    ) -> StoreResult<Tag> {
        let label = label.into();
        let tag = self.store.modify(|tags| {
            let id = fresh_id(|candidate: &TagId| {
                is_reserved(candidate) || tags.iter().any(|tag| tag.id == *candidate)
            });
            let tag = Tag::with_id(id, label);
            tags.push(tag.clone());
            tag
        })?;
        info!("event=tag_create module=repo status=ok tag_id={}", tag.id);
        Ok(tag)
    }

    /// Replaces the label of tag `id`. Returns whether a tag matched.
    ///
    /// The registry is persisted even when nothing matched.
    pub fn rename(&mut self, id: &TagId, label: impl Into<String>) -> StoreResult<bool> {
        let label = label.into();
        let matched = self.store.modify(|tags| {
            match tags.iter_mut().find(|tag| tag.id == *id) {
                Some(tag) => {
                    tag.label = label;
                    true
                }
                None => false,
            }
        })?;
        info!(
            "event=tag_rename module=repo status=ok tag_id={} matched={}",
            id, matched
        );
        Ok(matched)
    }

    /// Removes tag `id`. Returns whether a tag was removed.
    pub fn delete(&mut self, id: &TagId) -> StoreResult<bool> {
        let removed = self.store.modify(|tags| {
            let before = tags.len();
            tags.retain(|tag| tag.id != *id);
            tags.len() != before
        })?;
        info!(
            "event=tag_delete module=repo status=ok tag_id={} removed={}",
            id, removed
        );
        Ok(removed)
    }
}
