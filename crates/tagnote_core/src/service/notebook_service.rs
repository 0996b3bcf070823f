//! Notebook command/query service.
//!
//! # Responsibility
//! - Translate full-tag command inputs into normalized writes.
//! - Serve the visible note list by joining, then filtering.
//! - Apply the configured tag deletion policy in one place.
//!
//! # Invariants
//! - Every query re-resolves the join against current store identities, so
//!   results always reflect the latest mutation.
//! - No cross-store transaction: a tag delete under `Cascade` writes the
//!   registry first, then the notes.

use crate::config::{ConfigError, NotebookConfig, TagDeletionPolicy};
use crate::model::note::{DenormalizedNote, NoteId};
use crate::model::tag::{tag_ids_of, Tag, TagId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::tag_registry::TagRegistry;
use crate::store::{DurableMedium, StoreResult};
use crate::view::denormalize::DenormalizationView;
use crate::view::filter::filter;
use log::info;
use std::rc::Rc;

/// Commands and queries consumed by presentation layers.
pub trait NotebookApi {
    /// Creates a note; only the ids of `tags` are stored.
    fn create_note(&mut self, title: &str, body: &str, tags: &[Tag]) -> StoreResult<NoteId>;
    /// Replaces a note wholesale. Unknown ids are a no-op.
    fn update_note(&mut self, id: &NoteId, title: &str, body: &str, tags: &[Tag])
        -> StoreResult<()>;
    fn delete_note(&mut self, id: &NoteId) -> StoreResult<()>;
    /// Creates a tag whose id is neither live nor still referenced by a note.
    fn create_tag(&mut self, label: &str) -> StoreResult<Tag>;
    /// Unknown ids are a no-op.
    fn rename_tag(&mut self, id: &TagId, label: &str) -> StoreResult<()>;
    /// Unknown ids are a no-op.
    fn delete_tag(&mut self, id: &TagId) -> StoreResult<()>;
    /// Returns notes whose title contains `title_query` (case-insensitive)
    /// and that carry every tag of `tag_query`.
    fn list_visible_notes(
        &mut self,
        title_query: &str,
        tag_query: &[Tag],
    ) -> StoreResult<Vec<DenormalizedNote>>;
    /// Returns one resolved note, or `None` when the id is unknown.
    fn find_note(&mut self, id: &NoteId) -> StoreResult<Option<DenormalizedNote>>;
    /// Returns the registry contents in order.
    fn available_tags(&self) -> StoreResult<Vec<Tag>>;
}

/// Notebook facade owning both repositories and the join cache.
pub struct NotebookService<M: DurableMedium> {
    notes: NoteRepository<M>,
    tags: TagRegistry<M>,
    view: DenormalizationView,
    tag_deletion: TagDeletionPolicy,
}

impl<M: DurableMedium> NotebookService<M> {
    /// Creates a service with default keys and policy.
    pub fn new(medium: Rc<M>) -> Self {
        let config = NotebookConfig::default();
        Self::build(medium, &config)
    }

    /// Creates a service after validating `config`.
    pub fn with_config(medium: Rc<M>, config: &NotebookConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(medium, config))
    }

    fn build(medium: Rc<M>, config: &NotebookConfig) -> Self {
        Self {
            notes: NoteRepository::new(Rc::clone(&medium), config.notes_key.as_str()),
            tags: TagRegistry::new(medium, config.tags_key.as_str()),
            view: DenormalizationView::new(),
            tag_deletion: config.tag_deletion,
        }
    }

    pub fn notes(&self) -> &NoteRepository<M> {
        &self.notes
    }

    pub fn tags(&self) -> &TagRegistry<M> {
        &self.tags
    }

    /// Number of join recomputations performed so far.
    pub fn view_recomputations(&self) -> u64 {
        self.view.recomputations()
    }

    fn resolved_view(&mut self) -> StoreResult<&[DenormalizedNote]> {
        let notes = self.notes.notes()?;
        let tags = self.tags.tags()?;
        Ok(self
            .view
            .resolve(notes, self.notes.identity(), tags, self.tags.identity()))
    }
}

impl<M: DurableMedium> NotebookApi for NotebookService<M> {
    fn create_note(&mut self, title: &str, body: &str, tags: &[Tag]) -> StoreResult<NoteId> {
        self.notes.create(title, body, tag_ids_of(tags))
    }

    fn update_note(
        &mut self,
        id: &NoteId,
        title: &str,
        body: &str,
        tags: &[Tag],
    ) -> StoreResult<()> {
        self.notes.update(id, title, body, tag_ids_of(tags))?;
        Ok(())
    }

    fn delete_note(&mut self, id: &NoteId) -> StoreResult<()> {
        self.notes.delete(id)?;
        Ok(())
    }

    fn create_tag(&mut self, label: &str) -> StoreResult<Tag> {
        let referenced = self.notes.referenced_tag_ids()?;
        self.tags
            .create_avoiding(label, |candidate| referenced.contains(candidate))
    }

    fn rename_tag(&mut self, id: &TagId, label: &str) -> StoreResult<()> {
        self.tags.rename(id, label)?;
        Ok(())
    }

    fn delete_tag(&mut self, id: &TagId) -> StoreResult<()> {
        self.tags.delete(id)?;
        apply_tag_deletion(self.tag_deletion, &mut self.notes, id)?;
        Ok(())
    }

    fn list_visible_notes(
        &mut self,
        title_query: &str,
        tag_query: &[Tag],
    ) -> StoreResult<Vec<DenormalizedNote>> {
        let view = self.resolved_view()?;
        let visible = filter(view, title_query, tag_query);
        info!(
            "event=notes_list module=service status=ok total={} visible={} tag_filters={}",
            view.len(),
            visible.len(),
            tag_query.len()
        );
        Ok(visible)
    }

    fn find_note(&mut self, id: &NoteId) -> StoreResult<Option<DenormalizedNote>> {
        Ok(self
            .resolved_view()?
            .iter()
            .find(|note| note.id == *id)
            .cloned())
    }

    fn available_tags(&self) -> StoreResult<Vec<Tag>> {
        Ok(self.tags.tags()?.to_vec())
    }
}

/// Applies `policy` to notes after tag `tag_id` left the registry.
///
/// Returns the number of notes rewritten (always 0 for `LeaveDangling`).
pub fn apply_tag_deletion<M: DurableMedium>(
    policy: TagDeletionPolicy,
    notes: &mut NoteRepository<M>,
    tag_id: &TagId,
) -> StoreResult<usize> {
    match policy {
        TagDeletionPolicy::LeaveDangling => Ok(0),
        TagDeletionPolicy::Cascade => notes.strip_tag(tag_id),
    }
}
