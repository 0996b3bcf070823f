//! Authoritative collections backed by persisted stores.
//!
//! # Responsibility
//! - Own the tag registry and the normalized note repository.
//! - Generate fresh identifiers that never collide with existing entries.
//!
//! # Invariants
//! - Every mutation goes through exactly one `PersistentStore::set`.
//! - Unknown ids on update/rename/delete are no-ops, not errors.
//! - Neither collection reaches into the other.

use uuid::Uuid;

pub mod note_repo;
pub mod tag_registry;

/// Returns a v4 UUID id (hyphenated text) for which `is_taken` is false.
pub(crate) fn fresh_id<I: From<String>>(is_taken: impl Fn(&I) -> bool) -> I {
    fresh_id_from(|| Uuid::new_v4().to_string(), is_taken)
}

fn fresh_id_from<I: From<String>>(
    mut next_candidate: impl FnMut() -> String,
    is_taken: impl Fn(&I) -> bool,
) -> I {
    loop {
        let candidate = I::from(next_candidate());
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
