//! Core domain logic for tagnote.
//! Notes, reusable tags, and the persisted state behind them.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigError, NotebookConfig, TagDeletionPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{DenormalizedNote, NormalizedNote, NoteId};
pub use model::tag::{Tag, TagId};
pub use repo::note_repo::NoteRepository;
pub use repo::tag_registry::TagRegistry;
pub use service::notebook_service::{apply_tag_deletion, NotebookApi, NotebookService};
pub use store::{
    DurableMedium, InitialValue, MediumError, MemoryMedium, PersistentStore, SqliteMedium,
    StoreError, StoreResult, ValueIdentity,
};
pub use view::denormalize::{join, DenormalizationView};
pub use view::filter::{filter, filter_by_query, NoteQuery};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
