//! Notebook configuration.
//!
//! # Responsibility
//! - Name the medium keys that hold notes and tags.
//! - Select the tag deletion cleanup policy.
//!
//! # Invariants
//! - Notes and tags never share a key.
//! - Missing fields fall back to the defaults (`NOTES`, `TAGS`,
//!   `leave_dangling`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_NOTES_KEY: &str = "NOTES";
pub const DEFAULT_TAGS_KEY: &str = "TAGS";

/// What happens to note tag references when a tag is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagDeletionPolicy {
    /// Deleted tag ids stay in `tag_ids` and are skipped when resolving.
    #[default]
    LeaveDangling,
    /// Deleted tag ids are stripped from every note.
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub notes_key: String,
    pub tags_key: String,
    pub tag_deletion: TagDeletionPolicy,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            tags_key: DEFAULT_TAGS_KEY.to_string(),
            tag_deletion: TagDeletionPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyKey(&'static str),
    SharedKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid notebook config: {err}"),
            Self::EmptyKey(field) => write!(f, "`{field}` cannot be empty"),
            Self::SharedKey(key) => {
                write!(f, "notes and tags cannot share the medium key `{key}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl NotebookConfig {
    /// Parses a (possibly partial) JSON object and validates it.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notes_key.trim().is_empty() {
            return Err(ConfigError::EmptyKey("notes_key"));
        }
        if self.tags_key.trim().is_empty() {
            return Err(ConfigError::EmptyKey("tags_key"));
        }
        if self.notes_key == self.tags_key {
            return Err(ConfigError::SharedKey(self.notes_key.clone()));
        }
        Ok(())
    }
}
