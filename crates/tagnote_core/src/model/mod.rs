//! Notebook domain model.
//!
//! # Responsibility
//! - Define the durable (normalized) note and tag records.
//! - Define the derived (denormalized) note shape handed to presentation.
//!
//! # Invariants
//! - Every note and tag is identified by a stable, never-reused opaque id.
//! - Notes reference tags by id only; resolved tags are never persisted.

pub mod note;
pub mod tag;
