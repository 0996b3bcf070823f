//! Core use-case services.
//!
//! # Responsibility
//! - Expose the notebook command/query surface to presentation layers.
//! - Keep presentation code decoupled from stores and media.

pub mod notebook_service;
