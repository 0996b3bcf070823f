//! Derived read models over notes and tags.
//!
//! # Responsibility
//! - Join normalized notes with the tag registry (`denormalize`).
//! - Evaluate title and tag predicates over the joined rows (`filter`).
//!
//! # Invariants
//! - Both layers are pure; only the join cache holds state.

pub mod denormalize;
pub mod filter;
