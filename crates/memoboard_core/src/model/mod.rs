//! Typed domain models for the five dashboard collections.
//!
//! # Responsibility
//! - Define the canonical record shapes persisted by the record store.
//! - Keep legacy-tolerant field decoding in one place (`lenient`).
//!
//! # Invariants
//! - Every record carries the shared envelope: `id` plus `created_date`.
//! - Enum values serialize in `snake_case` to match persisted documents.

pub mod block;
pub mod laundry;
pub(crate) mod lenient;
pub mod note;
pub mod reminder;
pub mod spending;
