//! Domain model for memos, memo relations and users.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep comments as plain memos linked through a `comment` relation.
//!
//! # Invariants
//! - Every memo carries a store-assigned numeric `id` and a stable `uid`.
//! - A comment memo has exactly one `comment` relation pointing at its parent.

pub mod memo;
pub mod relation;
pub mod user;
