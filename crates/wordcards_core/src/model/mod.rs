//! Domain model for users, word lists, cards and quiz attempts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation for every write path.
//!
//! # Invariants
//! - Ownership is a strict tree: User 1..* WordList 1..* Card.
//! - Parent references (`user_id`, `list_id`) never change after creation.

pub mod card;
pub mod ids;
pub mod quiz;
pub mod user;
pub mod validation;
pub mod word_list;
