//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository errors into the caller-facing [`crate::CoreError`].
//! - Keep the HTTP layer decoupled from storage details.

pub mod card_service;
pub mod credential_service;
pub mod word_list_service;
