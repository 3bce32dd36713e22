//! Word list model.
//!
//! # Invariants
//! - `user_id` is fixed at creation and is the sole source of ownership.
//! - `title` is never blank; `description` is `None` rather than blank.

use super::card::Card;
use super::ids::{ListId, UserId};
use super::validation::{is_blank, normalize_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    pub id: ListId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// A word list together with its cards, oldest card first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordListDetail {
    pub list: WordList,
    pub cards: Vec<Card>,
}

/// Create/update input for a word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordListDraft {
    pub title: String,
    pub description: Option<String>,
}

impl WordListDraft {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description: normalize_optional_text(description),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::TitleRequired);
        }
        Ok(())
    }
}
