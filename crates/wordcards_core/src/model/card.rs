//! Card model.
//!
//! # Invariants
//! - `list_id` is fixed at creation; the owner is always derived through it.
//! - `front` and `back` are never blank; `front_example` is `None` rather than blank.

use super::ids::{CardId, ListId};
use super::validation::{is_blank, normalize_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub front: String,
    pub front_example: Option<String>,
    pub back: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Create/update input for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub front: String,
    pub front_example: Option<String>,
    pub back: String,
}

impl CardDraft {
    pub fn new(
        front: impl Into<String>,
        front_example: Option<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            front_example: normalize_optional_text(front_example),
            back: back.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.front) || is_blank(&self.back) {
            return Err(ValidationError::MissingCardFields);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CardDraft;
    use crate::model::validation::ValidationError;

    #[test]
    fn blank_front_or_back_is_rejected() {
        assert_eq!(
            CardDraft::new("", None, "hello").validate(),
            Err(ValidationError::MissingCardFields)
        );
        assert_eq!(
            CardDraft::new("hola", None, "  ").validate(),
            Err(ValidationError::MissingCardFields)
        );
    }

    #[test]
    fn blank_example_is_normalized_away() {
        let draft = CardDraft::new("hola", Some(String::new()), "hello");
        assert_eq!(draft.front_example, None);
        draft.validate().expect("draft should be valid");
    }
}
