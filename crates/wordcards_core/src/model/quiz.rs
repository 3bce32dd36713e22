//! Quiz attempt log entry. Append-only; nothing in core aggregates it.

use super::ids::{AttemptId, CardId, ListId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: AttemptId,
    pub user_id: UserId,
    pub list_id: ListId,
    pub card_id: CardId,
    pub correct: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
