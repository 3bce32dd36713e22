//! Quiz attempt repository: append-only log guarded by card ownership.

use crate::model::ids::{AttemptId, CardId, UserId};
use crate::model::quiz::QuizAttempt;
use crate::ownership::{EntityRef, OwnershipResolver};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

pub trait QuizRepository {
    /// Appends one attempt for a card owned by `owner`.
    fn record_attempt(
        &mut self,
        owner: UserId,
        card_id: CardId,
        correct: bool,
    ) -> RepoResult<QuizAttempt>;
}

pub struct SqliteQuizRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteQuizRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuizRepository for SqliteQuizRepository<'_> {
    fn record_attempt(
        &mut self,
        owner: UserId,
        card_id: CardId,
        correct: bool,
    ) -> RepoResult<QuizAttempt> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let chain = OwnershipResolver::new(&tx).require_card(owner, card_id)?;

        tx.execute(
            "INSERT INTO quiz_progress (user_id, list_id, card_id, correct)
             VALUES (?1, ?2, ?3, ?4);",
            params![chain.owner, chain.list_id, chain.card_id, correct],
        )?;
        let attempt_id = AttemptId(tx.last_insert_rowid());
        let attempt = tx
            .query_row(
                "SELECT id, user_id, list_id, card_id, correct, created_at
                 FROM quiz_progress
                 WHERE id = ?1;",
                [attempt_id],
                parse_attempt_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound(EntityRef::Card(card_id)))?;

        tx.commit()?;
        Ok(attempt)
    }
}

fn parse_attempt_row(row: &Row<'_>) -> rusqlite::Result<QuizAttempt> {
    Ok(QuizAttempt {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        list_id: row.get("list_id")?,
        card_id: row.get("card_id")?,
        correct: row.get("correct")?,
        created_at: row.get("created_at")?,
    })
}
