//! Card repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/delete over `cards`, authorized through the
//!   owning word list.
//!
//! # Invariants
//! - Every mutation opens an `IMMEDIATE` transaction, resolves ownership
//!   inside it, and only then writes. A denied check leaves no trace.
//! - `list_id` is never updated.
//! - Card listings are ordered `created_at ASC, id ASC`.

use crate::model::card::{Card, CardDraft};
use crate::model::ids::{CardId, ListId, UserId};
use crate::ownership::{EntityRef, OwnershipResolver};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const CARD_SELECT_SQL: &str = "SELECT
    id,
    list_id,
    front,
    front_example,
    back,
    created_at,
    updated_at
FROM cards";

/// Repository interface for owner-guarded card operations.
pub trait CardRepository {
    /// Creates a card in `list_id` when `owner` owns that list.
    fn create_card(&mut self, owner: UserId, list_id: ListId, draft: &CardDraft)
        -> RepoResult<Card>;
    /// Replaces card text when `owner` owns the card's list.
    fn update_card(&mut self, owner: UserId, card_id: CardId, draft: &CardDraft)
        -> RepoResult<Card>;
    /// Deletes a card when `owner` owns the card's list.
    fn delete_card(&mut self, owner: UserId, card_id: CardId) -> RepoResult<()>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn create_card(
        &mut self,
        owner: UserId,
        list_id: ListId,
        draft: &CardDraft,
    ) -> RepoResult<Card> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        OwnershipResolver::new(&tx).require_word_list(owner, list_id)?;

        tx.execute(
            "INSERT INTO cards (list_id, front, front_example, back)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                list_id,
                draft.front.as_str(),
                draft.front_example.as_deref(),
                draft.back.as_str(),
            ],
        )?;
        let card_id = CardId(tx.last_insert_rowid());
        let card = load_card(&tx, card_id)?.ok_or(RepoError::NotFound(EntityRef::Card(card_id)))?;

        tx.commit()?;
        Ok(card)
    }

    fn update_card(
        &mut self,
        owner: UserId,
        card_id: CardId,
        draft: &CardDraft,
    ) -> RepoResult<Card> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        OwnershipResolver::new(&tx).require_card(owner, card_id)?;

        let changed = tx.execute(
            "UPDATE cards
             SET
                front = ?2,
                front_example = ?3,
                back = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                card_id,
                draft.front.as_str(),
                draft.front_example.as_deref(),
                draft.back.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Card(card_id)));
        }
        let card = load_card(&tx, card_id)?.ok_or(RepoError::NotFound(EntityRef::Card(card_id)))?;

        tx.commit()?;
        Ok(card)
    }

    fn delete_card(&mut self, owner: UserId, card_id: CardId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        OwnershipResolver::new(&tx).require_card(owner, card_id)?;

        let changed = tx.execute("DELETE FROM cards WHERE id = ?1;", [card_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Card(card_id)));
        }

        tx.commit()?;
        Ok(())
    }
}

/// Loads all cards of one list, oldest first. Callers must have authorized
/// access to the list already.
pub(crate) fn load_cards_for_list(conn: &Connection, list_id: ListId) -> RepoResult<Vec<Card>> {
    let mut stmt = conn.prepare(&format!(
        "{CARD_SELECT_SQL}
         WHERE list_id = ?1
         ORDER BY created_at ASC, id ASC;"
    ))?;
    let mut rows = stmt.query([list_id])?;
    let mut cards = Vec::new();
    while let Some(row) = rows.next()? {
        cards.push(parse_card_row(row)?);
    }
    Ok(cards)
}

fn load_card(conn: &Connection, card_id: CardId) -> RepoResult<Option<Card>> {
    let card = conn
        .query_row(
            &format!("{CARD_SELECT_SQL} WHERE id = ?1;"),
            [card_id],
            parse_card_row,
        )
        .optional()?;
    Ok(card)
}

fn parse_card_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get("id")?,
        list_id: row.get("list_id")?,
        front: row.get("front")?,
        front_example: row.get("front_example")?,
        back: row.get("back")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
