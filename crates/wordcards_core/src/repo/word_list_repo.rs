//! Word list repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `word_lists`.
//! - Load a list together with its cards in one read transaction.
//!
//! # Invariants
//! - Every statement targeting an existing list filters on `id AND user_id`;
//!   a foreign list is indistinguishable from a missing one.
//! - Owner listings are ordered `created_at DESC, id DESC`.
//! - Deleting a list leaves child cards to the `ON DELETE CASCADE` foreign key.

use crate::model::ids::{ListId, UserId};
use crate::model::word_list::{WordList, WordListDetail, WordListDraft};
use crate::ownership::EntityRef;
use crate::repo::card_repo::load_cards_for_list;
use crate::repo::{ensure_schema_ready, is_foreign_key_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const WORD_LIST_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    created_at,
    updated_at
FROM word_lists";

/// Repository interface for owner-scoped word list operations.
pub trait WordListRepository {
    /// Creates a list owned by `owner`.
    fn create_word_list(&mut self, owner: UserId, draft: &WordListDraft) -> RepoResult<WordList>;
    /// Lists every list owned by `owner`, newest first.
    fn list_word_lists(&self, owner: UserId) -> RepoResult<Vec<WordList>>;
    /// Gets one owned list with its cards.
    fn get_word_list_with_cards(
        &mut self,
        owner: UserId,
        list_id: ListId,
    ) -> RepoResult<Option<WordListDetail>>;
    /// Replaces title/description of an owned list.
    fn update_word_list(
        &mut self,
        owner: UserId,
        list_id: ListId,
        draft: &WordListDraft,
    ) -> RepoResult<WordList>;
    /// Deletes an owned list and, by cascade, its cards.
    fn delete_word_list(&mut self, owner: UserId, list_id: ListId) -> RepoResult<()>;
}

/// SQLite-backed word list repository.
pub struct SqliteWordListRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteWordListRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl WordListRepository for SqliteWordListRepository<'_> {
    fn create_word_list(&mut self, owner: UserId, draft: &WordListDraft) -> RepoResult<WordList> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT INTO word_lists (user_id, title, description) VALUES (?1, ?2, ?3);",
            params![owner, draft.title.as_str(), draft.description.as_deref()],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(RepoError::NotFound(EntityRef::User(owner)));
            }
            Err(err) => return Err(err.into()),
        }

        let list_id = ListId(tx.last_insert_rowid());
        let list = load_owned_list(&tx, owner, list_id)?
            .ok_or(RepoError::NotFound(EntityRef::WordList(list_id)))?;

        tx.commit()?;
        Ok(list)
    }

    fn list_word_lists(&self, owner: UserId) -> RepoResult<Vec<WordList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORD_LIST_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([owner])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_word_list_row(row)?);
        }
        Ok(lists)
    }

    fn get_word_list_with_cards(
        &mut self,
        owner: UserId,
        list_id: ListId,
    ) -> RepoResult<Option<WordListDetail>> {
        // Deferred read transaction: list and cards come from one snapshot.
        let tx = self.conn.transaction()?;
        let Some(list) = load_owned_list(&tx, owner, list_id)? else {
            return Ok(None);
        };
        let cards = load_cards_for_list(&tx, list_id)?;
        tx.commit()?;

        Ok(Some(WordListDetail { list, cards }))
    }

    fn update_word_list(
        &mut self,
        owner: UserId,
        list_id: ListId,
        draft: &WordListDraft,
    ) -> RepoResult<WordList> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE word_lists
             SET
                title = ?3,
                description = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                list_id,
                owner,
                draft.title.as_str(),
                draft.description.as_deref()
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::WordList(list_id)));
        }

        let list = load_owned_list(&tx, owner, list_id)?
            .ok_or(RepoError::NotFound(EntityRef::WordList(list_id)))?;
        tx.commit()?;
        Ok(list)
    }

    fn delete_word_list(&mut self, owner: UserId, list_id: ListId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM word_lists WHERE id = ?1 AND user_id = ?2;",
            params![list_id, owner],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::WordList(list_id)));
        }
        Ok(())
    }
}

fn load_owned_list(
    conn: &Connection,
    owner: UserId,
    list_id: ListId,
) -> RepoResult<Option<WordList>> {
    let list = conn
        .query_row(
            &format!("{WORD_LIST_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"),
            params![list_id, owner],
            parse_word_list_row,
        )
        .optional()?;
    Ok(list)
}

fn parse_word_list_row(row: &Row<'_>) -> rusqlite::Result<WordList> {
    Ok(WordList {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
