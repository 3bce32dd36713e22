//! Ownership resolution over the user → word list → card chain.
//!
//! # Responsibility
//! - Answer "does user U own entity E" with a tagged [`Ownership`] result.
//! - Provide a guard that turns anything but `Owned` into a denial before a
//!   caller is allowed to mutate or disclose the entity.
//!
//! # Invariants
//! - Card ownership is derived through the owning list on every check; nothing
//!   is cached between calls.
//! - Resolution is read-only. Callers run it inside the same transaction as the
//!   mutation it guards.

use crate::model::ids::{CardId, ListId, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};
use std::fmt::{Display, Formatter};

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The entity exists and belongs to the asking user.
    Owned,
    /// The entity exists and belongs to someone else.
    NotOwned,
    /// No such entity.
    NotFound,
}

impl Ownership {
    fn from_owner(owner: Option<UserId>, user: UserId) -> Self {
        match owner {
            Some(owner) if owner == user => Self::Owned,
            Some(_) => Self::NotOwned,
            None => Self::NotFound,
        }
    }

    pub fn is_owned(self) -> bool {
        matches!(self, Self::Owned)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::NotOwned => "not_owned",
            Self::NotFound => "not_found",
        }
    }
}

/// Reference to a guarded entity, used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    User(UserId),
    WordList(ListId),
    Card(CardId),
}

impl EntityRef {
    pub fn kind(self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::WordList(_) => "word_list",
            Self::Card(_) => "card",
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::WordList(id) => write!(f, "word_list:{id}"),
            Self::Card(id) => write!(f, "card:{id}"),
        }
    }
}

/// Resolved parent chain of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardChain {
    pub card_id: CardId,
    pub list_id: ListId,
    pub owner: UserId,
}

/// Read-only ownership checks bound to one connection or transaction.
pub struct OwnershipResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> OwnershipResolver<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Resolves ownership of a word list from its stored `user_id`.
    pub fn word_list(&self, user: UserId, list_id: ListId) -> RepoResult<Ownership> {
        let owner = self
            .conn
            .query_row(
                "SELECT user_id FROM word_lists WHERE id = ?1;",
                [list_id],
                |row| row.get::<_, UserId>(0),
            )
            .optional()?;
        Ok(Ownership::from_owner(owner, user))
    }

    /// Resolves ownership of a card through the list it belongs to.
    pub fn card(&self, user: UserId, card_id: CardId) -> RepoResult<Ownership> {
        let chain = self.card_chain(card_id)?;
        Ok(Ownership::from_owner(chain.map(|chain| chain.owner), user))
    }

    /// Loads the card → list → user chain, or `None` when the card is absent.
    pub fn card_chain(&self, card_id: CardId) -> RepoResult<Option<CardChain>> {
        let chain = self
            .conn
            .query_row(
                "SELECT c.list_id, wl.user_id
                 FROM cards c
                 INNER JOIN word_lists wl ON wl.id = c.list_id
                 WHERE c.id = ?1;",
                [card_id],
                |row| {
                    Ok(CardChain {
                        card_id,
                        list_id: row.get(0)?,
                        owner: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(chain)
    }

    /// Fails with [`RepoError::Denied`] unless `user` owns the word list.
    pub fn require_word_list(&self, user: UserId, list_id: ListId) -> RepoResult<()> {
        let ownership = self.word_list(user, list_id)?;
        deny_unless_owned(EntityRef::WordList(list_id), ownership)
    }

    /// Fails with [`RepoError::Denied`] unless `user` owns the card; returns
    /// the resolved chain on success.
    pub fn require_card(&self, user: UserId, card_id: CardId) -> RepoResult<CardChain> {
        let chain = self.card_chain(card_id)?;
        let ownership = Ownership::from_owner(chain.map(|chain| chain.owner), user);
        deny_unless_owned(EntityRef::Card(card_id), ownership)?;
        chain.ok_or(RepoError::Denied {
            entity: EntityRef::Card(card_id),
            ownership: Ownership::NotFound,
        })
    }
}

fn deny_unless_owned(entity: EntityRef, ownership: Ownership) -> RepoResult<()> {
    if ownership.is_owned() {
        Ok(())
    } else {
        Err(RepoError::Denied { entity, ownership })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityRef, Ownership, OwnershipResolver};
    use crate::db::open_db_in_memory;
    use crate::model::ids::{CardId, ListId, UserId};
    use crate::repo::RepoError;
    use rusqlite::{params, Connection};

    fn seed(conn: &Connection) -> (UserId, UserId, ListId, CardId) {
        conn.execute_batch(
            "INSERT INTO users (username, email, password_hash) VALUES ('alice', 'a@x.com', 'h');
             INSERT INTO users (username, email, password_hash) VALUES ('bob', 'b@x.com', 'h');",
        )
        .unwrap();
        let alice = UserId(1);
        let bob = UserId(2);
        conn.execute(
            "INSERT INTO word_lists (user_id, title) VALUES (?1, 'Spanish');",
            params![alice],
        )
        .unwrap();
        let list = ListId(conn.last_insert_rowid());
        conn.execute(
            "INSERT INTO cards (list_id, front, back) VALUES (?1, 'hola', 'hello');",
            params![list],
        )
        .unwrap();
        let card = CardId(conn.last_insert_rowid());
        (alice, bob, list, card)
    }

    #[test]
    fn word_list_resolution_distinguishes_all_three_outcomes() {
        let conn = open_db_in_memory().unwrap();
        let (alice, bob, list, _) = seed(&conn);
        let resolver = OwnershipResolver::new(&conn);

        assert_eq!(resolver.word_list(alice, list).unwrap(), Ownership::Owned);
        assert_eq!(resolver.word_list(bob, list).unwrap(), Ownership::NotOwned);
        assert_eq!(
            resolver.word_list(alice, ListId(999)).unwrap(),
            Ownership::NotFound
        );
    }

    #[test]
    fn card_resolution_walks_through_owning_list() {
        let conn = open_db_in_memory().unwrap();
        let (alice, bob, list, card) = seed(&conn);
        let resolver = OwnershipResolver::new(&conn);

        assert_eq!(resolver.card(alice, card).unwrap(), Ownership::Owned);
        assert_eq!(resolver.card(bob, card).unwrap(), Ownership::NotOwned);
        assert_eq!(resolver.card(alice, CardId(999)).unwrap(), Ownership::NotFound);

        let chain = resolver.require_card(alice, card).unwrap();
        assert_eq!(chain.list_id, list);
        assert_eq!(chain.owner, alice);
    }

    #[test]
    fn card_resolution_is_not_cached_across_list_deletion() {
        let conn = open_db_in_memory().unwrap();
        let (alice, _, list, card) = seed(&conn);
        let resolver = OwnershipResolver::new(&conn);
        assert!(resolver.card(alice, card).unwrap().is_owned());

        conn.execute("DELETE FROM word_lists WHERE id = ?1;", [list])
            .unwrap();
        assert_eq!(resolver.card(alice, card).unwrap(), Ownership::NotFound);
    }

    #[test]
    fn require_reports_denied_entity_and_outcome() {
        let conn = open_db_in_memory().unwrap();
        let (_, bob, list, card) = seed(&conn);
        let resolver = OwnershipResolver::new(&conn);

        match resolver.require_word_list(bob, list).unwrap_err() {
            RepoError::Denied { entity, ownership } => {
                assert_eq!(entity, EntityRef::WordList(list));
                assert_eq!(ownership, Ownership::NotOwned);
            }
            other => panic!("unexpected error: {other}"),
        }

        match resolver.require_card(bob, CardId(card.get() + 100)).unwrap_err() {
            RepoError::Denied { ownership, .. } => assert_eq!(ownership, Ownership::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }
}
