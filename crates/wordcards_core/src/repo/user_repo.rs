//! User account repository contracts and SQLite implementation.
//!
//! # Invariants
//! - The credential hash is written once and only read back through
//!   [`UserRepository::find_credentials`].
//! - A concurrent duplicate registration surfaces as `RepoError::Conflict`.

use crate::model::ids::UserId;
use crate::model::user::{NewUser, User};
use crate::ownership::EntityRef;
use crate::repo::{ensure_schema_ready, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, created_at FROM users";
const DUPLICATE_USER: &str = "username or email already exists";

/// Stored credentials for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Returns whether the username or the email is already taken.
    fn exists(&self, username: &str, email: &str) -> RepoResult<bool>;
    /// Inserts a new account with an already-hashed credential.
    fn create_user(&self, new_user: &NewUser, password_hash: &str) -> RepoResult<User>;
    /// Looks up an account and its credential hash by email.
    fn find_credentials(&self, email: &str) -> RepoResult<Option<StoredCredentials>>;
    /// Gets one account by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn exists(&self, username: &str, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM users WHERE username = ?1 OR email = ?2
            );",
            params![username, email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn create_user(&self, new_user: &NewUser, password_hash: &str) -> RepoResult<User> {
        new_user.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3);",
            params![
                new_user.username.as_str(),
                new_user.email.as_str(),
                password_hash
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::Conflict(DUPLICATE_USER));
            }
            Err(err) => return Err(err.into()),
        }

        let id = UserId(self.conn.last_insert_rowid());
        self.get_user(id)?
            .ok_or(RepoError::NotFound(EntityRef::User(id)))
    }

    fn find_credentials(&self, email: &str) -> RepoResult<Option<StoredCredentials>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, email, created_at, password_hash
                 FROM users
                 WHERE email = ?1;",
                [email],
                |row| {
                    Ok(StoredCredentials {
                        user: parse_user_row(row)?,
                        password_hash: row.get("password_hash")?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}
