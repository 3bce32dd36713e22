//! Shared SQLite connection pool handle.
//!
//! # Responsibility
//! - Own the database location and a bounded set of idle connections.
//! - Hand out request-scoped connections that return themselves on drop.
//!
//! # Invariants
//! - The pool is an explicit handle created at startup; there is no global.
//! - Every connection handed out was produced by `open_db` (migrated, FK on).
//! - A shared in-memory database lives as long as the pool's anchor connection.

use super::open::open_db;
use super::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const DEFAULT_MAX_IDLE: usize = 8;

/// Where pooled connections point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// On-disk database file.
    File(PathBuf),
    /// Named shared-cache in-memory database, visible to every pooled connection.
    SharedMemory(String),
}

impl DbLocation {
    /// Returns a fresh, uniquely named shared in-memory location.
    pub fn shared_memory() -> Self {
        Self::SharedMemory(format!("wordcards-{}", Uuid::new_v4().simple()))
    }

    fn open(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => open_db(path),
            Self::SharedMemory(name) => open_db(format!("file:{name}?mode=memory&cache=shared")),
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::SharedMemory(_) => "shared_memory",
        }
    }
}

struct PoolInner {
    location: DbLocation,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
    // Keeps shared in-memory databases alive between requests.
    _anchor: Option<Mutex<Connection>>,
}

/// Cloneable handle over a set of SQLite connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Arc<PoolInner>,
}

impl DbPool {
    /// Opens the pool, eagerly bootstrapping one connection so schema errors
    /// surface at startup rather than on the first request.
    pub fn open(location: DbLocation, max_idle: usize) -> DbResult<Self> {
        let first = location.open()?;
        let max_idle = max_idle.max(1);

        let (anchor, idle) = match location {
            DbLocation::SharedMemory(_) => (Some(Mutex::new(first)), Vec::new()),
            DbLocation::File(_) => (None, vec![first]),
        };

        info!(
            "event=pool_open module=db status=ok mode={} max_idle={max_idle}",
            location.mode()
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                location,
                max_idle,
                idle: Mutex::new(idle),
                _anchor: anchor,
            }),
        })
    }

    /// Opens a pool over a private shared-cache in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Self::open(DbLocation::shared_memory(), DEFAULT_MAX_IDLE)
    }

    pub fn location(&self) -> &DbLocation {
        &self.inner.location
    }

    /// Checks out one connection, reusing an idle one when available.
    pub fn get(&self) -> DbResult<PooledConnection> {
        let reused = self
            .inner
            .idle
            .lock()
            .map_err(|_| DbError::PoolPoisoned)?
            .pop();

        let conn = match reused {
            Some(conn) => conn,
            None => {
                debug!(
                    "event=pool_grow module=db status=ok mode={}",
                    self.inner.location.mode()
                );
                self.inner.location.open()?
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        })
    }

    /// Number of connections currently parked in the idle list.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }
}

/// Connection checked out of a [`DbPool`]; returned to the idle list on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
            .as_ref()
            .expect("pooled connection is present until drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn
            .as_mut()
            .expect("pooled connection is present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if let Ok(mut idle) = self.pool.idle.lock() {
            if idle.len() < self.pool.max_idle {
                idle.push(conn);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DbLocation, DbPool};

    #[test]
    fn connections_return_to_idle_list_on_drop() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(pool.idle_count(), 0);

        {
            let _first = pool.get().unwrap();
            let _second = pool.get().unwrap();
        }
        assert_eq!(pool.idle_count(), 2);

        let _reused = pool.get().unwrap();
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn shared_memory_is_visible_across_pooled_connections() {
        let pool = DbPool::in_memory().unwrap();
        let writer = pool.get().unwrap();
        writer
            .execute(
                "INSERT INTO users (username, email, password_hash) VALUES ('a', 'a@x.com', 'h');",
                [],
            )
            .unwrap();

        let reader = pool.get().unwrap();
        let count: i64 = reader
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn shared_memory_locations_are_unique() {
        assert_ne!(DbLocation::shared_memory(), DbLocation::shared_memory());
    }
}
