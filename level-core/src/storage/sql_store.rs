//! Pooled SQLite store

use super::migrations::migrate;
use super::StorageError;
use crate::config::StoreConfig;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Duration;
use tracing::debug;

/// SQLite connection pool with the Level schema applied
#[derive(Clone)]
pub struct SqlStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqlStore {
    /// Wrap an existing pool, running any pending migrations
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Result<Self, StorageError> {
        migrate(&pool)?;
        Ok(Self { pool })
    }

    /// Open the database file named in the store configuration
    pub fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        debug!(path = %config.database_path.display(), "Opening database");

        let manager = with_pragmas(
            SqliteConnectionManager::file(&config.database_path),
            config.busy_timeout,
        );
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)?;

        Self::new(pool)
    }

    /// Create a new in-memory store.
    ///
    /// Every in-memory connection is its own database, so the pool holds a
    /// single connection.
    pub fn memory() -> Result<Self, StorageError> {
        let manager = with_pragmas(SqliteConnectionManager::memory(), Duration::from_secs(5));
        let pool = Pool::builder().max_size(1).build(manager)?;

        Self::new(pool)
    }

    /// Check out a connection from the pool
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        Ok(self.pool.get()?)
    }

    /// Run `f` against a single pooled connection
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StorageError>,
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let conn = self.connection()?;
        f(&conn)
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any error rolls
    /// back every statement `f` executed.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StorageError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let mut conn = self.connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;

        let value = f(&tx)?;
        tx.commit().map_err(StorageError::from)?;

        Ok(value)
    }
}

fn with_pragmas(manager: SqliteConnectionManager, busy_timeout: Duration) -> SqliteConnectionManager {
    manager.with_init(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_has_schema() {
        let store = SqlStore::memory().unwrap();

        let count: i64 = store
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM groups", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let store = SqlStore::memory().unwrap();

        let result: Result<usize, StorageError> = store.transaction(|tx| {
            tx.execute(
                "INSERT INTO space_users (id, space_id, user_id, role, inserted_at, updated_at)
                 VALUES ('su', 'missing-space', 'missing-user', 'MEMBER', 0, 0)",
                [],
            )
            .map_err(StorageError::from)
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let store = SqlStore::memory().unwrap();

        let result: Result<(), StorageError> = store.transaction(|tx| {
            tx.execute(
                "INSERT INTO spaces (id, name, slug, inserted_at, updated_at)
                 VALUES ('s1', 'Level', 'level', 0, 0)",
                [],
            )?;
            // Same slug, different case: trips the unique index
            tx.execute(
                "INSERT INTO spaces (id, name, slug, inserted_at, updated_at)
                 VALUES ('s2', 'Level', 'LEVEL', 0, 0)",
                [],
            )?;
            Ok(())
        });
        assert!(result.is_err());

        let count: i64 = store
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM spaces", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            database_path: dir.path().join("level.db"),
            ..StoreConfig::default()
        };

        let store = SqlStore::open(&config).unwrap();
        drop(store);

        // Reopening applies no migration twice
        let store = SqlStore::open(&config).unwrap();
        let version = store
            .read(|conn| super::super::migrations::get_current_version(conn))
            .unwrap();
        assert_eq!(version, super::super::migrations::CURRENT_SCHEMA_VERSION);
    }
}
