//! Database migrations for the Level schema
//!
//! Provides versioned migrations. Each migration is applied atomically and
//! tracked in the schema_version table.

use super::StorageError;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::core_space::types::Timestamp;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Column SQLite reports when the partial index on OPEN group names trips
pub const GROUPS_OPEN_NAME_KEY: &str = "groups.name_key";
/// Column SQLite reports when the case-folded email index trips
pub const USERS_EMAIL_KEY: &str = "users.email_key";
pub const SPACES_SLUG_INDEX: &str = "spaces_lower_slug_index";
/// Column prefix SQLite reports for the (space_id, user_id) unique index
pub const SPACE_USERS_PAIR: &str = "space_users.space_id";
/// Column prefix SQLite reports for the (space_user_id, group_id) unique index
pub const GROUP_USERS_PAIR: &str = "group_users.space_user_id";

/// Migration descriptor
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub up_sql: &'static str,
}

/// All available migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial users, spaces, groups and posts schema",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                email_key TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'ACTIVE' CHECK(state IN ('ACTIVE', 'DISABLED')),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS users_email_key_index ON users (email_key);

            CREATE TABLE IF NOT EXISTS spaces (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'ACTIVE' CHECK(state IN ('ACTIVE', 'DISABLED')),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS spaces_lower_slug_index ON spaces (lower(slug));

            CREATE TABLE IF NOT EXISTS space_users (
                id TEXT PRIMARY KEY,
                space_id TEXT NOT NULL REFERENCES spaces(id),
                user_id TEXT NOT NULL REFERENCES users(id),
                role TEXT NOT NULL CHECK(role IN ('OWNER', 'ADMIN', 'MEMBER')),
                state TEXT NOT NULL DEFAULT 'ACTIVE' CHECK(state IN ('ACTIVE', 'DISABLED')),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS space_users_space_id_user_id_index
                ON space_users (space_id, user_id);
            CREATE INDEX IF NOT EXISTS space_users_user_id_index ON space_users (user_id);

            CREATE TABLE IF NOT EXISTS groups (
                id TEXT PRIMARY KEY,
                space_id TEXT NOT NULL REFERENCES spaces(id),
                creator_id TEXT NOT NULL REFERENCES space_users(id),
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                description TEXT,
                is_private INTEGER NOT NULL DEFAULT 0,
                state TEXT NOT NULL DEFAULT 'OPEN' CHECK(state IN ('OPEN', 'CLOSED')),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS groups_space_id_index ON groups (space_id);
            CREATE UNIQUE INDEX IF NOT EXISTS groups_space_id_name_key_index
                ON groups (space_id, name_key)
                WHERE state = 'OPEN';

            CREATE TABLE IF NOT EXISTS group_users (
                id TEXT PRIMARY KEY,
                space_id TEXT NOT NULL REFERENCES spaces(id),
                group_id TEXT NOT NULL REFERENCES groups(id),
                space_user_id TEXT NOT NULL REFERENCES space_users(id),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS group_users_space_user_id_group_id_index
                ON group_users (space_user_id, group_id);
            CREATE INDEX IF NOT EXISTS group_users_group_id_index ON group_users (group_id);

            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                space_id TEXT NOT NULL REFERENCES spaces(id),
                space_user_id TEXT NOT NULL REFERENCES space_users(id),
                body TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'OPEN' CHECK(state IN ('OPEN', 'CLOSED')),
                inserted_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS posts_space_id_inserted_at_index
                ON posts (space_id, inserted_at);
        "#,
    }]
}

fn ensure_version_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get current schema version from database
pub fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    ensure_version_table(conn)?;

    let version = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Run all pending migrations
pub fn migrate(pool: &Pool<SqliteConnectionManager>) -> Result<(), StorageError> {
    let mut conn = pool.get()?;
    let current_version = get_current_version(&conn)?;

    let pending: Vec<_> = get_migrations()
        .into_iter()
        .filter(|m| m.version > current_version)
        .collect();

    for migration in pending {
        let version = migration.version;
        let apply = |conn: &mut Connection| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute_batch(migration.up_sql)?;
            tx.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                params![version, Timestamp::now()],
            )?;
            tx.commit()
        };

        apply(&mut conn).map_err(|source| StorageError::Migration { version, source })?;

        info!(
            version,
            description = migration.description,
            "Applied schema migration"
        );
    }

    Ok(())
}

/// Get the latest migration version available
pub fn get_latest_version() -> i32 {
    get_migrations().iter().map(|m| m.version).max().unwrap_or(0)
}
