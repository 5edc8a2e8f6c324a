//! Storage error types

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Migration v{version} failed: {source}")]
    Migration {
        version: i32,
        #[source]
        source: rusqlite::Error,
    },
}

impl StorageError {
    /// The constraint description SQLite reported for a UNIQUE violation.
    ///
    /// Column constraints read like `group_users.space_user_id, group_users.group_id`,
    /// expression indexes like `index 'groups_space_id_lower_name_index'`.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            StorageError::Database(rusqlite::Error::SqliteFailure(err, Some(message)))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                message.strip_prefix("UNIQUE constraint failed: ")
            }
            _ => None,
        }
    }

    /// Whether this is a UNIQUE violation mentioning `marker`
    pub fn violates(&self, marker: &str) -> bool {
        self.unique_violation()
            .is_some_and(|constraint| constraint.contains(marker))
    }
}
