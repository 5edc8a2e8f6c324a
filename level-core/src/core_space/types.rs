//! Type definitions shared by every Level entity

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

uuid_id!(
    /// Unique identifier for a User account
    UserId
);
uuid_id!(
    /// Unique identifier for a Space
    SpaceId
);
uuid_id!(
    /// Unique identifier for a user's identity inside one Space
    SpaceUserId
);
uuid_id!(
    /// Unique identifier for a Group
    GroupId
);
uuid_id!(
    /// Unique identifier for a Group membership row
    GroupUserId
);
uuid_id!(
    /// Unique identifier for a Post
    PostId
);

text_enum!(
    /// Lifecycle state of users, spaces and space memberships
    ActiveState {
        Active => "ACTIVE",
        Disabled => "DISABLED",
    }
);

text_enum!(
    /// Space-level roles
    SpaceRole {
        /// Full control, created the Space
        Owner => "OWNER",
        /// Can manage members and groups
        Admin => "ADMIN",
        /// Default role
        Member => "MEMBER",
    }
);

impl Default for ActiveState {
    fn default() -> Self {
        ActiveState::Active
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp representing the current time
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Create a timestamp from milliseconds since epoch
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Get milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(|millis| Timestamp(millis.max(0) as u64))
    }
}
