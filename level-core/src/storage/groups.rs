//! Row-level statements for groups and group memberships

use super::StorageError;
use crate::core_group::group::{Group, GroupState, GroupUser};
use crate::core_space::types::{GroupId, SpaceId, SpaceUserId};
use crate::validation::case_key;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub const GROUP_COLUMNS: &str =
    "id, space_id, creator_id, name, description, is_private, state, inserted_at, updated_at";

pub fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        creator_id: row.get("creator_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_private: row.get("is_private")?,
        state: row.get("state")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_group(conn: &Connection, group: &Group) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO groups (id, space_id, creator_id, name, name_key, description, is_private, state, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            group.id,
            group.space_id,
            group.creator_id,
            group.name,
            case_key(&group.name),
            group.description,
            group.is_private,
            group.state,
            group.inserted_at,
            group.updated_at,
        ],
    )?;
    Ok(())
}

/// Whether an OPEN group in `space_id` already uses `name`, ignoring case
pub fn open_name_taken(
    conn: &Connection,
    space_id: &SpaceId,
    name: &str,
) -> Result<bool, StorageError> {
    let exists = conn.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM groups
            WHERE space_id = ?1 AND name_key = ?2 AND state = ?3)",
        params![space_id, case_key(name), GroupState::Open],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Persist a state change. Returns the number of rows touched.
pub fn update_group_state(conn: &Connection, group: &Group) -> Result<usize, StorageError> {
    let rows = conn.execute(
        "UPDATE groups SET state = ?1, updated_at = ?2 WHERE id = ?3",
        params![group.state, group.updated_at, group.id],
    )?;
    Ok(rows)
}

// ===== Group users =====

const GROUP_USER_COLUMNS: &str = "id, space_id, group_id, space_user_id, inserted_at, updated_at";

fn group_user_from_row(row: &Row<'_>) -> rusqlite::Result<GroupUser> {
    Ok(GroupUser {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        group_id: row.get("group_id")?,
        space_user_id: row.get("space_user_id")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_group_user(conn: &Connection, group_user: &GroupUser) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO group_users (id, space_id, group_id, space_user_id, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            group_user.id,
            group_user.space_id,
            group_user.group_id,
            group_user.space_user_id,
            group_user.inserted_at,
            group_user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_group_user(
    conn: &Connection,
    group_id: &GroupId,
    space_user_id: &SpaceUserId,
) -> Result<Option<GroupUser>, StorageError> {
    let sql = format!(
        "SELECT {GROUP_USER_COLUMNS} FROM group_users WHERE group_id = ?1 AND space_user_id = ?2"
    );
    Ok(conn
        .query_row(&sql, params![group_id, space_user_id], group_user_from_row)
        .optional()?)
}

/// Memberships of a group, oldest first
pub fn list_group_users(conn: &Connection, group_id: &GroupId) -> Result<Vec<GroupUser>, StorageError> {
    let sql = format!(
        "SELECT {GROUP_USER_COLUMNS} FROM group_users WHERE group_id = ?1
         ORDER BY inserted_at, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;

    let members = stmt
        .query_map(params![group_id], group_user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(members)
}
