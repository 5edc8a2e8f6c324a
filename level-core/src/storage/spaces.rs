//! Row-level statements for users, spaces, space users and posts

use super::StorageError;
use crate::core_space::post::Post;
use crate::core_space::space::{Space, SpaceUser};
use crate::core_space::types::{SpaceId, UserId};
use crate::core_space::user::User;
use crate::validation::case_key;
use rusqlite::{params, Connection, OptionalExtension, Row};

// ===== Users =====

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, state, inserted_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        password_hash: row.get("password_hash")?,
        state: row.get("state")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO users (id, email, email_key, first_name, last_name, password_hash, state, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user.id,
            user.email,
            case_key(&user.email),
            user.first_name,
            user.last_name,
            user.password_hash,
            user.state,
            user.inserted_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn email_taken(conn: &Connection, email: &str) -> Result<bool, StorageError> {
    Ok(find_user_by_email(conn, email)?.is_some())
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email_key = ?1");
    Ok(conn
        .query_row(&sql, params![case_key(email.trim())], user_from_row)
        .optional()?)
}

// ===== Spaces =====

const SPACE_COLUMNS: &str = "id, name, slug, state, inserted_at, updated_at";

fn space_from_row(row: &Row<'_>) -> rusqlite::Result<Space> {
    Ok(Space {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        state: row.get("state")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_space(conn: &Connection, space: &Space) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO spaces (id, name, slug, state, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            space.id,
            space.name,
            space.slug,
            space.state,
            space.inserted_at,
            space.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_space_by_slug(conn: &Connection, slug: &str) -> Result<Option<Space>, StorageError> {
    let sql = format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE lower(slug) = lower(?1)");
    Ok(conn.query_row(&sql, params![slug], space_from_row).optional()?)
}

// ===== Space users =====

const SPACE_USER_COLUMNS: &str = "id, space_id, user_id, role, state, inserted_at, updated_at";

fn space_user_from_row(row: &Row<'_>) -> rusqlite::Result<SpaceUser> {
    Ok(SpaceUser {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        user_id: row.get("user_id")?,
        role: row.get("role")?,
        state: row.get("state")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_space_user(conn: &Connection, space_user: &SpaceUser) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO space_users (id, space_id, user_id, role, state, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            space_user.id,
            space_user.space_id,
            space_user.user_id,
            space_user.role,
            space_user.state,
            space_user.inserted_at,
            space_user.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_space_user(
    conn: &Connection,
    space_id: &SpaceId,
    user_id: &UserId,
) -> Result<Option<SpaceUser>, StorageError> {
    let sql = format!(
        "SELECT {SPACE_USER_COLUMNS} FROM space_users WHERE space_id = ?1 AND user_id = ?2"
    );
    Ok(conn
        .query_row(&sql, params![space_id, user_id], space_user_from_row)
        .optional()?)
}

// ===== Posts =====

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        space_user_id: row.get("space_user_id")?,
        body: row.get("body")?,
        state: row.get("state")?,
        inserted_at: row.get("inserted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_post(conn: &Connection, post: &Post) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO posts (id, space_id, space_user_id, body, state, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            post.id,
            post.space_id,
            post.space_user_id,
            post.body,
            post.state,
            post.inserted_at,
            post.updated_at,
        ],
    )?;
    Ok(())
}

/// Posts in a space, newest first
pub fn list_space_posts(conn: &Connection, space_id: &SpaceId) -> Result<Vec<Post>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, space_id, space_user_id, body, state, inserted_at, updated_at
         FROM posts WHERE space_id = ?1
         ORDER BY inserted_at DESC, rowid DESC",
    )?;

    let posts = stmt
        .query_map(params![space_id], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(posts)
}
