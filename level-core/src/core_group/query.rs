//! Visibility-scoped group queries
//!
//! A `GroupQuery` is a value describing which groups to load for a
//! requesting space user; nothing touches the database until `fetch_all`.
//! Every query starts from a `VisibilityFilter`, so the listing and the
//! single-group lookup share one definition of "visible".

use super::group::{Group, GroupState};
use crate::core_space::space::SpaceUser;
use crate::core_space::types::{GroupId, SpaceId, SpaceUserId};
use crate::storage::groups::{group_from_row, GROUP_COLUMNS};
use crate::storage::StorageError;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Predicate: same space as the requester, and public or joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter {
    space_id: SpaceId,
    space_user_id: SpaceUserId,
}

impl VisibilityFilter {
    pub fn for_space_user(requester: &SpaceUser) -> Self {
        VisibilityFilter {
            space_id: requester.space_id,
            space_user_id: requester.id,
        }
    }

    /// SQL condition over the groups table aliased as `alias`, with its
    /// positional parameters in order.
    pub fn to_sql(&self, alias: &str) -> (String, Vec<Value>) {
        let sql = format!(
            "{alias}.space_id = ? AND ({alias}.is_private = 0 OR EXISTS (
                SELECT 1 FROM group_users gu
                WHERE gu.group_id = {alias}.id AND gu.space_user_id = ?))"
        );
        let params = vec![
            Value::Text(self.space_id.to_string()),
            Value::Text(self.space_user_id.to_string()),
        ];
        (sql, params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Case-insensitive name, oldest first on ties
    Name,
    /// Newest first
    Newest,
}

/// Composable query over the groups a space user may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    visibility: VisibilityFilter,
    id: Option<GroupId>,
    state: Option<GroupState>,
    order: Option<GroupOrder>,
    limit: Option<u32>,
}

impl GroupQuery {
    /// All groups `requester` is authorized to see, unordered
    pub fn visible_to(requester: &SpaceUser) -> Self {
        GroupQuery {
            visibility: VisibilityFilter::for_space_user(requester),
            id: None,
            state: None,
            order: None,
            limit: None,
        }
    }

    pub fn with_id(mut self, id: GroupId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_state(mut self, state: GroupState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn order_by(mut self, order: GroupOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn visibility(&self) -> &VisibilityFilter {
        &self.visibility
    }

    /// Render the SELECT statement and its positional parameters
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let (visible, mut params) = self.visibility.to_sql("g");
        let mut conditions = vec![visible];

        if let Some(id) = self.id {
            conditions.push("g.id = ?".to_string());
            params.push(Value::Text(id.to_string()));
        }
        if let Some(state) = self.state {
            conditions.push("g.state = ?".to_string());
            params.push(Value::Text(state.as_str().to_string()));
        }

        let columns = GROUP_COLUMNS
            .split(", ")
            .map(|column| format!("g.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "SELECT {columns} FROM groups g WHERE {}",
            conditions.join(" AND ")
        );

        match self.order {
            Some(GroupOrder::Name) => sql.push_str(" ORDER BY g.name_key, g.inserted_at"),
            Some(GroupOrder::Newest) => sql.push_str(" ORDER BY g.inserted_at DESC, g.rowid DESC"),
            None => {}
        }
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(limit)));
        }

        (sql, params)
    }

    /// Execute the query
    pub fn fetch_all(&self, conn: &Connection) -> Result<Vec<Group>, StorageError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare(&sql)?;

        let groups = stmt
            .query_map(params_from_iter(params.iter()), group_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(groups)
    }
}
