//! Async Group manager
//!
//! Wraps the synchronous `GroupManagerImpl` so async callers never run
//! SQLite work on a runtime worker thread.

use super::group::{Group, GroupError, GroupUser, NewGroup};
use super::manager::GroupManager;
use super::manager_impl::GroupManagerImpl;
use super::query::GroupQuery;
use crate::core_space::space::SpaceUser;
use crate::storage::SqlStore;
use std::sync::Arc;

/// Async facade over the group manager
#[derive(Clone)]
pub struct AsyncGroupManager {
    manager: Arc<GroupManagerImpl>,
}

impl AsyncGroupManager {
    pub fn new(store: SqlStore) -> Self {
        Self {
            manager: Arc::new(GroupManagerImpl::new(store)),
        }
    }

    /// Run a blocking manager call on the blocking thread pool
    async fn run<T, F>(&self, f: F) -> Result<T, GroupError>
    where
        T: Send + 'static,
        F: FnOnce(&GroupManagerImpl) -> Result<T, GroupError> + Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        tokio::task::spawn_blocking(move || f(&manager)).await?
    }

    /// Build the visibility query for a requester. Never blocks.
    pub fn list_groups_query(&self, requester: &SpaceUser) -> GroupQuery {
        self.manager.list_groups_query(requester)
    }

    pub async fn list_groups(&self, query: GroupQuery) -> Result<Vec<Group>, GroupError> {
        self.run(move |m| m.list_groups(&query)).await
    }

    pub async fn get_group(
        &self,
        requester: SpaceUser,
        group_id: String,
    ) -> Result<Group, GroupError> {
        self.run(move |m| m.get_group(&requester, &group_id)).await
    }

    pub async fn create_group(
        &self,
        requester: SpaceUser,
        params: NewGroup,
    ) -> Result<Group, GroupError> {
        self.run(move |m| m.create_group(&requester, params)).await
    }

    pub async fn close_group(&self, group: Group) -> Result<Group, GroupError> {
        self.run(move |m| m.close_group(&group)).await
    }

    pub async fn get_group_membership(
        &self,
        group: Group,
        space_user: SpaceUser,
    ) -> Result<GroupUser, GroupError> {
        self.run(move |m| m.get_group_membership(&group, &space_user))
            .await
    }

    pub async fn create_group_membership(
        &self,
        group: Group,
        space_user: SpaceUser,
    ) -> Result<GroupUser, GroupError> {
        self.run(move |m| m.create_group_membership(&group, &space_user))
            .await
    }

    pub async fn list_group_members(&self, group: Group) -> Result<Vec<GroupUser>, GroupError> {
        self.run(move |m| m.list_group_members(&group)).await
    }
}
