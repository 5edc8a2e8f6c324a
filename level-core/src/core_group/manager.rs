//! Manager trait for Group operations

use super::group::{Group, GroupError, GroupUser, NewGroup};
use super::query::GroupQuery;
use crate::core_space::space::SpaceUser;

/// Manager for Group operations
pub trait GroupManager {
    /// Query for every group `requester` may see. Not executed.
    fn list_groups_query(&self, requester: &SpaceUser) -> GroupQuery;

    /// Execute a group query
    fn list_groups(&self, query: &GroupQuery) -> Result<Vec<Group>, GroupError>;

    /// Look up a visible group by identifier.
    ///
    /// Fails with `NotFound` for malformed identifiers, unknown groups, groups
    /// in other spaces and private groups the requester has not joined.
    fn get_group(&self, requester: &SpaceUser, group_id: &str) -> Result<Group, GroupError>;

    /// Create an open group and make the creator its first member
    fn create_group(&self, requester: &SpaceUser, params: NewGroup) -> Result<Group, GroupError>;

    /// Transition a group to CLOSED. Closing a closed group is a no-op.
    fn close_group(&self, group: &Group) -> Result<Group, GroupError>;

    /// Membership of `space_user` in `group`
    fn get_group_membership(
        &self,
        group: &Group,
        space_user: &SpaceUser,
    ) -> Result<GroupUser, GroupError>;

    /// Add `space_user` to `group`
    fn create_group_membership(
        &self,
        group: &Group,
        space_user: &SpaceUser,
    ) -> Result<GroupUser, GroupError>;

    /// Memberships of a group, oldest first
    fn list_group_members(&self, group: &Group) -> Result<Vec<GroupUser>, GroupError>;
}
