//! Group manager backed by the SQL store

use super::group::{Group, GroupError, GroupUser, NewGroup};
use super::manager::GroupManager;
use super::query::GroupQuery;
use crate::core_space::space::SpaceUser;
use crate::core_space::types::GroupId;
use crate::metrics::{
    increment, GROUPS_CLOSED, GROUPS_CREATED, GROUP_MEMBERSHIPS_CREATED, GROUP_VALIDATION_FAILED,
};
use crate::storage::groups;
use crate::storage::migrations::{GROUPS_OPEN_NAME_KEY, GROUP_USERS_PAIR};
use crate::storage::{SqlStore, StorageError};
use crate::validation::{Step, ALREADY_MEMBER, NOT_IN_SPACE, TAKEN};
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Group manager with business logic
pub struct GroupManagerImpl {
    store: SqlStore,
}

impl GroupManagerImpl {
    pub fn new(store: SqlStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }

    /// Insert `group`, enforcing open-name uniqueness.
    ///
    /// The pre-check gives the common case a clean error; the partial unique
    /// index catches a concurrent insert that commits between check and write.
    fn insert_group(conn: &Connection, group: &Group) -> Result<(), GroupError> {
        if groups::open_name_taken(conn, &group.space_id, &group.name)? {
            return Err(GroupError::invalid(Step::Group, "name", TAKEN));
        }

        groups::insert_group(conn, group).map_err(Self::name_taken_or)
    }

    fn insert_group_user(conn: &Connection, group_user: &GroupUser) -> Result<(), GroupError> {
        groups::insert_group_user(conn, group_user).map_err(Self::already_member_or)
    }

    /// `name: TAKEN` for a violation of the open-name index, otherwise storage
    fn name_taken_or(err: StorageError) -> GroupError {
        if err.violates(GROUPS_OPEN_NAME_KEY) {
            GroupError::invalid(Step::Group, "name", TAKEN)
        } else {
            err.into()
        }
    }

    /// `user: ALREADY_MEMBER` for a duplicate membership, otherwise storage
    fn already_member_or(err: StorageError) -> GroupError {
        if err.violates(GROUP_USERS_PAIR) {
            GroupError::invalid(Step::GroupUser, "user", ALREADY_MEMBER)
        } else {
            err.into()
        }
    }

    fn rejected(err: GroupError) -> GroupError {
        if let GroupError::ValidationFailed { step, errors } = &err {
            warn!(%step, %errors, "Group operation rejected");
            increment(GROUP_VALIDATION_FAILED);
        }
        err
    }
}

impl GroupManager for GroupManagerImpl {
    fn list_groups_query(&self, requester: &SpaceUser) -> GroupQuery {
        GroupQuery::visible_to(requester)
    }

    fn list_groups(&self, query: &GroupQuery) -> Result<Vec<Group>, GroupError> {
        let groups = self.store.read(|conn| query.fetch_all(conn))?;
        debug!(count = groups.len(), "Listed groups");
        Ok(groups)
    }

    fn get_group(&self, requester: &SpaceUser, group_id: &str) -> Result<Group, GroupError> {
        let Ok(id) = group_id.trim().parse::<GroupId>() else {
            debug!(group_id, "Malformed group id");
            return Err(GroupError::NotFound);
        };

        let mut found = self.list_groups(&GroupQuery::visible_to(requester).with_id(id))?;
        match found.len() {
            1 => Ok(found.remove(0)),
            _ => Err(GroupError::NotFound),
        }
    }

    fn create_group(&self, requester: &SpaceUser, params: NewGroup) -> Result<Group, GroupError> {
        let errors = params.validate();
        if !errors.is_empty() {
            return Err(Self::rejected(GroupError::ValidationFailed {
                step: Step::Group,
                errors,
            }));
        }

        let group = Group::new(requester, params);
        let membership = GroupUser::new(&group, requester);

        self.store
            .transaction(|tx| {
                Self::insert_group(tx, &group)?;
                Self::insert_group_user(tx, &membership)
            })
            .map_err(Self::rejected)?;

        info!(
            group_id = %group.id,
            space_id = %group.space_id,
            is_private = group.is_private,
            "Group created"
        );
        increment(GROUPS_CREATED);

        Ok(group)
    }

    fn close_group(&self, group: &Group) -> Result<Group, GroupError> {
        let mut closed = group.clone();
        if !closed.close() {
            debug!(group_id = %group.id, "Group already closed");
            return Ok(closed);
        }

        let rows = self
            .store
            .transaction(|tx| groups::update_group_state(tx, &closed))?;
        if rows == 0 {
            return Err(GroupError::NotFound);
        }

        info!(group_id = %closed.id, "Group closed");
        increment(GROUPS_CLOSED);

        Ok(closed)
    }

    fn get_group_membership(
        &self,
        group: &Group,
        space_user: &SpaceUser,
    ) -> Result<GroupUser, GroupError> {
        self.store
            .read(|conn| groups::find_group_user(conn, &group.id, &space_user.id))?
            .ok_or(GroupError::NotAMember)
    }

    fn create_group_membership(
        &self,
        group: &Group,
        space_user: &SpaceUser,
    ) -> Result<GroupUser, GroupError> {
        if space_user.space_id != group.space_id {
            return Err(Self::rejected(GroupError::invalid(
                Step::GroupUser,
                "user",
                NOT_IN_SPACE,
            )));
        }

        let membership = GroupUser::new(group, space_user);
        self.store
            .transaction(|tx| Self::insert_group_user(tx, &membership))
            .map_err(Self::rejected)?;

        info!(
            group_id = %group.id,
            space_user_id = %space_user.id,
            "Group membership created"
        );
        increment(GROUP_MEMBERSHIPS_CREATED);

        Ok(membership)
    }

    fn list_group_members(&self, group: &Group) -> Result<Vec<GroupUser>, GroupError> {
        Ok(self
            .store
            .read(|conn| groups::list_group_users(conn, &group.id))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_group::group::GroupState;
    use crate::test_utils::TestSpace;
    use crate::validation::BLANK;

    fn setup() -> (GroupManagerImpl, TestSpace) {
        let space = TestSpace::seed("acme").unwrap();
        (GroupManagerImpl::new(space.store.clone()), space)
    }

    #[test]
    fn test_create_group_adds_creator() {
        let (manager, space) = setup();

        let group = manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap();

        assert_eq!(group.state, GroupState::Open);
        assert_eq!(group.creator_id, space.owner.id);
        let membership = manager.get_group_membership(&group, &space.owner).unwrap();
        assert_eq!(membership.group_id, group.id);
        assert_eq!(membership.space_id, space.space.id);
    }

    #[test]
    fn test_blank_name_is_rejected_at_group_step() {
        let (manager, space) = setup();

        let err = manager
            .create_group(&space.owner, NewGroup::new("   "))
            .unwrap_err();

        match err {
            GroupError::ValidationFailed { step, errors } => {
                assert_eq!(step, Step::Group);
                assert_eq!(errors.get("name"), Some(BLANK));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_open_name_ignores_case() {
        let (manager, space) = setup();
        manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap();

        let err = manager
            .create_group(&space.owner, NewGroup::new("dESIGN"))
            .unwrap_err();

        assert_eq!(err.validation_errors().unwrap().get("name"), Some(TAKEN));
        let visible = manager
            .list_groups(&manager.list_groups_query(&space.owner))
            .unwrap();
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn test_unicode_names_compare_ignoring_case() {
        let (manager, space) = setup();
        manager
            .create_group(&space.owner, NewGroup::new("Équipe"))
            .unwrap();

        let err = manager
            .create_group(&space.owner, NewGroup::new("équipe"))
            .unwrap_err();

        assert_eq!(err.validation_errors().unwrap().get("name"), Some(TAKEN));
    }

    #[test]
    fn test_open_name_index_violation_translated() {
        let (manager, space) = setup();
        let first = Group::new(&space.owner, NewGroup::new("Équipe"));
        let second = Group::new(&space.owner, NewGroup::new("ÉQUIPE"));

        // Skip the pre-check so the index itself rejects the second insert
        let err = manager
            .store()
            .transaction(|tx| {
                groups::insert_group(tx, &first)?;
                groups::insert_group(tx, &second).map_err(GroupManagerImpl::name_taken_or)
            })
            .unwrap_err();

        match err {
            GroupError::ValidationFailed { step, errors } => {
                assert_eq!(step, Step::Group);
                assert_eq!(errors.get("name"), Some(TAKEN));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_storage_errors_pass_through() {
        let (manager, space) = setup();
        let group = Group::new(&space.owner, NewGroup::new("Design"));
        let mut clash = Group::new(&space.owner, NewGroup::new("Research"));
        clash.id = group.id;

        let err = manager
            .store()
            .transaction(|tx| {
                groups::insert_group(tx, &group)?;
                // Same primary key, different name
                groups::insert_group(tx, &clash).map_err(GroupManagerImpl::name_taken_or)
            })
            .unwrap_err();
        assert!(matches!(err, GroupError::Storage(_)));

        let membership = GroupUser::new(&group, &space.owner);
        let err = manager
            .store()
            .transaction(|tx| {
                groups::insert_group_user(tx, &membership)
                    .map_err(GroupManagerImpl::already_member_or)
            })
            .unwrap_err();
        assert!(matches!(err, GroupError::Storage(_)));
    }

    #[test]
    fn test_create_group_is_atomic() {
        let (manager, space) = setup();
        manager
            .store()
            .transaction(|tx| {
                tx.execute_batch(
                    "CREATE TRIGGER reject_group_users BEFORE INSERT ON group_users
                     BEGIN SELECT RAISE(ABORT, 'membership rejected'); END;",
                )
                .map_err(StorageError::from)
            })
            .unwrap();

        let err = manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap_err();
        assert!(matches!(err, GroupError::Storage(_)));

        let count: i64 = manager
            .store()
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM groups", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_close_group_frees_name() {
        let (manager, space) = setup();
        let group = manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap();

        let closed = manager.close_group(&group).unwrap();
        assert_eq!(closed.state, GroupState::Closed);

        let again = manager.close_group(&closed).unwrap();
        assert_eq!(again.state, GroupState::Closed);
        assert_eq!(again.updated_at, closed.updated_at);

        let reused = manager
            .create_group(&space.owner, NewGroup::new("design"))
            .unwrap();
        assert_ne!(reused.id, group.id);
    }

    #[test]
    fn test_close_unknown_group_not_found() {
        let (manager, space) = setup();
        let never_saved = Group::new(&space.owner, NewGroup::new("Ghost"));

        assert!(matches!(
            manager.close_group(&never_saved),
            Err(GroupError::NotFound)
        ));
    }

    #[test]
    fn test_duplicate_membership_rejected() {
        let (manager, space) = setup();
        let member = space.add_member("bob@acme.test").unwrap();
        let group = manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap();

        assert!(matches!(
            manager.get_group_membership(&group, &member),
            Err(GroupError::NotAMember)
        ));

        manager.create_group_membership(&group, &member).unwrap();
        let err = manager
            .create_group_membership(&group, &member)
            .unwrap_err();

        match err {
            GroupError::ValidationFailed { step, errors } => {
                assert_eq!(step, Step::GroupUser);
                assert_eq!(errors.get("user"), Some(ALREADY_MEMBER));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(manager.list_group_members(&group).unwrap().len(), 2);
    }

    #[test]
    fn test_membership_cannot_cross_spaces() {
        let (manager, space) = setup();
        let other = space.add_space("globex").unwrap();
        let group = manager
            .create_group(&space.owner, NewGroup::new("Design"))
            .unwrap();

        let err = manager
            .create_group_membership(&group, &other.owner)
            .unwrap_err();

        assert_eq!(
            err.validation_errors().unwrap().get("user"),
            Some(NOT_IN_SPACE)
        );
    }

    #[test]
    fn test_get_group_malformed_id_not_found() {
        let (manager, space) = setup();

        assert!(matches!(
            manager.get_group(&space.owner, "definitely-not-a-uuid"),
            Err(GroupError::NotFound)
        ));
        assert!(matches!(
            manager.get_group(&space.owner, &GroupId::generate().to_string()),
            Err(GroupError::NotFound)
        ));
    }
}
