//! Group visibility and membership flows across spaces

use level_core::core_group::GroupOrder;
use level_core::test_utils::TestSpace;
use level_core::validation::{Step, ALREADY_MEMBER, TAKEN};
use level_core::{GroupError, GroupManager, GroupManagerImpl, GroupQuery, GroupState, NewGroup};

#[test]
fn private_group_is_hidden_until_joined() {
    let acme = TestSpace::seed("acme").unwrap();
    let manager = GroupManagerImpl::new(acme.store.clone());
    let alice = acme.owner.clone();
    let bob = acme.add_member("bob@acme.test").unwrap();

    let design = manager
        .create_group(&alice, NewGroup::new("design").private())
        .unwrap();

    assert!(matches!(
        manager.get_group(&bob, &design.id.to_string()),
        Err(GroupError::NotFound)
    ));
    assert!(manager
        .list_groups(&manager.list_groups_query(&bob))
        .unwrap()
        .is_empty());

    manager.create_group_membership(&design, &bob).unwrap();

    assert_eq!(
        manager.get_group(&bob, &design.id.to_string()).unwrap(),
        design
    );
    assert_eq!(
        manager.list_groups(&manager.list_groups_query(&bob)).unwrap(),
        vec![design]
    );
}

#[test]
fn public_groups_are_visible_to_the_whole_space() {
    let acme = TestSpace::seed("acme").unwrap();
    let manager = GroupManagerImpl::new(acme.store.clone());
    let bob = acme.add_member("bob@acme.test").unwrap();

    let everyone = manager
        .create_group(&acme.owner, NewGroup::new("Everyone"))
        .unwrap();

    assert_eq!(
        manager.get_group(&bob, &everyone.id.to_string()).unwrap(),
        everyone
    );
    assert!(matches!(
        manager.get_group_membership(&everyone, &bob),
        Err(GroupError::NotAMember)
    ));
}

#[test]
fn groups_never_leak_across_spaces() {
    let acme = TestSpace::seed("acme").unwrap();
    let globex = acme.add_space("globex").unwrap();
    let manager = GroupManagerImpl::new(acme.store.clone());

    let public = manager
        .create_group(&acme.owner, NewGroup::new("Everyone"))
        .unwrap();
    manager
        .create_group(&globex.owner, NewGroup::new("Everyone"))
        .unwrap();

    assert!(matches!(
        manager.get_group(&globex.owner, &public.id.to_string()),
        Err(GroupError::NotFound)
    ));

    let visible = manager
        .list_groups(&manager.list_groups_query(&globex.owner))
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].space_id, globex.space.id);
}

#[test]
fn closing_a_group_releases_its_name() {
    let acme = TestSpace::seed("acme").unwrap();
    let manager = GroupManagerImpl::new(acme.store.clone());

    let first = manager
        .create_group(&acme.owner, NewGroup::new("Design"))
        .unwrap();
    let err = manager
        .create_group(&acme.owner, NewGroup::new("DESIGN"))
        .unwrap_err();
    assert_eq!(err.validation_errors().unwrap().get("name"), Some(TAKEN));

    manager.close_group(&first).unwrap();
    let second = manager
        .create_group(&acme.owner, NewGroup::new("DESIGN"))
        .unwrap();

    let open = manager
        .list_groups(&GroupQuery::visible_to(&acme.owner).with_state(GroupState::Open))
        .unwrap();
    assert_eq!(open, vec![second]);

    let all = manager
        .list_groups(&GroupQuery::visible_to(&acme.owner).order_by(GroupOrder::Name))
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn duplicate_membership_reports_group_user_step() {
    let acme = TestSpace::seed("acme").unwrap();
    let manager = GroupManagerImpl::new(acme.store.clone());
    let group = manager
        .create_group(&acme.owner, NewGroup::new("Design"))
        .unwrap();

    // The creator already joined during create_group
    let err = manager
        .create_group_membership(&group, &acme.owner)
        .unwrap_err();

    match err {
        GroupError::ValidationFailed { step, errors } => {
            assert_eq!(step, Step::GroupUser);
            assert_eq!(errors.get("user"), Some(ALREADY_MEMBER));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
