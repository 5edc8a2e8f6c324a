//! Persistence through a file-backed pool

use level_core::config::StoreConfig;
use level_core::test_utils::TestSpace;
use level_core::validation::{Step, TAKEN};
use level_core::{
    AsyncGroupManager, GroupError, NewGroup, SpaceManager, SpaceManagerImpl, SqlStore,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> SqlStore {
    SqlStore::open(&StoreConfig {
        database_path: dir.path().join("level.db"),
        pool_size: 4,
        ..StoreConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn groups_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();

    let (owner, group) = {
        let acme = TestSpace::seed_in(open(&dir), "acme").unwrap();
        let manager = AsyncGroupManager::new(acme.store.clone());
        let group = manager
            .create_group(acme.owner.clone(), NewGroup::new("Design").private())
            .await
            .unwrap();
        (acme.owner, group)
    };

    let store = open(&dir);
    let spaces = SpaceManagerImpl::new(store.clone());
    assert_eq!(spaces.get_space_by_slug("acme").unwrap().id, owner.space_id);

    let manager = AsyncGroupManager::new(store);
    let found = manager
        .get_group(owner.clone(), group.id.to_string())
        .await
        .unwrap();
    assert_eq!(found, group);

    let members = manager.list_group_members(group).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].space_user_id, owner.id);
}

#[tokio::test]
async fn concurrent_duplicate_names_yield_one_group() {
    let dir = TempDir::new().unwrap();
    let acme = TestSpace::seed_in(open(&dir), "acme").unwrap();
    let manager = AsyncGroupManager::new(acme.store.clone());

    let attempts = (0..8).map(|i| {
        let manager = manager.clone();
        let owner = acme.owner.clone();
        let name = if i % 2 == 0 { "Design" } else { "design" };
        tokio::spawn(async move { manager.create_group(owner, NewGroup::new(name)).await })
    });

    let mut created = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        match attempt.await.unwrap() {
            Ok(_) => created += 1,
            Err(GroupError::ValidationFailed { step, errors }) => {
                assert_eq!(step, Step::Group);
                assert_eq!(errors.get("name"), Some(TAKEN));
            }
            Err(other) => panic!("losing attempt failed with {other:?}"),
        }
    }
    assert_eq!(created, 1);
}
