//! Seeded spaces for tests

use crate::core_space::{
    NewSpace, NewUser, Space, SpaceManager, SpaceManagerImpl, SpaceRole, SpaceUser, User,
    UserManager,
};
use crate::storage::SqlStore;

/// Password used by every fixture account
pub const TEST_PASSWORD: &str = "$ecret$";

/// Valid account parameters for `email`
pub fn new_user_params(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

/// A space with its owner, backed by a store
pub struct TestSpace {
    pub store: SqlStore,
    pub space: Space,
    pub owner: SpaceUser,
    pub owner_user: User,
}

impl TestSpace {
    /// Seed a fresh in-memory store with one space called `slug`
    pub fn seed(slug: &str) -> anyhow::Result<Self> {
        Self::seed_in(SqlStore::memory()?, slug)
    }

    /// Seed a space called `slug` into an existing store
    pub fn seed_in(store: SqlStore, slug: &str) -> anyhow::Result<Self> {
        let manager = SpaceManagerImpl::new(store.clone());
        let owner_user = manager.create_user(new_user_params(&format!("owner@{slug}.test")))?;
        let (space, owner) = manager.create_space(
            &owner_user,
            NewSpace {
                name: slug.to_string(),
                slug: slug.to_string(),
            },
        )?;

        Ok(Self {
            store,
            space,
            owner,
            owner_user,
        })
    }

    /// Another space on the same store
    pub fn add_space(&self, slug: &str) -> anyhow::Result<Self> {
        Self::seed_in(self.store.clone(), slug)
    }

    /// Create an account for `email` and add it to this space as a member
    pub fn add_member(&self, email: &str) -> anyhow::Result<SpaceUser> {
        let manager = SpaceManagerImpl::new(self.store.clone());
        let user = manager.create_user(new_user_params(email))?;
        Ok(manager.create_space_user(&self.space, &user, SpaceRole::Member)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_space_shares_store() {
        let acme = TestSpace::seed("acme").unwrap();
        let globex = acme.add_space("globex").unwrap();

        assert_ne!(acme.space.id, globex.space.id);
        assert_eq!(acme.owner.role, SpaceRole::Owner);

        let member = acme.add_member("bob@acme.test").unwrap();
        assert_eq!(member.space_id, acme.space.id);
        assert_eq!(member.role, SpaceRole::Member);
    }
}
