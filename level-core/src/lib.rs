//! Level core
//!
//! Domain logic for the Level collaboration backend: spaces, users, posts and
//! the groups that organize members inside a space. Everything is persisted in
//! SQLite and relies on the database for uniqueness and referential integrity.

#[macro_use]
mod macros;

pub mod config;
pub mod core_group;
pub mod core_space;
pub mod logging;
pub mod metrics;
pub mod storage;
pub mod test_utils;
pub mod validation;

pub use core_group::{
    AsyncGroupManager, Group, GroupError, GroupManager, GroupManagerImpl, GroupQuery, GroupState,
    GroupUser, NewGroup,
};
pub use core_space::{
    NewPost, NewSpace, NewUser, Post, PostError, PostManager, Space, SpaceError, SpaceManager,
    SpaceManagerImpl, SpaceRole, SpaceUser, User, UserManager,
};
pub use logging::{init_logging, LogLevel};
pub use storage::{SqlStore, StorageError};
pub use validation::{Step, ValidationErrors};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        let _ = GroupState::Open;
        let _ = Step::Group;
    }
}
