//! Spaces, users and posts
//!
//! A Space is the tenant boundary: every group, post and membership belongs
//! to exactly one Space. Users join a Space through a `SpaceUser`, which is
//! the identity every other operation is performed as.

pub mod manager;
pub mod manager_impl;
pub mod post;
pub mod space;
pub mod types;
pub mod user;

pub use manager::{PostManager, SpaceManager, UserManager};
pub use manager_impl::SpaceManagerImpl;
pub use post::{NewPost, Post, PostError, PostState};
pub use space::{NewSpace, Space, SpaceError, SpaceUser};
pub use types::{
    ActiveState, GroupId, GroupUserId, PostId, SpaceId, SpaceRole, SpaceUserId, Timestamp, UserId,
};
pub use user::{NewUser, User};
