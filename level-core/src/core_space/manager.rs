//! Manager traits for Space, User and Post operations

use super::post::{NewPost, Post, PostError};
use super::space::{NewSpace, Space, SpaceError, SpaceUser};
use super::types::SpaceRole;
use super::user::{NewUser, User};

/// Manager for user accounts
pub trait UserManager {
    /// Create an account. Emails are unique ignoring case.
    fn create_user(&self, params: NewUser) -> Result<User, SpaceError>;

    /// Look up an account by email, ignoring case
    fn get_user_by_email(&self, email: &str) -> Result<User, SpaceError>;
}

/// Manager for Spaces and their members
pub trait SpaceManager {
    /// Create a Space owned by `owner`. Returns the space and the owner's
    /// space user, inserted in one transaction.
    fn create_space(&self, owner: &User, params: NewSpace)
        -> Result<(Space, SpaceUser), SpaceError>;

    /// Look up a Space by slug, ignoring case
    fn get_space_by_slug(&self, slug: &str) -> Result<Space, SpaceError>;

    /// Add `user` to `space` with `role`
    fn create_space_user(
        &self,
        space: &Space,
        user: &User,
        role: SpaceRole,
    ) -> Result<SpaceUser, SpaceError>;

    /// The space user linking `user` to `space`
    fn get_space_user(&self, space: &Space, user: &User) -> Result<SpaceUser, SpaceError>;
}

/// Manager for Posts
pub trait PostManager {
    /// Create a post in the author's space
    fn create_post(&self, author: &SpaceUser, params: NewPost) -> Result<Post, PostError>;

    /// Posts in the requester's space, newest first
    fn list_posts(&self, requester: &SpaceUser) -> Result<Vec<Post>, PostError>;
}
