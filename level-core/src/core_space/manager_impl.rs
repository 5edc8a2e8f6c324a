//! Space, user and post manager backed by the SQL store

use super::manager::{PostManager, SpaceManager, UserManager};
use super::post::{NewPost, Post, PostError};
use super::space::{NewSpace, Space, SpaceError, SpaceUser};
use super::types::SpaceRole;
use super::user::{NewUser, User};
use crate::metrics::{increment, POSTS_CREATED, SPACES_CREATED, USERS_CREATED};
use crate::storage::migrations::{SPACES_SLUG_INDEX, SPACE_USERS_PAIR, USERS_EMAIL_KEY};
use crate::storage::{spaces, SqlStore};
use crate::validation::{Step, ALREADY_MEMBER, TAKEN};
use rusqlite::Connection;
use tracing::{info, warn};

/// Manager implementation with business logic
pub struct SpaceManagerImpl {
    store: SqlStore,
}

impl SpaceManagerImpl {
    pub fn new(store: SqlStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }

    fn insert_space_user(conn: &Connection, space_user: &SpaceUser) -> Result<(), SpaceError> {
        spaces::insert_space_user(conn, space_user).map_err(|e| {
            if e.violates(SPACE_USERS_PAIR) {
                SpaceError::invalid(Step::SpaceUser, "user", ALREADY_MEMBER)
            } else {
                e.into()
            }
        })
    }

    fn rejected(err: SpaceError) -> SpaceError {
        if let SpaceError::ValidationFailed { step, errors } = &err {
            warn!(%step, %errors, "Space operation rejected");
        }
        err
    }
}

impl UserManager for SpaceManagerImpl {
    fn create_user(&self, params: NewUser) -> Result<User, SpaceError> {
        let errors = params.validate();
        if !errors.is_empty() {
            return Err(Self::rejected(SpaceError::ValidationFailed {
                step: Step::User,
                errors,
            }));
        }

        let user = User::new(params)?;
        self.store
            .transaction(|tx| {
                if spaces::email_taken(tx, &user.email)? {
                    return Err(SpaceError::invalid(Step::User, "email", TAKEN));
                }
                spaces::insert_user(tx, &user).map_err(|e| {
                    if e.violates(USERS_EMAIL_KEY) {
                        SpaceError::invalid(Step::User, "email", TAKEN)
                    } else {
                        e.into()
                    }
                })
            })
            .map_err(Self::rejected)?;

        info!(user_id = %user.id, "User created");
        increment(USERS_CREATED);

        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> Result<User, SpaceError> {
        self.store
            .read(|conn| spaces::find_user_by_email(conn, email))?
            .ok_or(SpaceError::UserNotFound)
    }
}

impl SpaceManager for SpaceManagerImpl {
    fn create_space(
        &self,
        owner: &User,
        params: NewSpace,
    ) -> Result<(Space, SpaceUser), SpaceError> {
        let errors = params.validate();
        if !errors.is_empty() {
            return Err(Self::rejected(SpaceError::ValidationFailed {
                step: Step::Space,
                errors,
            }));
        }

        let space = Space::new(params);
        let space_user = SpaceUser::new(space.id, owner.id, SpaceRole::Owner);

        self.store
            .transaction(|tx| {
                if spaces::find_space_by_slug(tx, &space.slug)?.is_some() {
                    return Err(SpaceError::invalid(Step::Space, "slug", TAKEN));
                }
                spaces::insert_space(tx, &space).map_err(|e| {
                    if e.violates(SPACES_SLUG_INDEX) {
                        SpaceError::invalid(Step::Space, "slug", TAKEN)
                    } else {
                        e.into()
                    }
                })?;
                Self::insert_space_user(tx, &space_user)
            })
            .map_err(Self::rejected)?;

        info!(space_id = %space.id, slug = %space.slug, "Space created");
        increment(SPACES_CREATED);

        Ok((space, space_user))
    }

    fn get_space_by_slug(&self, slug: &str) -> Result<Space, SpaceError> {
        self.store
            .read(|conn| spaces::find_space_by_slug(conn, slug.trim()))?
            .ok_or(SpaceError::SpaceNotFound)
    }

    fn create_space_user(
        &self,
        space: &Space,
        user: &User,
        role: SpaceRole,
    ) -> Result<SpaceUser, SpaceError> {
        let space_user = SpaceUser::new(space.id, user.id, role);
        self.store
            .transaction(|tx| Self::insert_space_user(tx, &space_user))
            .map_err(Self::rejected)?;

        info!(space_id = %space.id, user_id = %user.id, %role, "Space user created");
        Ok(space_user)
    }

    fn get_space_user(&self, space: &Space, user: &User) -> Result<SpaceUser, SpaceError> {
        self.store
            .read(|conn| spaces::find_space_user(conn, &space.id, &user.id))?
            .ok_or(SpaceError::SpaceUserNotFound)
    }
}

impl PostManager for SpaceManagerImpl {
    fn create_post(&self, author: &SpaceUser, params: NewPost) -> Result<Post, PostError> {
        let errors = params.validate();
        if !errors.is_empty() {
            warn!(%errors, "Post rejected");
            return Err(PostError::ValidationFailed {
                step: Step::Post,
                errors,
            });
        }

        let post = Post::new(author, params);
        self.store
            .transaction(|tx| spaces::insert_post(tx, &post))?;

        info!(post_id = %post.id, space_id = %post.space_id, "Post created");
        increment(POSTS_CREATED);

        Ok(post)
    }

    fn list_posts(&self, requester: &SpaceUser) -> Result<Vec<Post>, PostError> {
        Ok(self
            .store
            .read(|conn| spaces::list_space_posts(conn, &requester.space_id))?)
    }
}
