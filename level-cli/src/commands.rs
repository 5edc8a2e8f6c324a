//! Subcommand handlers. Each returns the JSON document printed on stdout.

use crate::{Actor, Command, GroupCommand, PostCommand, SpaceCommand, UserCommand};
use anyhow::{Context, Result};
use level_core::config::Config;
use level_core::storage::migrations::get_current_version;
use level_core::{
    AsyncGroupManager, GroupQuery, NewGroup, NewPost, NewSpace, NewUser, PostManager,
    SpaceManager, SpaceManagerImpl, SpaceUser, SqlStore, UserManager,
};
use serde_json::{json, Value};

pub async fn run(config: &Config, command: Command) -> Result<Value> {
    let store = open_store(config)?;
    let spaces = SpaceManagerImpl::new(store.clone());

    match command {
        Command::Init => {
            let version = store.read(get_current_version)?;
            Ok(json!({
                "database": config.store.database_path,
                "schema_version": version,
            }))
        }
        Command::User(cmd) => user(&spaces, cmd),
        Command::Space(cmd) => space(&spaces, cmd),
        Command::Group(cmd) => group(&spaces, AsyncGroupManager::new(store), cmd).await,
        Command::Post(cmd) => post(&spaces, cmd),
    }
}

fn open_store(config: &Config) -> Result<SqlStore> {
    let path = &config.store.database_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    SqlStore::open(&config.store).with_context(|| format!("opening {}", path.display()))
}

/// The acting user's identity in the named space
fn resolve(spaces: &SpaceManagerImpl, actor: &Actor) -> Result<SpaceUser> {
    let space = spaces.get_space_by_slug(&actor.space)?;
    let user = spaces.get_user_by_email(&actor.email)?;
    spaces
        .get_space_user(&space, &user)
        .with_context(|| format!("{} in space {}", actor.email, actor.space))
}

fn user(spaces: &SpaceManagerImpl, cmd: UserCommand) -> Result<Value> {
    match cmd {
        UserCommand::Create {
            email,
            first_name,
            last_name,
            password,
        } => {
            let user = spaces.create_user(NewUser {
                email,
                first_name,
                last_name,
                password,
            })?;
            Ok(serde_json::to_value(user)?)
        }
    }
}

fn space(spaces: &SpaceManagerImpl, cmd: SpaceCommand) -> Result<Value> {
    match cmd {
        SpaceCommand::Create { name, slug, owner } => {
            let owner = spaces.get_user_by_email(&owner)?;
            let (space, space_user) = spaces.create_space(&owner, NewSpace { name, slug })?;
            Ok(json!({ "space": space, "owner": space_user }))
        }
        SpaceCommand::Join { space, user, role } => {
            let space = spaces.get_space_by_slug(&space)?;
            let user = spaces.get_user_by_email(&user)?;
            let space_user = spaces.create_space_user(&space, &user, role)?;
            Ok(serde_json::to_value(space_user)?)
        }
    }
}

async fn group(
    spaces: &SpaceManagerImpl,
    groups: AsyncGroupManager,
    cmd: GroupCommand,
) -> Result<Value> {
    match cmd {
        GroupCommand::List { actor, state } => {
            let requester = resolve(spaces, &actor)?;
            let mut query = GroupQuery::visible_to(&requester)
                .order_by(level_core::core_group::GroupOrder::Name);
            if let Some(state) = state {
                query = query.with_state(state);
            }
            Ok(serde_json::to_value(groups.list_groups(query).await?)?)
        }
        GroupCommand::Show { actor, id } => {
            let requester = resolve(spaces, &actor)?;
            let group = groups.get_group(requester, id).await?;
            let members = groups.list_group_members(group.clone()).await?;
            Ok(json!({ "group": group, "members": members }))
        }
        GroupCommand::Create {
            actor,
            name,
            description,
            private,
        } => {
            let requester = resolve(spaces, &actor)?;
            let params = NewGroup {
                name,
                description,
                is_private: private,
            };
            Ok(serde_json::to_value(
                groups.create_group(requester, params).await?,
            )?)
        }
        GroupCommand::Close { actor, id } => {
            let requester = resolve(spaces, &actor)?;
            let group = groups.get_group(requester, id).await?;
            Ok(serde_json::to_value(groups.close_group(group).await?)?)
        }
        GroupCommand::Join { actor, id, member } => {
            let requester = resolve(spaces, &actor)?;
            let group = groups.get_group(requester.clone(), id).await?;
            let member = match member {
                Some(email) => resolve(
                    spaces,
                    &Actor {
                        space: actor.space.clone(),
                        email,
                    },
                )?,
                None => requester,
            };
            Ok(serde_json::to_value(
                groups.create_group_membership(group, member).await?,
            )?)
        }
    }
}

fn post(spaces: &SpaceManagerImpl, cmd: PostCommand) -> Result<Value> {
    match cmd {
        PostCommand::Create { actor, body } => {
            let author = resolve(spaces, &actor)?;
            Ok(serde_json::to_value(
                spaces.create_post(&author, NewPost { body })?,
            )?)
        }
        PostCommand::List { actor } => {
            let requester = resolve(spaces, &actor)?;
            Ok(serde_json::to_value(spaces.list_posts(&requester)?)?)
        }
    }
}
