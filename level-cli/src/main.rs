use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use level_core::config::Config;
use level_core::logging::{init_logging_with_config, LogConfig};
use level_core::{GroupState, SpaceRole};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "level")]
#[command(author, version, about = "Manage Level spaces, groups and posts", long_about = None)]
struct Args {
    /// SQLite database file (overrides the configuration)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// TOML configuration file; LEVEL_* environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and apply migrations
    Init,

    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Manage spaces and their members
    #[command(subcommand)]
    Space(SpaceCommand),

    /// Manage groups inside a space
    #[command(subcommand)]
    Group(GroupCommand),

    /// Manage posts inside a space
    #[command(subcommand)]
    Post(PostCommand),
}

/// Identifies who runs a space-scoped command
#[derive(clap::Args, Debug, Clone)]
struct Actor {
    /// Space slug
    #[arg(short, long)]
    space: String,

    /// Email of the acting user
    #[arg(long = "as", value_name = "EMAIL")]
    email: String,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum SpaceCommand {
    /// Create a space owned by an existing user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        /// Email of the owner
        #[arg(long)]
        owner: String,
    },

    /// Add an existing user to a space
    Join {
        /// Space slug
        #[arg(short, long)]
        space: String,
        /// Email of the user to add
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "member", value_parser = SpaceRole::from_str)]
        role: SpaceRole,
    },
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// List groups visible to the acting user
    List {
        #[command(flatten)]
        actor: Actor,
        /// Only groups in this state (open, closed)
        #[arg(long, value_parser = GroupState::from_str)]
        state: Option<GroupState>,
    },

    /// Show one group
    Show {
        #[command(flatten)]
        actor: Actor,
        id: String,
    },

    /// Create a group; the acting user becomes its first member
    Create {
        #[command(flatten)]
        actor: Actor,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        private: bool,
    },

    /// Close a group, freeing its name
    Close {
        #[command(flatten)]
        actor: Actor,
        id: String,
    },

    /// Add a space member to a group
    Join {
        #[command(flatten)]
        actor: Actor,
        id: String,
        /// Email of the member to add; defaults to the acting user
        #[arg(long)]
        member: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PostCommand {
    /// Post a message to the space
    Create {
        #[command(flatten)]
        actor: Actor,
        #[arg(long)]
        body: String,
    },

    /// List posts in the space, newest first
    List {
        #[command(flatten)]
        actor: Actor,
    },
}

/// Resolve configuration from file or environment, then apply flags
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::from_env()?,
    };

    if let Some(database) = &args.database {
        config.store.database_path = database.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging_with_config(LogConfig::try_from(&config.logging)?)?;
    level_core::metrics::describe_counters();
    debug!(database = %config.store.database_path.display(), "Level CLI started");

    let output = commands::run(&config, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    info!("Level CLI finished");
    Ok(())
}
