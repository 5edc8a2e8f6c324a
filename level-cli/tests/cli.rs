//! End-to-end runs of the `level` binary against a temporary database

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn level(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_level"))
        .arg("--database")
        .arg(db)
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("LEVEL_STORE_DATABASE_PATH")
        .env_remove("LEVEL_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run level")
}

fn ok(db: &Path, args: &[&str]) -> Value {
    let output = level(db, args);
    assert!(
        output.status.success(),
        "level {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn seed(db: &Path) {
    for (email, first) in [("alice@acme.test", "Alice"), ("bob@acme.test", "Bob")] {
        ok(
            db,
            &[
                "user", "create", "--email", email, "--first-name", first, "--last-name",
                "Smith", "--password", "$ecret$",
            ],
        );
    }
    ok(
        db,
        &[
            "space", "create", "--name", "Acme", "--slug", "acme", "--owner", "alice@acme.test",
        ],
    );
    ok(db, &["space", "join", "--space", "acme", "--user", "bob@acme.test"]);
}

#[test]
fn init_reports_schema_version() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("nested").join("level.db");

    let out = ok(&db, &["init"]);
    assert_eq!(out["schema_version"], 1);
    assert!(db.exists());
}

#[test]
fn private_group_flow() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("level.db");
    seed(&db);

    let group = ok(
        &db,
        &[
            "group", "create", "--space", "acme", "--as", "alice@acme.test", "--name", "design",
            "--private",
        ],
    );
    let id = group["id"].as_str().unwrap().to_string();
    assert_eq!(group["state"], "OPEN");

    let hidden = level(
        &db,
        &["group", "show", "--space", "acme", "--as", "bob@acme.test", &id],
    );
    assert!(!hidden.status.success());
    assert!(String::from_utf8_lossy(&hidden.stderr).contains("Group not found"));

    ok(
        &db,
        &[
            "group", "join", "--space", "acme", "--as", "alice@acme.test", &id, "--member",
            "bob@acme.test",
        ],
    );

    let shown = ok(
        &db,
        &["group", "show", "--space", "acme", "--as", "bob@acme.test", &id],
    );
    assert_eq!(shown["group"]["name"], "design");
    assert_eq!(shown["members"].as_array().unwrap().len(), 2);
}

#[test]
fn duplicate_group_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("level.db");
    seed(&db);

    let create = [
        "group", "create", "--space", "acme", "--as", "alice@acme.test", "--name", "Design",
    ];
    ok(&db, &create);

    let again = level(&db, &create);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("has already been taken"));
}

#[test]
fn posts_list_newest_first() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("level.db");
    seed(&db);

    for body in ["first", "second"] {
        ok(
            &db,
            &["post", "create", "--space", "acme", "--as", "bob@acme.test", "--body", body],
        );
    }

    let posts = ok(&db, &["post", "list", "--space", "acme", "--as", "alice@acme.test"]);
    let bodies: Vec<_> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["second", "first"]);
}
