//! End-to-end tests for the `stacksmith` binary.
//!
//! None of these reach the external-command phase: they stop at argument
//! parsing, validation, collision checks, or `--dry-run`. Runs that spawn
//! generators live in `external_commands.rs`.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config, `.env` and shell environment.
fn stacksmith(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stacksmith").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("STACKSMITH_CONFIG")
        .env_remove("STACKSMITH_DB_URL")
        .env_remove("STACKSMITH_JWT_SECRET");
    cmd
}

const EXPRESS_MONGO_JWT: [&str; 12] = [
    "-F",
    "react",
    "-B",
    "express",
    "-D",
    "mongodb",
    "-A",
    "jwt",
    "--db-url",
    "mongodb://localhost:27017/shop",
    "--jwt-secret",
    "s3cret",
];

// ── help / version ────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_prints_version() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_value_exits_two() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["check", "--backend", "rails", "--database", "mongodb"])
        .assert()
        .code(2);
}

// ── check ─────────────────────────────────────────────────────────────────────

#[test]
fn check_rejects_flask_with_mongodb() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["check", "--backend", "flask", "--database", "mongodb"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Flask + MongoDB is invalid"));
}

#[test]
fn check_accepts_a_supported_stack() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["check", "-B", "express", "-D", "mongodb", "-A", "jwt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("supported stack"));
}

#[test]
fn check_json_reports_violations() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["check", "-B", "django", "-D", "firestore", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"compatible\": false"))
        .stdout(predicate::str::contains("\"violations\""));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn list_shows_the_catalog() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Databases:"))
        .stdout(predicate::str::contains("firebase-auth"));
}

#[test]
fn list_matrix_json_has_backends() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["list", "--matrix", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"flask\""))
        .stdout(predicate::str::contains("\"fastify\""));
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn new_rejects_path_like_names() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["new", "../escape", "--yes"])
        .args(EXPRESS_MONGO_JWT)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn new_with_yes_requires_every_choice() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["new", "shop", "--yes", "-B", "express"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--frontend"));
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn new_rejects_incompatible_flags_before_writing() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args([
            "new", "shop", "--yes", "-F", "vue", "-B", "flask", "-D", "mongodb", "-A", "jwt",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Flask + MongoDB"));
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn new_rejects_malformed_connection_string() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args([
            "new",
            "shop",
            "--yes",
            "-F",
            "react",
            "-B",
            "express",
            "-D",
            "postgresql",
            "-A",
            "jwt",
            "--db-url",
            "mysql://localhost/shop",
            "--jwt-secret",
            "s3cret",
        ])
        .assert()
        .code(1);
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn new_help_states_interrupt_behaviour() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ctrl-C"))
        .stdout(predicate::str::contains("Windows"));
}

#[test]
fn dry_run_prints_plan_without_writing() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["new", "shop", "--yes", "--dry-run"])
        .args(EXPRESS_MONGO_JWT)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/5]"))
        .stdout(predicate::str::contains("npm install"))
        .stdout(predicate::str::contains("Nothing was written"));
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn existing_directory_is_left_alone_without_force() {
    let temp = TempDir::new().unwrap();
    let existing = temp.path().join("shop");
    std::fs::create_dir(&existing).unwrap();
    std::fs::write(existing.join("keep.txt"), "mine").unwrap();

    stacksmith(temp.path())
        .args(["new", "shop", "--yes"])
        .args(EXPRESS_MONGO_JWT)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        std::fs::read_to_string(existing.join("keep.txt")).unwrap(),
        "mine"
    );
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn init_then_get_round_trips_through_the_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("conf").join("stacksmith.toml");

    stacksmith(temp.path())
        .arg("init")
        .arg("--config")
        .arg(&file)
        .assert()
        .success();
    assert!(file.exists());

    stacksmith(temp.path())
        .args(["config", "get", "generation.on_command_failure", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt"));
}

#[test]
fn environment_overrides_config() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .env("STACKSMITH__GENERATION__PYTHON", "python3.12")
        .args(["config", "get", "generation.python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("python3.12"));
}

#[test]
fn local_file_sets_defaults() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("stacksmith.toml"),
        "[defaults]\nbackend = \"django\"\n",
    )
    .unwrap();

    stacksmith(temp.path())
        .args(["config", "get", "defaults.backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("django"));
}

#[test]
fn unknown_config_key_fails() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["config", "get", "defaults.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key"));
}

// ── completions ───────────────────────────────────────────────────────────────

#[test]
fn bash_completions_use_the_binary_name() {
    let temp = TempDir::new().unwrap();
    stacksmith(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stacksmith"));
}
