//! Runs that reach the external-command phase, with fake `npx`/`npm`
//! scripts placed first on `PATH`.

#![cfg(unix)]

use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NEW_SHOP: [&str; 16] = [
    "new",
    "shop",
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
    "--yes",
    "--no-color",
];

/// Write an executable shell script named `name` into `bin`.
fn fake_tool(bin: &Path, name: &str, body: &str) {
    let path = bin.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// `PATH` with `bin` in front of the inherited one.
fn path_with(bin: &Path) -> OsString {
    let mut dirs = vec![bin.to_path_buf()];
    if let Some(path) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(dirs).unwrap()
}

fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    (temp, bin)
}

/// The binary, isolated from the user's config and environment.
fn stacksmith(dir: &Path, bin: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_stacksmith"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env("PATH", path_with(bin))
        .env_remove("RUST_LOG")
        .env_remove("STACKSMITH_CONFIG")
        .env_remove("STACKSMITH_DB_URL")
        .env_remove("STACKSMITH_JWT_SECRET");
    cmd
}

fn wait_for(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn failing_command_with_abort_removes_project() {
    let (temp, bin) = fixture();
    fake_tool(&bin, "npx", "echo 'create-react-app: registry unreachable' >&2\nexit 1");
    fake_tool(&bin, "npm", "exit 0");

    Command::from_std(stacksmith(temp.path(), &bin))
        .args(NEW_SHOP)
        .args(["--on-failure", "abort"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("npx -y create-react-app ."))
        .stderr(predicate::str::contains("Rolled back: removed"));

    assert!(!temp.path().join("shop").exists());
}

#[test]
fn failing_command_with_continue_keeps_project() {
    let (temp, bin) = fixture();
    fake_tool(&bin, "npx", "exit 1");
    fake_tool(&bin, "npm", "exit 0");

    Command::from_std(stacksmith(temp.path(), &bin))
        .args(NEW_SHOP)
        .args(["--on-failure", "continue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("npx -y create-react-app ."));

    let root = temp.path().join("shop");
    assert!(root.join("server/server.js").is_file());
    assert!(root.join("README.md").is_file());
}

#[test]
fn interrupt_waits_for_running_command_then_removes_project() {
    let (temp, bin) = fixture();
    let started = temp.path().join("npx-started");
    // Ignores SIGINT and writes into the project after a delay.
    fake_tool(
        &bin,
        "npx",
        &format!(
            "trap '' INT\n\
             touch '{}'\n\
             sleep 1\n\
             mkdir -p node_modules/react && touch node_modules/react/index.js",
            started.display()
        ),
    );
    fake_tool(&bin, "npm", "exit 0");

    let mut child = stacksmith(temp.path(), &bin)
        .args(NEW_SHOP)
        .args(["--on-failure", "abort"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    assert!(
        wait_for(&started, Duration::from_secs(10)),
        "fake npx never started"
    );
    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{stderr}");
    assert!(stderr.contains("Waiting for the running command"), "{stderr}");
    assert!(stderr.contains("Rolled back: removed"), "{stderr}");

    let root = temp.path().join("shop");
    assert!(!root.exists());
    // Nothing from the fake generator shows up afterwards.
    std::thread::sleep(Duration::from_millis(1500));
    assert!(!root.exists());
}
