use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn devcycle() -> Command {
    let mut cmd = Command::cargo_bin("devcycle").unwrap();
    cmd.env_remove("DEVCYCLE_ROOT");
    cmd
}

/// Project root whose config never signals real processes or sleeps
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("devcycle.toml"),
        "lingering_processes = []\nsettle_delay_ms = 0\nretry_backoff_ms = 0\n",
    )
    .unwrap();
    dir
}

fn write_config(root: &Path, extra: &str) {
    let mut content = std::fs::read_to_string(root.join("devcycle.toml")).unwrap();
    content.push_str(extra);
    std::fs::write(root.join("devcycle.toml"), content).unwrap();
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    devcycle()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Electron/SvelteKit"))
        .stdout(predicate::str::contains("--tree"))
        .stdout(predicate::str::contains("--clean"))
        .stdout(predicate::str::contains("--stop"))
        .stdout(predicate::str::contains("--deps"))
        .stdout(predicate::str::contains("--build"))
        .stdout(predicate::str::contains("--dev"))
        .stdout(predicate::str::contains("--init"));
}

#[test]
fn test_version_flag() {
    devcycle()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devcycle"));
}

#[test]
fn test_no_flags_prints_help() {
    let dir = project();
    devcycle()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_completions() {
    devcycle()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devcycle"));
}

#[test]
fn test_missing_root_fails() {
    devcycle()
        .args(["--root", "/nonexistent/devcycle/project", "--tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ─── Tree ────────────────────────────────────────────────────────────────────

#[test]
fn test_tree_output() {
    let dir = project();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/app.js"), "1\n2\n3\n").unwrap();
    std::fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    std::fs::write(root.join("node_modules/dep/index.js"), "x\n").unwrap();

    devcycle()
        .arg("--no-color")
        .arg("--root")
        .arg(root)
        .arg("--tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"JavaScript\""))
        .stdout(predicate::str::contains("├── src/"))
        .stdout(predicate::str::contains("app.js :: 3 lines"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn test_tree_json_only() {
    let dir = project();
    std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();

    let output = devcycle()
        .arg("--root")
        .arg(dir.path())
        .args(["--tree", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files"]["by_type"]["Rust"]["lines"], 1);
}

// ─── Clean & stop ────────────────────────────────────────────────────────────

#[test]
fn test_clean_removes_artifacts() {
    let dir = project();
    let root = dir.path();
    std::fs::create_dir_all(root.join("dist/main")).unwrap();
    std::fs::write(root.join("package-lock.json"), "{}").unwrap();
    std::fs::write(root.join("index.html"), "<html></html>").unwrap();

    devcycle()
        .arg("--no-color")
        .arg("--root")
        .arg(root)
        .arg("--clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 items"));

    assert!(!root.join("dist").exists());
    assert!(!root.join("package-lock.json").exists());
    assert!(root.join("index.html").exists());
}

#[test]
fn test_clean_already_clean() {
    let dir = project();
    devcycle()
        .arg("--root")
        .arg(dir.path())
        .arg("-c")
        .assert()
        .success()
        .stdout(predicate::str::contains("already clean"));
}

#[test]
fn test_stop_removes_pid_file() {
    let dir = project();
    std::fs::write(dir.path().join(".pids.json"), "{}").unwrap();

    devcycle()
        .arg("--root")
        .arg(dir.path())
        .arg("--stop")
        .assert()
        .success();

    assert!(!dir.path().join(".pids.json").exists());
}

#[test]
fn test_first_flag_wins() {
    let dir = project();
    std::fs::create_dir_all(dir.path().join("dist")).unwrap();

    // --tree outranks --clean, so nothing is deleted
    devcycle()
        .arg("--root")
        .arg(dir.path())
        .args(["--clean", "--tree"])
        .assert()
        .success();

    assert!(dir.path().join("dist").exists());
}

// ─── Build ───────────────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn test_build_failure_exits_nonzero() {
    let dir = project();
    write_config(
        dir.path(),
        "package_manager = \"sh\"\nbuild_args = [\"-c\", \"echo oops; exit 4\"]\n",
    );

    devcycle()
        .arg("--root")
        .arg(dir.path())
        .arg("--build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed"))
        .stderr(predicate::str::contains("Return code: 4"));

    let log = std::fs::read_to_string(dir.path().join("build.log")).unwrap();
    assert!(log.contains("oops"));
}

#[cfg(unix)]
#[test]
fn test_build_missing_artifact_exits_nonzero() {
    let dir = project();
    write_config(
        dir.path(),
        "package_manager = \"sh\"\nbuild_args = [\"-c\", \"echo done\"]\n",
    );

    devcycle()
        .arg("--no-color")
        .arg("--root")
        .arg(dir.path())
        .arg("--build")
        .assert()
        .failure()
        .stdout(predicate::str::contains("'preload.js' was not created"));
}

#[cfg(unix)]
#[test]
fn test_missing_package_manager_reports_not_found() {
    let dir = project();
    write_config(dir.path(), "package_manager = \"devcycle-no-such-tool\"\n");

    devcycle()
        .arg("--root")
        .arg(dir.path())
        .arg("--build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("devcycle-no-such-tool"));
}
