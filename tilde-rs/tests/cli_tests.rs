//! Binary-level tests: run the built `tilde` binary with scope files and
//! definitions, and check what it prints and how it exits.
//!
//! `TILDERC` and `HOME` are pointed at an empty temp directory so that a
//! developer's own scope file never leaks into the results.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `tilde` binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_tilde"))
}

/// Run the binary with `args`, feeding `stdin` if given.
fn run(home: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut cmd = Command::new(binary());
    cmd.args(args)
        .env("HOME", home)
        .env_remove("TILDERC")
        .env_remove("RUST_LOG")
        .current_dir(home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("failed to spawn tilde binary");
    {
        let mut pipe = child.stdin.take().expect("stdin not open");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write to stdin");
        }
    }
    child.wait_with_output().expect("wait failed")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout).lines().map(str::to_owned).collect()
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write scope file");
    path
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn expands_text_from_defines() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-f", "-c", "~{host}:~{port}", "host=n1", "port=411"], None);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["n1:411"]);
}

#[test]
fn expands_each_stdin_line() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-f", "a=1", "e="], Some("x~{a}\n[~{e}]\nplain\n"));
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["x1", "[]", "plain"]);
}

#[test]
fn inner_scope_file_shadows_outer() {
    let home = tempfile::tempdir().unwrap();
    let cluster = write_file(home.path(), "cluster.rc", "/set env=prod\n/set cluster=c1\n");
    let daemon = write_file(home.path(), "daemon.rc", "/set env=dev\n");
    let out = run(
        home.path(),
        &[
            "-f",
            cluster.to_str().unwrap(),
            "-f",
            daemon.to_str().unwrap(),
            "-c~{cluster}/~{env}",
        ],
        None,
    );
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["c1/dev"]);
}

#[test]
fn defines_shadow_scope_files() {
    let home = tempfile::tempdir().unwrap();
    let cluster = write_file(home.path(), "cluster.rc", "/set env=prod\n");
    let out = run(home.path(), &["-f", cluster.to_str().unwrap(), "-c~{env}", "env=test"], None);
    assert_eq!(stdout_lines(&out), ["test"]);
}

#[test]
fn default_scope_file_is_loaded() {
    let home = tempfile::tempdir().unwrap();
    write_file(home.path(), ".tilderc", "/set site=lab\n");
    let out = run(home.path(), &["-c~{site}"], None);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["lab"]);
}

#[test]
fn unresolved_token_kept_and_warned() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-f", "-c", "~{missing}"], None);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["~{missing}"]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing"));
}

#[test]
fn strict_mode_fails_on_unresolved() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-sf", "-c", "~{missing}"], None);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(stdout_lines(&out), ["~{missing}"]);

    let out = run(home.path(), &["-f", "-s", "-c", "~{ok}", "ok=1"], None);
    assert!(out.status.success(), "{out:?}");
}

#[test]
fn missing_scope_file_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-fnope.rc", "-c", "x"], None);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope.rc"));
}

#[test]
fn bad_argument_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-z"], None);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage:"));
}

#[test]
fn debug_trace_reports_tokens() {
    let home = tempfile::tempdir().unwrap();
    let out = run(home.path(), &["-df", "-c", "~{a}~{u}", "a=1"], None);
    assert!(out.status.success(), "{out:?}");
    assert_eq!(stdout_lines(&out), ["1~{u}"]);
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("token resolved"), "{err}");
    assert!(err.contains("undefined"), "{err}");
}
