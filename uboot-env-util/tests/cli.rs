#![cfg(feature = "cli")]

mod common;

use common::{HASH_AT, env_range, pinenote_copy, write_duplicated};
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENVTOOL_EXE: &str = env!("CARGO_BIN_EXE_uboot-envtool");

fn run(args: &[&str]) -> Output {
    Command::new(ENVTOOL_EXE)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run uboot-envtool")
}

#[test]
fn shows_help() {
    for flag in ["-h", "--help"] {
        let output = run(&[flag]);

        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Usage"), "unexpected help text:\n{stdout}");
        assert!(stdout.contains("extract"));
        assert!(stdout.contains("insert"));
    }
}

#[test]
fn wrong_argument_count_fails() {
    let output = run(&["extract", "only-one"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "unexpected error text:\n{stderr}");

    let output = run(&[]);
    assert!(!output.status.success());
}

#[test]
fn extract_and_insert_in_place() {
    let dir = TempDir::new().unwrap();
    let img = dir.path().join("uboot.img");
    let txt = dir.path().join("env.txt");
    write_duplicated(&img, &pinenote_copy(b"foo=1\0bar=2\0\0"));

    let output = run(&["extract", img.to_str().unwrap(), txt.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "extract failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(&txt).unwrap(), "foo=1\nbar=2\n");

    fs::write(&txt, "foo=1\nbar=3\n").unwrap();
    let output = run(&[
        "-v",
        "insert",
        "",
        txt.to_str().unwrap(),
        img.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "insert failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("as U-Boot source image"), "stderr:\n{stderr}");
    assert!(stderr.contains("Environment uses 12 bytes"), "stderr:\n{stderr}");

    let raw = fs::read(&img).unwrap();
    assert_eq!(&raw[env_range()][..12], b"foo=1\0bar=3\0");
}

#[test]
fn failed_insert_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let img = dir.path().join("uboot.img");
    let txt = dir.path().join("env.txt");
    let out = dir.path().join("out.img");
    write_duplicated(&img, &pinenote_copy(b"a=1\0\0"));
    fs::write(&txt, "caf\u{e9}=1\n").unwrap();

    let output = run(&[
        "insert",
        img.to_str().unwrap(),
        txt.to_str().unwrap(),
        out.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-ASCII"), "stderr:\n{stderr}");
    assert!(!out.exists());
}

#[test]
fn info_prints_hash_offset() {
    let dir = TempDir::new().unwrap();
    let img = dir.path().join("uboot.img");
    write_duplicated(&img, &pinenote_copy(b"foo=1\0bar=2\0\0"));

    let output = run(&["info", img.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&format!("Hash Offset:    0x{HASH_AT:X}")),
        "stdout:\n{stdout}"
    );
    assert!(stdout.contains("Env Lines:      2"), "stdout:\n{stdout}");
}
