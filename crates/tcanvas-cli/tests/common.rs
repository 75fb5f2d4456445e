#![allow(dead_code)]

use std::{fs, path::PathBuf};

use assert_cmd::{assert::Assert, cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use tempfile::TempDir;

/// The binary with a deterministic environment: no inherited colour or
/// size settings.
pub fn tcanvas() -> Command {
    let mut cmd = cargo_bin_cmd!("tcanvas");
    for key in [
        "NO_COLOR",
        "TCANVAS_COLOR",
        "TCANVAS_COLUMNS",
        "TCANVAS_ROWS",
        "COLUMNS",
        "LINES",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

pub fn write_scene(prefix: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let path = temp.path().join("scene.toml");
    fs::write(&path, contents).expect("write scene");
    (temp, path)
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}
