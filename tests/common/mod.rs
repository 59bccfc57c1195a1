//! Shared helpers for CLI integration tests.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one `scompose` invocation.
pub struct CliOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_scompose(args: &[&str]) -> CliOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_scompose"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn scompose");
    CliOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

pub fn write_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
    path.to_path_buf()
}
