//! Helpers for invoking the built `petstore-bdd` binary in tests.
//!
//! These utilities use `assert_cmd` to locate the workspace's `petstore-bdd`
//! executable, run it with a controlled environment and capture its output.

use anyhow::{Context, Result};
use assert_cmd::Command;
use petstore_bdd::config::{
    API_KEY_ENV, BASE_URL_ENV, EVIDENCE_LOG_ENV, FIXTURES_DIR_ENV, TIMEOUT_ENV,
};

/// Captured output from a `petstore-bdd` invocation.
#[derive(Debug)]
pub struct BinaryRun {
    /// Captured stdout (lossy UTF-8).
    pub stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
}

/// Run `petstore-bdd` with `args`, setting `envs` on top of a scrubbed
/// `PETSTORE_*` environment so host settings cannot leak into the test.
///
/// # Errors
///
/// Returns an error when the binary cannot be located or spawned.
pub fn run_petstore_bdd(args: &[&str], envs: &[(&str, &str)]) -> Result<BinaryRun> {
    let mut cmd = Command::cargo_bin("petstore-bdd").context("locate petstore-bdd binary")?;
    for key in [
        BASE_URL_ENV,
        API_KEY_ENV,
        TIMEOUT_ENV,
        FIXTURES_DIR_ENV,
        EVIDENCE_LOG_ENV,
    ] {
        cmd.env_remove(key);
    }
    let output = cmd
        .envs(envs.iter().copied())
        .args(args)
        .output()
        .context("run petstore-bdd command")?;
    Ok(BinaryRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}
