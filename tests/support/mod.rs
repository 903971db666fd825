//! Shared test utilities for binary-level tests.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Environment variables that would make a test depend on the developer's
/// own configuration.
const HERMETIC_ENV: &[&str] = &[
    "GERRIT_SYNC_DB_LOCATION",
    "GERRIT_SYNC_GH_ACCOUNT",
    "GERRIT_SYNC_GH_USERNAME",
    "GERRIT_SYNC_GH_PASSWORD",
    "GERRIT_SYNC_GH_PASSWORD_FILE",
    "GERRIT_SYNC_GH_TOKEN",
    "GERRIT_SYNC_MW_INDEX",
    "GERRIT_SYNC_MW_PAGE",
    "GERRIT_SYNC_REPOS",
    "XDG_CONFIG_HOME",
    "RUST_LOG",
];

/// Creates a temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gerrit-sync"))
}

/// Runs the binary with `args`, using `home` as both `HOME` and the working
/// directory so no developer configuration file is discovered.
///
/// # Panics
///
/// Panics if the binary cannot be executed.
pub fn run_gerrit_sync(home: &TempDir, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(binary_path());
    command
        .args(args)
        .current_dir(home.path())
        .env("HOME", home.path());
    for key in HERMETIC_ENV {
        command.env_remove(key);
    }
    for (key, value) in env {
        command.env(key, value);
    }

    command
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

/// Returns the captured stderr as text.
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
