//! Subprocess-backed `GitOperations`.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use camino::Utf8Path;
use git2::Repository;

use super::GitOperations;
use crate::workspace::error::WorkspaceError;

const APPLYING_PREFIX: &str = "Applying:";

/// Runs the `git` executable with an explicit working directory per call.
///
/// Read-only inspection (`HEAD` message, repository detection) goes through
/// libgit2 instead of a subprocess.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: "git".to_owned(),
        }
    }
}

impl SystemGit {
    /// Uses a specific `git` executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn run(&self, dir: &Utf8Path, args: &[&str]) -> Result<String, WorkspaceError> {
        self.run_with_input(dir, args, None)
    }

    fn run_with_input(
        &self,
        dir: &Utf8Path,
        args: &[&str],
        input: Option<&str>,
    ) -> Result<String, WorkspaceError> {
        let command = self.command_line(args);
        tracing::debug!(cwd = %dir, %command, "running git");

        let spawn_error = |error: std::io::Error| WorkspaceError::Spawn {
            command: command.clone(),
            message: error.to_string(),
        };

        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(text) = input
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin.write_all(text.as_bytes()).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        into_stdout(command, output)
    }
}

fn into_stdout(command: String, output: Output) -> Result<String, WorkspaceError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    Err(WorkspaceError::CommandFailed {
        command,
        status: output.status.to_string(),
        stdout,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Counts the `Applying:` lines `git am` prints for each created commit.
pub(crate) fn count_applied(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with(APPLYING_PREFIX))
        .count()
}

impl GitOperations for SystemGit {
    fn clone_repository(&self, url: &str, target: &Utf8Path) -> Result<(), WorkspaceError> {
        let parent = target.parent().unwrap_or_else(|| Utf8Path::new("."));
        self.run(parent, &["clone", url, target.as_str()]).map(drop)
    }

    fn checkout(&self, repo: &Utf8Path, revision: &str) -> Result<(), WorkspaceError> {
        self.run(repo, &["checkout", revision]).map(drop)
    }

    fn reset_hard(&self, repo: &Utf8Path) -> Result<(), WorkspaceError> {
        self.run(repo, &["reset", "--hard"]).map(drop)
    }

    fn fetch(&self, repo: &Utf8Path, remote: &str) -> Result<(), WorkspaceError> {
        self.run(repo, &["fetch", remote]).map(drop)
    }

    fn set_config(&self, repo: &Utf8Path, key: &str, value: &str) -> Result<(), WorkspaceError> {
        self.run(repo, &["config", key, value]).map(drop)
    }

    fn review_setup(&self, repo: &Utf8Path) -> Result<(), WorkspaceError> {
        self.run(repo, &["review", "-s"]).map(drop)
    }

    fn apply_mailbox(&self, repo: &Utf8Path, patch: &Utf8Path) -> Result<usize, WorkspaceError> {
        let output = match self.run(repo, &["am", patch.as_str()]) {
            Ok(output) => output,
            Err(error) => {
                // A half-applied series would block every later `git am`.
                if let Err(abort_error) = self.run(repo, &["am", "--abort"]) {
                    tracing::warn!(%abort_error, "failed to abort git am session");
                }
                return Err(error);
            }
        };

        match count_applied(&output) {
            0 => Err(WorkspaceError::NothingApplied {
                path: patch.to_string(),
            }),
            count => Ok(count),
        }
    }

    fn soft_reset(&self, repo: &Utf8Path, count: usize) -> Result<(), WorkspaceError> {
        let target = format!("HEAD~{count}");
        self.run(repo, &["reset", "--soft", target.as_str()])
            .map(drop)
    }

    fn commit(
        &self,
        repo: &Utf8Path,
        message: &str,
        author: &str,
    ) -> Result<(), WorkspaceError> {
        let author_arg = format!("--author={author}");
        self.run_with_input(
            repo,
            &["commit", "--no-gpg-sign", "-a", "-F", "-", author_arg.as_str()],
            Some(message),
        )
        .map(drop)
    }

    fn push(&self, repo: &Utf8Path, remote: &str, refspec: &str) -> Result<(), WorkspaceError> {
        self.run(repo, &["push", remote, refspec]).map(drop)
    }

    fn head_message(&self, repo: &Utf8Path) -> Result<String, WorkspaceError> {
        let repository = Repository::open(repo.as_std_path())?;
        let head = repository.head()?.peel_to_commit()?;
        Ok(String::from_utf8_lossy(head.message_bytes()).into_owned())
    }

    fn is_repository(&self, path: &Utf8Path) -> bool {
        Repository::open(path.as_std_path()).is_ok()
    }
}
