//! In-memory git backend for end-to-end sync scenarios.
//!
//! Clones are plain directories, commits only remember their message, and
//! committing a message without a Change-Id mints one the way Gerrit's
//! `commit-msg` hook does.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::Utf8Path;
use gerrit_sync::reconcile::trailers::{Trailer, find_change_id};
use gerrit_sync::workspace::WorkspaceError;
use gerrit_sync::{ChangeId, GitOperations};

#[derive(Debug, Default)]
struct Journal {
    head_message: String,
    pushed: Vec<String>,
    minted: Vec<ChangeId>,
    pushes_to_reject: usize,
}

/// Records what the sync bot asked git to do.
#[derive(Debug, Default)]
pub struct ScriptedGit {
    journal: Mutex<Journal>,
}

impl ScriptedGit {
    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next push fail as if Gerrit rejected it.
    pub fn reject_next_push(&self) {
        self.journal().pushes_to_reject += 1;
    }

    /// Messages of the commits that were pushed, oldest first.
    pub fn pushed_messages(&self) -> Vec<String> {
        self.journal().pushed.clone()
    }

    /// Change-Ids minted by the emulated `commit-msg` hook, oldest first.
    pub fn minted(&self) -> Vec<ChangeId> {
        self.journal().minted.clone()
    }
}

fn with_minted_change_id(message: &str, change_id: &ChangeId) -> String {
    let trimmed = message.trim_end();
    let final_paragraph = trimmed.rsplit("\n\n").next().unwrap_or_default();
    let separator = if final_paragraph.lines().all(|line| Trailer::parse(line).is_some()) {
        "\n"
    } else {
        "\n\n"
    };
    format!("{trimmed}{separator}Change-Id: {change_id}\n")
}

impl GitOperations for ScriptedGit {
    fn clone_repository(&self, _url: &str, target: &Utf8Path) -> Result<(), WorkspaceError> {
        std::fs::create_dir_all(target).map_err(|error| WorkspaceError::Io {
            path: target.to_string(),
            message: error.to_string(),
        })
    }

    fn checkout(&self, _repo: &Utf8Path, _revision: &str) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn reset_hard(&self, _repo: &Utf8Path) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn fetch(&self, _repo: &Utf8Path, _remote: &str) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn set_config(&self, _repo: &Utf8Path, _key: &str, _value: &str) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn review_setup(&self, _repo: &Utf8Path) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn apply_mailbox(&self, _repo: &Utf8Path, _patch: &Utf8Path) -> Result<usize, WorkspaceError> {
        Ok(1)
    }

    fn soft_reset(&self, _repo: &Utf8Path, _count: usize) -> Result<(), WorkspaceError> {
        Ok(())
    }

    fn commit(&self, _repo: &Utf8Path, message: &str, _author: &str) -> Result<(), WorkspaceError> {
        let mut journal = self.journal();
        journal.head_message = if find_change_id(message).is_some() {
            message.to_owned()
        } else {
            let change_id = ChangeId::new(format!("I{:040x}", journal.minted.len() + 1));
            let amended = with_minted_change_id(message, &change_id);
            journal.minted.push(change_id);
            amended
        };
        Ok(())
    }

    fn push(&self, _repo: &Utf8Path, remote: &str, refspec: &str) -> Result<(), WorkspaceError> {
        let mut journal = self.journal();
        if journal.pushes_to_reject > 0 {
            journal.pushes_to_reject -= 1;
            return Err(WorkspaceError::CommandFailed {
                command: format!("git push {remote} {refspec}"),
                status: "exit status: 1".to_owned(),
                stdout: String::new(),
                stderr: " ! [remote rejected] HEAD -> refs/for/master (prohibited)".to_owned(),
            });
        }
        let message = journal.head_message.clone();
        journal.pushed.push(message);
        Ok(())
    }

    fn head_message(&self, _repo: &Utf8Path) -> Result<String, WorkspaceError> {
        Ok(self.journal().head_message.clone())
    }

    fn is_repository(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }
}
