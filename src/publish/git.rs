//! Thin async wrapper over the `git` binary.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Returns true if git reported that there was nothing to commit.
    pub fn nothing_to_commit(&self) -> bool {
        let needle = "nothing to commit";
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }

    /// Returns the most useful diagnostic line for logging.
    pub fn summary(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Trait for running git commands - enables mocking for tests.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Runs git with the given arguments. Spawn failures are errors; non-zero exits are not.
    async fn run(&self, args: &[String]) -> Result<GitOutput>;
}

/// Runs the system `git` binary.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    /// Runs git in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git in the given directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: Some(workdir.into()) }
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, args: &[String]) -> Result<GitOutput> {
        debug!("git {}", args.join(" "));

        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = command.output().await.context("Failed to run git")?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_commit_detection() {
        let output = GitOutput {
            success: false,
            stdout: "On branch main\nnothing to commit, working tree clean\n".to_string(),
            stderr: String::new(),
        };
        assert!(output.nothing_to_commit());
        assert!(!GitOutput::default().nothing_to_commit());
    }

    #[test]
    fn test_summary_prefers_stderr() {
        let output = GitOutput {
            success: false,
            stdout: "out\n".to_string(),
            stderr: "fatal: no remote\n".to_string(),
        };
        assert_eq!(output.summary(), "fatal: no remote");

        let output = GitOutput { stdout: " out \n".to_string(), ..Default::default() };
        assert_eq!(output.summary(), "out");
    }

    #[tokio::test]
    async fn test_system_git_reports_failure_without_erroring() {
        let dir = tempfile::TempDir::new().unwrap();
        let git = SystemGit::in_dir(dir.path());

        // Not a repository; git may also be missing entirely on the host
        match git.run(&["status".to_string()]).await {
            Ok(output) => assert!(!output.success),
            Err(e) => assert!(e.to_string().contains("Failed to run git")),
        }
    }
}
