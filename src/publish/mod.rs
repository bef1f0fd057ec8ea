//! Optional publishing of the output file to a git repository.

pub mod git;

use crate::config::Config;
use crate::feed::PublishStatus;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use git::{GitOutput, GitRunner, SystemGit};

/// Trait for publishing the written feed.
///
/// Publishing never fails a run: problems are logged and reported through
/// the returned status.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, path: &Path) -> PublishStatus;
}

/// Commits the output file and pushes it, retrying on failure.
pub struct GitPublisher<R: GitRunner = SystemGit> {
    runner: R,
    remote: Option<String>,
    branch: Option<String>,
    user_name: String,
    user_email: String,
    attempts: u32,
    delay_ms: u64,
}

impl GitPublisher<SystemGit> {
    /// Creates a publisher that runs the system git in the current directory.
    pub fn new(config: &Config) -> Self {
        Self::with_runner(config, SystemGit::new())
    }
}

impl<R: GitRunner> GitPublisher<R> {
    /// Creates a publisher with a custom git runner (for testing).
    pub fn with_runner(config: &Config, runner: R) -> Self {
        Self {
            runner,
            remote: config.git_remote.clone(),
            branch: config.git_branch.clone(),
            user_name: config.git_user_name.clone(),
            user_email: config.git_user_email.clone(),
            attempts: config.publish_attempts.max(1),
            delay_ms: config.publish_delay_ms,
        }
    }

    fn add_args(&self, path: &Path) -> Vec<String> {
        vec!["add".to_string(), path.to_string_lossy().into_owned()]
    }

    fn commit_args(&self, path: &Path) -> Vec<String> {
        vec![
            "-c".to_string(),
            format!("user.name={}", self.user_name),
            "-c".to_string(),
            format!("user.email={}", self.user_email),
            "commit".to_string(),
            "-m".to_string(),
            commit_message(path),
        ]
    }

    fn push_args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string()];
        match (&self.remote, &self.branch) {
            (Some(remote), Some(branch)) => args.extend([remote.clone(), branch.clone()]),
            (Some(remote), None) => args.push(remote.clone()),
            (None, Some(branch)) => args.extend(["origin".to_string(), branch.clone()]),
            (None, None) => {}
        }
        args
    }

    /// Runs git and turns a non-zero exit into an error.
    async fn git(&self, args: &[String]) -> Result<GitOutput> {
        let output = self.runner.run(args).await?;
        if !output.success {
            anyhow::bail!("git {} failed: {}", args[0], output.summary());
        }
        Ok(output)
    }

    /// Stages and commits the file. Returns false if there was nothing to commit.
    async fn commit(&self, path: &Path) -> Result<bool> {
        self.git(&self.add_args(path)).await?;

        let output = self.runner.run(&self.commit_args(path)).await?;
        if output.success {
            return Ok(true);
        }
        if output.nothing_to_commit() {
            return Ok(false);
        }
        anyhow::bail!("git commit failed: {}", output.summary())
    }

    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        debug!("Delaying {}ms before retrying publish", self.delay_ms);
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

#[async_trait]
impl<R: GitRunner> Publisher for GitPublisher<R> {
    async fn publish(&self, path: &Path) -> PublishStatus {
        // Set once the commit step is done: Some(true) if a new commit was made
        let mut changed: Option<bool> = None;

        for attempt in 1..=self.attempts {
            debug!("Publish attempt {}/{}", attempt, self.attempts);

            if changed.is_none() {
                match self.commit(path).await {
                    Ok(true) => changed = Some(true),
                    Ok(false) => {
                        // An earlier commit may still be waiting to be pushed
                        debug!("{} unchanged, pushing any pending commits", path.display());
                        changed = Some(false);
                    }
                    Err(e) => {
                        warn!("Publish attempt {} failed: {:#}", attempt, e);
                        if attempt < self.attempts {
                            self.delay().await;
                        }
                        continue;
                    }
                }
            }

            match self.git(&self.push_args()).await {
                Ok(_) if changed == Some(true) => {
                    info!("Pushed {}", path.display());
                    return PublishStatus::Pushed;
                }
                Ok(_) => {
                    info!("{} unchanged, remote is up to date", path.display());
                    return PublishStatus::Unchanged;
                }
                Err(e) => warn!("Publish attempt {} failed: {:#}", attempt, e),
            }

            if attempt < self.attempts {
                self.delay().await;
            }
        }

        warn!("Publishing {} failed after {} attempts", path.display(), self.attempts);
        PublishStatus::Failed
    }
}

/// Builds the commit message, e.g. `Auto-update norsk-feed.xml [2026-01-31 06:00:00]`.
fn commit_message(path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    format!("Auto-update {} [{}]", name, chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
}
