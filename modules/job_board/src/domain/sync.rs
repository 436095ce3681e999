use std::fmt;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::domain::error::SyncError;
use crate::domain::fallback::FallbackLoader;
use crate::domain::mapping::map_jobs;
use crate::domain::ports::JobSource;
use crate::domain::repo::JobsRepository;

/// Result of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Jobs were replaced with the remote list.
    Remote { jobs: usize },
    /// Jobs (and possibly users) were replaced from the snapshot.
    /// `users` is `None` when users were not reseeded.
    Fallback { jobs: usize, users: Option<usize> },
    /// Nothing was written.
    Unchanged { reason: String },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { jobs } => write!(f, "synced {jobs} jobs from the remote source"),
            Self::Fallback { jobs, users } => {
                write!(f, "restored {jobs} jobs from the fallback snapshot")?;
                match users {
                    Some(users) => write!(f, " and reseeded {users} users"),
                    None => Ok(()),
                }
            }
            Self::Unchanged { reason } => write!(f, "collections unchanged: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub apply_url_base: String,
    /// Reset the user collection whenever the snapshot is used.
    pub seed_users_from_snapshot: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            apply_url_base: "https://example.com/apply".to_string(),
            seed_users_from_snapshot: true,
        }
    }
}

/// One-shot remote-to-store synchronization with a snapshot fallback.
#[derive(Clone)]
pub struct SyncOrchestrator {
    source: Arc<dyn JobSource>,
    jobs: Arc<dyn JobsRepository>,
    fallback: FallbackLoader,
    config: SyncConfig,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn JobSource>,
        jobs: Arc<dyn JobsRepository>,
        fallback: FallbackLoader,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            jobs,
            fallback,
            config,
        }
    }

    /// Run a sync. Never fails: every error is logged and folded into the outcome.
    #[instrument(name = "job_board.sync.run", skip(self))]
    pub async fn run(&self) -> SyncOutcome {
        info!("starting job sync");

        let remote = match self.source.fetch_jobs().await {
            Ok(records) => {
                let jobs = map_jobs(records, &self.config.apply_url_base);
                if jobs.is_empty() {
                    warn!("remote source returned no usable jobs");
                    None
                } else {
                    Some(jobs)
                }
            }
            Err(SyncError::SourceNotConfigured) => {
                info!("no remote source configured");
                None
            }
            Err(e) => {
                warn!(error = %e, "remote fetch failed");
                None
            }
        };

        let outcome = match remote {
            Some(jobs) => {
                let count = jobs.len();
                match self.jobs.replace_all(jobs).await {
                    Ok(()) => SyncOutcome::Remote { jobs: count },
                    Err(e) => {
                        error!(error = %format!("{e:#}"), "failed to store remote jobs");
                        SyncOutcome::Unchanged {
                            reason: SyncError::storage(format!("{e:#}")).to_string(),
                        }
                    }
                }
            }
            None => self.run_fallback().await,
        };

        info!(%outcome, "job sync finished");
        outcome
    }

    async fn run_fallback(&self) -> SyncOutcome {
        let snapshot = match self.fallback.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                return SyncOutcome::Unchanged {
                    reason: "no fallback snapshot available".to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, "fallback snapshot load failed");
                return SyncOutcome::Unchanged {
                    reason: e.to_string(),
                };
            }
        };

        let jobs = match self.fallback.restore_jobs(&snapshot).await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "restoring jobs from snapshot failed");
                return SyncOutcome::Unchanged {
                    reason: e.to_string(),
                };
            }
        };

        let users = if self.config.seed_users_from_snapshot {
            match self.fallback.restore_users(&snapshot).await {
                Ok(count) => Some(count),
                Err(e) => {
                    error!(error = %e, "restoring users from snapshot failed");
                    None
                }
            }
        } else {
            None
        };

        SyncOutcome::Fallback { jobs, users }
    }
}
