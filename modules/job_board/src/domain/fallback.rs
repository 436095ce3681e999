use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::User;
use crate::domain::credentials;
use crate::domain::error::SyncError;
use crate::domain::mapping::{map_jobs, non_blank};
use crate::domain::ports::{Snapshot, SnapshotSource, UserSecret};
use crate::domain::repo::{JobsRepository, UsersRepository};

/// Restores collections from the bundled snapshot.
/// Each operation is usable on its own; callers decide which collections to reset.
#[derive(Clone)]
pub struct FallbackLoader {
    snapshots: Arc<dyn SnapshotSource>,
    jobs: Arc<dyn JobsRepository>,
    users: Arc<dyn UsersRepository>,
    apply_url_base: String,
}

impl FallbackLoader {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        jobs: Arc<dyn JobsRepository>,
        users: Arc<dyn UsersRepository>,
        apply_url_base: impl Into<String>,
    ) -> Self {
        Self {
            snapshots,
            jobs,
            users,
            apply_url_base: apply_url_base.into(),
        }
    }

    #[instrument(name = "job_board.fallback.load", skip(self))]
    pub async fn load(&self) -> Result<Option<Snapshot>, SyncError> {
        let snapshot = self.snapshots.load().await?;
        if snapshot.is_none() {
            info!("no fallback snapshot available");
        }
        Ok(snapshot)
    }

    /// Replace the job collection with the snapshot's jobs. Returns the stored count.
    #[instrument(name = "job_board.fallback.restore_jobs", skip_all)]
    pub async fn restore_jobs(&self, snapshot: &Snapshot) -> Result<usize, SyncError> {
        let jobs = map_jobs(snapshot.jobs.clone(), &self.apply_url_base);
        let count = jobs.len();

        self.jobs
            .replace_all(jobs)
            .await
            .map_err(|e| SyncError::storage(format!("{e:#}")))?;

        info!(count, "jobs restored from snapshot");
        Ok(count)
    }

    /// Replace the user collection with the snapshot's users, hashing clear-text
    /// passwords first. Returns the stored count.
    #[instrument(name = "job_board.fallback.restore_users", skip_all)]
    pub async fn restore_users(&self, snapshot: &Snapshot) -> Result<usize, SyncError> {
        let mut seen_usernames = HashSet::new();
        let mut seen_emails = HashSet::new();
        let mut users = Vec::with_capacity(snapshot.users.len());
        let now = Utc::now();

        for entry in &snapshot.users {
            let (Some(username), Some(email)) = (
                non_blank(Some(entry.username.clone())),
                non_blank(Some(entry.email.clone())),
            ) else {
                warn!("skipping snapshot user without username or email");
                continue;
            };

            if !seen_usernames.insert(username.clone()) || !seen_emails.insert(email.clone()) {
                warn!(%username, "skipping duplicate snapshot user");
                continue;
            }

            let password_hash = match &entry.secret {
                UserSecret::Plain(plain) => credentials::hash_password_blocking(plain.clone())
                    .await
                    .map_err(|e| SyncError::storage(e.to_string()))?,
                UserSecret::Hashed(phc) if credentials::is_valid_hash(phc) => phc.clone(),
                UserSecret::Hashed(_) => {
                    warn!(%username, "skipping snapshot user with malformed password_hash");
                    continue;
                }
            };

            users.push(User {
                id: Uuid::new_v4(),
                username,
                email,
                password_hash,
                phone: entry.phone.clone().unwrap_or_default(),
                created_at: now,
                updated_at: now,
            });
        }

        let count = users.len();
        self.users
            .replace_all(users)
            .await
            .map_err(|e| SyncError::storage(format!("{e:#}")))?;

        info!(count, "users restored from snapshot");
        Ok(count)
    }
}
