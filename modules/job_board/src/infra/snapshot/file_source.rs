use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::error::SyncError;
use crate::domain::ports::{Snapshot, SnapshotSource, SnapshotUser, UserSecret};
use crate::infra::payload::RemoteJobRecord;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    jobs: Vec<RemoteJobRecord>,
    #[serde(default)]
    users: Vec<SnapshotUserRecord>,
}

#[derive(Debug, Deserialize)]
struct SnapshotUserRecord {
    username: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_hash: Option<String>,
}

impl TryFrom<SnapshotUserRecord> for SnapshotUser {
    type Error = SyncError;

    fn try_from(r: SnapshotUserRecord) -> Result<Self, Self::Error> {
        let secret = match (r.password_hash, r.password) {
            (Some(hash), _) if !hash.trim().is_empty() => UserSecret::Hashed(hash),
            (_, Some(plain)) if !plain.is_empty() => UserSecret::Plain(plain),
            _ => {
                return Err(SyncError::snapshot(format!(
                    "user '{}' has neither password nor password_hash",
                    r.username
                )))
            }
        };
        Ok(Self {
            username: r.username,
            email: r.email,
            phone: r.phone,
            secret,
        })
    }
}

/// Reads the fallback snapshot from a JSON file on every `load`.
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a snapshot document.
pub fn parse_snapshot(body: &[u8]) -> Result<Snapshot, SyncError> {
    let file: SnapshotFile = serde_json::from_slice(body)
        .map_err(|e| SyncError::snapshot(format!("invalid snapshot JSON: {e}")))?;

    let users = file
        .users
        .into_iter()
        .map(SnapshotUser::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Snapshot {
        jobs: file.jobs.into_iter().map(Into::into).collect(),
        users,
    })
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    #[instrument(name = "job_board.snapshot.load", skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Snapshot>, SyncError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("snapshot file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(SyncError::snapshot(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let snapshot = parse_snapshot(&body)?;
        debug!(
            jobs = snapshot.jobs.len(),
            users = snapshot.users.len(),
            "snapshot loaded"
        );
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sections_default_to_empty() {
        assert_eq!(parse_snapshot(b"{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn users_carry_plain_or_hashed_secrets() {
        let snapshot = parse_snapshot(
            br#"{
                "users": [
                    {"username":"ann","email":"ann@example.com","password":"pw"},
                    {"username":"bob","email":"bob@example.com","phone":"555","password_hash":"$argon2id$x"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.users[0].secret, UserSecret::Plain("pw".into()));
        assert_eq!(snapshot.users[0].phone, None);
        assert_eq!(
            snapshot.users[1].secret,
            UserSecret::Hashed("$argon2id$x".into())
        );
        assert_eq!(snapshot.users[1].phone.as_deref(), Some("555"));
    }

    #[test]
    fn user_without_secret_is_rejected() {
        let err = parse_snapshot(br#"{"users":[{"username":"ann","email":"a@x"}]}"#).unwrap_err();
        assert!(matches!(err, SyncError::Snapshot { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse_snapshot(b"{\"jobs\": [").is_err());
        assert!(parse_snapshot(br#"{"jobs": {}}"#).is_err());
    }
}
