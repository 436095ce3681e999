use async_trait::async_trait;

use crate::domain::error::SyncError;
use crate::domain::ports::source::RemoteJob;

/// How a seeded user's password is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSecret {
    /// Clear text, hashed before it is stored.
    Plain(String),
    /// An existing PHC hash string, stored as-is.
    Hashed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotUser {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub secret: UserSecret,
}

/// Bundled data used when the remote source is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub jobs: Vec<RemoteJob>,
    pub users: Vec<SnapshotUser>,
}

/// Output port: loads the fallback snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// `Ok(None)` when no snapshot exists; `Err` when one exists but cannot be used.
    async fn load(&self) -> Result<Option<Snapshot>, SyncError>;
}
