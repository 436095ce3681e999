use async_trait::async_trait;

use crate::domain::error::SyncError;

/// A job record as delivered by an external source, already flattened to text.
/// Every field may be missing; defaults are applied when mapping to `Job`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteJob {
    pub id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub apply_url: Option<String>,
}

/// Output port: where fresh job listings come from.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the current job list. An empty list is a valid answer.
    async fn fetch_jobs(&self) -> Result<Vec<RemoteJob>, SyncError>;
}
