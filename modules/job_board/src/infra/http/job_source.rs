use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::error::SyncError;
use crate::domain::ports::{JobSource, RemoteJob};
use crate::infra::payload::parse_jobs_payload;
use modkit::TracedClient;

/// HTTP adapter implementing the `JobSource` port with a single `GET {url}`.
pub struct HttpJobSource {
    client: TracedClient,
    url: Option<Url>,
}

impl HttpJobSource {
    /// `url: None` builds a source that reports `SourceNotConfigured` on every fetch.
    pub fn new(client: TracedClient, url: Option<Url>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    #[instrument(
        name = "job_board.http.fetch_jobs",
        skip_all,
        fields(url = self.url.as_ref().map(Url::as_str).unwrap_or("<unset>"))
    )]
    async fn fetch_jobs(&self) -> Result<Vec<RemoteJob>, SyncError> {
        let url = self.url.as_ref().ok_or(SyncError::SourceNotConfigured)?;

        let response = self.client.get(url.as_str()).await.map_err(|e| {
            if e.is_timeout() {
                SyncError::source("request timed out")
            } else {
                SyncError::source(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::source(format!("HTTP {status}")));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::source("reading body timed out")
            } else {
                SyncError::source(format!("reading body failed: {e}"))
            }
        })?;

        let jobs = parse_jobs_payload(&body).map_err(SyncError::source)?;
        debug!(count = jobs.len(), "fetched remote job records");
        Ok(jobs)
    }
}
