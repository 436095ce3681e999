use std::sync::Arc;

use tracing::{debug, instrument};

use crate::contract::model::Job;
use crate::domain::error::DomainError;
use crate::domain::repo::JobsRepository;

/// Read side of the job collection.
#[derive(Clone)]
pub struct JobsService {
    repo: Arc<dyn JobsRepository>,
}

impl JobsService {
    pub fn new(repo: Arc<dyn JobsRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "job_board.service.list_jobs", skip(self))]
    pub async fn list_jobs(&self) -> Result<Vec<Job>, DomainError> {
        let jobs = self
            .repo
            .list()
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        if jobs.is_empty() {
            return Err(DomainError::NoJobs);
        }

        debug!(count = jobs.len(), "listed jobs");
        Ok(jobs)
    }
}
