use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use modkit::TracedClient;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use url::Url;

use crate::api::rest::routes;
use crate::config::JobBoardConfig;
use crate::domain::fallback::FallbackLoader;
use crate::domain::ports::{JobSource, SnapshotSource};
use crate::domain::repo::{JobsRepository, UsersRepository};
use crate::domain::service::{AccountsService, JobsService};
use crate::domain::sync::{SyncConfig, SyncOrchestrator, SyncOutcome};
use crate::infra::http::HttpJobSource;
use crate::infra::snapshot::FileSnapshotSource;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmJobsRepository, SeaOrmUsersRepository};

/// The job board module: domain services, the sync orchestrator and the REST router,
/// wired over whatever adapters the caller supplies.
#[derive(Clone)]
pub struct JobBoard {
    jobs: Arc<JobsService>,
    accounts: Arc<AccountsService>,
    sync: Arc<SyncOrchestrator>,
    sync_on_startup: bool,
}

impl JobBoard {
    /// Wire the module over explicit ports.
    pub fn new(
        jobs_repo: Arc<dyn JobsRepository>,
        users_repo: Arc<dyn UsersRepository>,
        source: Arc<dyn JobSource>,
        snapshots: Arc<dyn SnapshotSource>,
        cfg: &JobBoardConfig,
    ) -> Self {
        let fallback = FallbackLoader::new(
            snapshots,
            jobs_repo.clone(),
            users_repo.clone(),
            cfg.apply_url_base.clone(),
        );
        let sync = SyncOrchestrator::new(
            source,
            jobs_repo.clone(),
            fallback,
            SyncConfig {
                apply_url_base: cfg.apply_url_base.clone(),
                seed_users_from_snapshot: cfg.seed_users_from_snapshot,
            },
        );

        Self {
            jobs: Arc::new(JobsService::new(jobs_repo)),
            accounts: Arc::new(AccountsService::new(users_repo)),
            sync: Arc::new(sync),
            sync_on_startup: cfg.sync_on_startup,
        }
    }

    /// Wire the module over SeaORM storage, the HTTP job source and the snapshot file.
    /// `snapshot_path` must already be resolved against the home directory.
    pub fn with_database(
        db: DatabaseConnection,
        cfg: &JobBoardConfig,
        snapshot_path: PathBuf,
    ) -> anyhow::Result<Self> {
        let source_url = cfg
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Url::parse)
            .transpose()
            .context("modules.job_board.source_url is not a valid URL")?;
        debug!(
            source_url = source_url.as_ref().map(Url::as_str),
            snapshot = %snapshot_path.display(),
            "job_board adapters configured"
        );

        let client = TracedClient::with_timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .context("failed to build HTTP client")?;

        Ok(Self::new(
            Arc::new(SeaOrmJobsRepository::new(db.clone())),
            Arc::new(SeaOrmUsersRepository::new(db)),
            Arc::new(HttpJobSource::new(client, source_url)),
            Arc::new(FileSnapshotSource::new(snapshot_path)),
            cfg,
        ))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running job_board database migrations");
        Migrator::up(db, None)
            .await
            .context("job_board migrations failed")?;
        info!("job_board database migrations completed");
        Ok(())
    }

    pub fn router(&self) -> Router {
        routes::register_routes(Router::new(), self.jobs.clone(), self.accounts.clone())
    }

    pub fn sync(&self) -> Arc<SyncOrchestrator> {
        self.sync.clone()
    }

    /// Run one sync in the background when `sync_on_startup` is enabled.
    pub fn spawn_startup_sync(&self) -> Option<JoinHandle<SyncOutcome>> {
        if !self.sync_on_startup {
            info!("startup sync disabled");
            return None;
        }
        let sync = self.sync.clone();
        Some(tokio::spawn(async move { sync.run().await }))
    }
}
