//! Shared fixtures for the job_board integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use job_board::config::JobBoardConfig;
use job_board::domain::error::SyncError;
use job_board::domain::ports::{
    JobSource, RemoteJob, Snapshot, SnapshotSource, SnapshotUser, UserSecret,
};
use job_board::infra::storage::migrations::Migrator;
use job_board::infra::storage::{InMemoryJobsRepository, InMemoryUsersRepository};
use job_board::JobBoard;

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn remote(id: &str, title: &str) -> RemoteJob {
    RemoteJob {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        company: Some("Acme".to_string()),
        ..Default::default()
    }
}

pub fn snapshot_user(username: &str, password: &str) -> SnapshotUser {
    SnapshotUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        phone: None,
        secret: UserSecret::Plain(password.to_string()),
    }
}

pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        jobs: vec![remote("s1", "Snapshot One"), remote("s2", "Snapshot Two")],
        users: vec![snapshot_user("seed", "seed-pass")],
    }
}

/// Behaviour of the stubbed remote source.
#[derive(Clone)]
pub enum SourceBehaviour {
    Jobs(Vec<RemoteJob>),
    Fail(String),
    NotConfigured,
}

/// Scripted `JobSource`; the behaviour can be swapped between runs.
pub struct StubJobSource {
    behaviour: Mutex<SourceBehaviour>,
}

impl StubJobSource {
    pub fn new(behaviour: SourceBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour: Mutex::new(behaviour),
        })
    }

    pub fn set(&self, behaviour: SourceBehaviour) {
        *self.behaviour.lock() = behaviour;
    }
}

#[async_trait]
impl JobSource for StubJobSource {
    async fn fetch_jobs(&self) -> Result<Vec<RemoteJob>, SyncError> {
        match self.behaviour.lock().clone() {
            SourceBehaviour::Jobs(jobs) => Ok(jobs),
            SourceBehaviour::Fail(msg) => Err(SyncError::source(msg)),
            SourceBehaviour::NotConfigured => Err(SyncError::SourceNotConfigured),
        }
    }
}

/// Behaviour of the stubbed snapshot source.
#[derive(Clone)]
pub enum SnapshotBehaviour {
    Present(Snapshot),
    Absent,
    Malformed,
}

pub struct StubSnapshotSource(pub SnapshotBehaviour);

#[async_trait]
impl SnapshotSource for StubSnapshotSource {
    async fn load(&self) -> Result<Option<Snapshot>, SyncError> {
        match &self.0 {
            SnapshotBehaviour::Present(s) => Ok(Some(s.clone())),
            SnapshotBehaviour::Absent => Ok(None),
            SnapshotBehaviour::Malformed => Err(SyncError::snapshot("unexpected end of input")),
        }
    }
}

/// Module wired over in-memory repositories and stubbed sources.
pub struct InMemoryHarness {
    pub jobs: Arc<InMemoryJobsRepository>,
    pub users: Arc<InMemoryUsersRepository>,
    pub source: Arc<StubJobSource>,
    pub module: JobBoard,
}

pub fn in_memory_harness(
    source: SourceBehaviour,
    snapshot: SnapshotBehaviour,
    cfg: JobBoardConfig,
) -> InMemoryHarness {
    let jobs = Arc::new(InMemoryJobsRepository::new());
    let users = Arc::new(InMemoryUsersRepository::new());
    let source = StubJobSource::new(source);
    let module = JobBoard::new(
        jobs.clone(),
        users.clone(),
        source.clone(),
        Arc::new(StubSnapshotSource(snapshot)),
        &cfg,
    );
    InMemoryHarness {
        jobs,
        users,
        source,
        module,
    }
}
