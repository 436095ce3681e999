//! Sync orchestration over in-memory repositories.
//!
//! Each test wires the module with a scripted remote source and snapshot so the
//! remote/fallback/unchanged branches can be driven deterministically.

mod common;

use chrono::Utc;
use common::*;
use job_board::config::JobBoardConfig;
use job_board::contract::model::{Credentials, Job, User};
use job_board::domain::credentials::{hash_password, verify_password};
use job_board::domain::fallback::FallbackLoader;
use job_board::domain::mapping::DEFAULT_TITLE;
use job_board::domain::ports::{RemoteJob, Snapshot, UserSecret};
use job_board::domain::repo::{JobsRepository, UsersRepository};
use job_board::domain::service::AccountsService;
use job_board::domain::sync::SyncOutcome;
use job_board::infra::storage::{InMemoryJobsRepository, InMemoryUsersRepository};
use std::sync::Arc;
use uuid::Uuid;

fn ids(jobs: &[Job]) -> Vec<String> {
    jobs.iter().map(|j| j.id.clone()).collect()
}

async fn seed_existing_user(users: &dyn UsersRepository, username: &str) {
    let now = Utc::now();
    users
        .insert(User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password("existing").unwrap(),
            phone: String::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn remote_success_replaces_all_jobs() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![remote("r1", "First"), remote("r2", "Second")]),
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig::default(),
    );

    assert_eq!(h.module.sync().run().await, SyncOutcome::Remote { jobs: 2 });
    assert_eq!(ids(&h.jobs.list().await.unwrap()), vec!["r1", "r2"]);

    // A second run replaces, never merges
    h.source
        .set(SourceBehaviour::Jobs(vec![remote("r3", "Third")]));
    assert_eq!(h.module.sync().run().await, SyncOutcome::Remote { jobs: 1 });
    assert_eq!(ids(&h.jobs.list().await.unwrap()), vec!["r3"]);

    // Users are untouched by a remote sync
    assert!(h.users.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn remote_records_get_defaults_and_dedup() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![
            RemoteJob {
                id: Some("x".into()),
                ..Default::default()
            },
            RemoteJob::default(),
            remote("x", "Duplicate"),
        ]),
        SnapshotBehaviour::Absent,
        JobBoardConfig {
            apply_url_base: "https://jobs.local/apply".into(),
            ..Default::default()
        },
    );

    assert_eq!(h.module.sync().run().await, SyncOutcome::Remote { jobs: 1 });
    let jobs = h.jobs.list().await.unwrap();
    assert_eq!(jobs[0].title, DEFAULT_TITLE);
    assert_eq!(jobs[0].apply_url, "https://jobs.local/apply/x");
}

#[tokio::test]
async fn remote_failure_falls_back_to_snapshot_and_seeds_users() {
    let h = in_memory_harness(
        SourceBehaviour::Fail("connection refused".into()),
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig::default(),
    );
    seed_existing_user(h.users.as_ref(), "previous").await;

    assert_eq!(
        h.module.sync().run().await,
        SyncOutcome::Fallback {
            jobs: 2,
            users: Some(1)
        }
    );
    assert_eq!(ids(&h.jobs.list().await.unwrap()), vec!["s1", "s2"]);

    let users = h.users.list().await.unwrap();
    assert_eq!(users.len(), 1, "user collection is reset, not merged");
    assert_eq!(users[0].username, "seed");
    assert_ne!(users[0].password_hash, "seed-pass");
    assert!(verify_password("seed-pass", &users[0].password_hash));
}

#[tokio::test]
async fn seeded_users_can_log_in() {
    let h = in_memory_harness(
        SourceBehaviour::NotConfigured,
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig::default(),
    );
    h.module.sync().run().await;

    let accounts = AccountsService::new(h.users.clone());
    let profile = accounts
        .login(Credentials {
            username: Some("seed".into()),
            password: Some("seed-pass".into()),
        })
        .await
        .unwrap();
    assert_eq!(profile.email, "seed@example.com");
    assert_eq!(profile.phone, "");
}

#[tokio::test]
async fn user_seeding_can_be_disabled() {
    let h = in_memory_harness(
        SourceBehaviour::Fail("boom".into()),
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig {
            seed_users_from_snapshot: false,
            ..Default::default()
        },
    );
    seed_existing_user(h.users.as_ref(), "keeper").await;

    assert_eq!(
        h.module.sync().run().await,
        SyncOutcome::Fallback {
            jobs: 2,
            users: None
        }
    );
    let users = h.users.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "keeper");
}

#[tokio::test]
async fn empty_remote_list_is_treated_as_failure() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![]),
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig::default(),
    );

    assert!(matches!(
        h.module.sync().run().await,
        SyncOutcome::Fallback { jobs: 2, .. }
    ));
}

#[tokio::test]
async fn remote_list_without_ids_is_treated_as_empty() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![RemoteJob::default(), RemoteJob::default()]),
        SnapshotBehaviour::Present(sample_snapshot()),
        JobBoardConfig::default(),
    );

    assert!(matches!(
        h.module.sync().run().await,
        SyncOutcome::Fallback { jobs: 2, .. }
    ));
}

#[tokio::test]
async fn failure_without_snapshot_leaves_collections_unchanged() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![remote("keep", "Kept")]),
        SnapshotBehaviour::Absent,
        JobBoardConfig::default(),
    );
    h.module.sync().run().await;

    h.source.set(SourceBehaviour::Fail("timeout".into()));
    let outcome = h.module.sync().run().await;

    assert!(matches!(outcome, SyncOutcome::Unchanged { .. }));
    assert_eq!(ids(&h.jobs.list().await.unwrap()), vec!["keep"]);
}

#[tokio::test]
async fn malformed_snapshot_writes_nothing() {
    let h = in_memory_harness(
        SourceBehaviour::Jobs(vec![remote("keep", "Kept")]),
        SnapshotBehaviour::Malformed,
        JobBoardConfig::default(),
    );
    h.module.sync().run().await;
    seed_existing_user(h.users.as_ref(), "keeper").await;

    h.source.set(SourceBehaviour::Jobs(vec![]));
    match h.module.sync().run().await {
        SyncOutcome::Unchanged { reason } => assert!(reason.contains("snapshot")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(h.jobs.count().await.unwrap(), 1);
    assert_eq!(h.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn startup_sync_respects_flag() {
    let disabled = in_memory_harness(
        SourceBehaviour::Jobs(vec![remote("a", "A")]),
        SnapshotBehaviour::Absent,
        JobBoardConfig {
            sync_on_startup: false,
            ..Default::default()
        },
    );
    assert!(disabled.module.spawn_startup_sync().is_none());

    let enabled = in_memory_harness(
        SourceBehaviour::Jobs(vec![remote("a", "A")]),
        SnapshotBehaviour::Absent,
        JobBoardConfig::default(),
    );
    let handle = enabled.module.spawn_startup_sync().unwrap();
    assert_eq!(handle.await.unwrap(), SyncOutcome::Remote { jobs: 1 });
    assert_eq!(enabled.jobs.count().await.unwrap(), 1);
}

#[tokio::test]
async fn restore_users_runs_on_its_own() {
    let jobs = Arc::new(InMemoryJobsRepository::new());
    let users = Arc::new(InMemoryUsersRepository::new());
    let pre_hashed = hash_password("kept-hash").unwrap();

    let mut hashed = snapshot_user("hashed", "unused");
    hashed.secret = UserSecret::Hashed(pre_hashed.clone());
    let mut broken = snapshot_user("broken", "unused");
    broken.secret = UserSecret::Hashed("not-a-phc-string".into());
    let mut duplicate = snapshot_user("plain", "other");
    duplicate.email = "dup@example.com".into();

    let snapshot = Snapshot {
        jobs: vec![remote("j1", "Job")],
        users: vec![
            snapshot_user("plain", "secret"),
            hashed,
            broken,
            duplicate,
            snapshot_user("  ", "blank"),
        ],
    };
    let loader = FallbackLoader::new(
        Arc::new(StubSnapshotSource(SnapshotBehaviour::Present(snapshot.clone()))),
        jobs.clone(),
        users.clone(),
        "https://example.com/apply",
    );

    assert_eq!(loader.restore_users(&snapshot).await.unwrap(), 2);
    assert_eq!(jobs.count().await.unwrap(), 0, "jobs are a separate operation");

    let stored = users.find_by_username("hashed").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, pre_hashed);
    let plain = users.find_by_username("plain").await.unwrap().unwrap();
    assert!(verify_password("secret", &plain.password_hash));
    assert!(users.find_by_username("broken").await.unwrap().is_none());
}
