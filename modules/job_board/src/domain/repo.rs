use crate::contract::model::{Job, User};
use async_trait::async_trait;

/// Persistence port for the job collection.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait JobsRepository: Send + Sync {
    /// All jobs in the order they were delivered by their source.
    async fn list(&self) -> anyhow::Result<Vec<Job>>;
    async fn count(&self) -> anyhow::Result<u64>;
    /// Delete every job and insert `jobs` as one unit of visibility.
    /// On error the previous collection stays in place.
    async fn replace_all(&self, jobs: Vec<Job>) -> anyhow::Result<()>;
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Insert a fully-formed user; fails on duplicate username or email.
    async fn insert(&self, user: User) -> anyhow::Result<()>;
    /// Update an existing user (by primary key in `user.id`).
    async fn update(&self, user: User) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    /// Delete every user and insert `users` as one unit of visibility.
    async fn replace_all(&self, users: Vec<User>) -> anyhow::Result<()>;
}
