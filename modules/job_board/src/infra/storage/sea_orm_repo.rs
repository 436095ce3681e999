//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait + TransactionTrait`, so they
//! work with a `DatabaseConnection` on SQLite or Postgres.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::contract::model::{Job, User};
use crate::domain::repo::{JobsRepository, UsersRepository};
use crate::infra::storage::entity::{job, user};
use crate::infra::storage::mapper::{job_active_model, user_active_model};

/// Rows per INSERT statement; keeps bound parameters well under SQLite's limit.
const INSERT_CHUNK_ROWS: usize = 100;

pub struct SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> JobsRepository for SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list(&self) -> anyhow::Result<Vec<Job>> {
        let rows = job::Entity::find()
            .order_by_asc(job::Column::Position)
            .all(&self.conn)
            .await
            .context("list jobs failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        job::Entity::find()
            .count(&self.conn)
            .await
            .context("count jobs failed")
    }

    async fn replace_all(&self, jobs: Vec<Job>) -> anyhow::Result<()> {
        let models: Vec<job::ActiveModel> = jobs
            .into_iter()
            .enumerate()
            .map(|(position, j)| job_active_model(j, position as i64))
            .collect();

        let txn = self
            .conn
            .begin()
            .await
            .context("begin jobs transaction failed")?;

        job::Entity::delete_many()
            .exec(&txn)
            .await
            .context("delete jobs failed")?;

        for chunk in models.chunks(INSERT_CHUNK_ROWS) {
            job::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await
                .context("insert jobs failed")?;
        }

        txn.commit().await.context("commit jobs failed")?;
        Ok(())
    }
}

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, u: User) -> anyhow::Result<()> {
        let _ = user_active_model(u)
            .insert(&self.conn)
            .await
            .context("insert user failed")?;
        Ok(())
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        let _ = user_active_model(u)
            .update(&self.conn)
            .await
            .context("update user failed")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Username)
            .all(&self.conn)
            .await
            .context("list users failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn replace_all(&self, users: Vec<User>) -> anyhow::Result<()> {
        let models: Vec<user::ActiveModel> = users.into_iter().map(user_active_model).collect();

        let txn = self
            .conn
            .begin()
            .await
            .context("begin users transaction failed")?;

        user::Entity::delete_many()
            .exec(&txn)
            .await
            .context("delete users failed")?;

        for chunk in models.chunks(INSERT_CHUNK_ROWS) {
            user::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await
                .context("insert users failed")?;
        }

        txn.commit().await.context("commit users failed")?;
        Ok(())
    }
}
