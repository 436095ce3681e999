//! Process-local repositories used for isolated tests and diagnostics.

use std::collections::HashSet;

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::{Job, User};
use crate::domain::repo::{JobsRepository, UsersRepository};

#[derive(Default)]
pub struct InMemoryJobsRepository {
    jobs: RwLock<Vec<Job>>,
}

impl InMemoryJobsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobsRepository for InMemoryJobsRepository {
    async fn list(&self) -> anyhow::Result<Vec<Job>> {
        Ok(self.jobs.read().clone())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.jobs.read().len() as u64)
    }

    async fn replace_all(&self, jobs: Vec<Job>) -> anyhow::Result<()> {
        let mut ids = HashSet::with_capacity(jobs.len());
        for j in &jobs {
            if !ids.insert(j.id.as_str()) {
                bail!("duplicate job id '{}'", j.id);
            }
        }
        *self.jobs.write() = jobs;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsersRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(users: &[User]) -> anyhow::Result<()> {
    let mut names = HashSet::with_capacity(users.len());
    let mut emails = HashSet::with_capacity(users.len());
    for u in users {
        if !names.insert(u.username.as_str()) {
            bail!("duplicate username '{}'", u.username);
        }
        if !emails.insert(u.email.as_str()) {
            bail!("duplicate email '{}'", u.email);
        }
    }
    Ok(())
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> anyhow::Result<()> {
        let mut users = self.users.write();
        if users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username || u.email == user.email)
        {
            bail!("user '{}' violates a unique constraint", user.username);
        }
        users.push(user);
        Ok(())
    }

    async fn update(&self, user: User) -> anyhow::Result<()> {
        let mut users = self.users.write();
        if users
            .iter()
            .any(|u| u.id != user.id && (u.username == user.username || u.email == user.email))
        {
            bail!("user '{}' violates a unique constraint", user.username);
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => bail!("user {} does not exist", user.id),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().clone())
    }

    async fn replace_all(&self, users: Vec<User>) -> anyhow::Result<()> {
        check_unique(&users)?;
        *self.users.write() = users;
        Ok(())
    }
}
