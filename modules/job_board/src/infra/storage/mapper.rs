use sea_orm::Set;

use crate::contract::model::{Job, User};
use crate::infra::storage::entity::{job, user};

impl From<job::Model> for Job {
    fn from(m: job::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            company: m.company,
            location: m.location,
            description: m.description,
            requirements: m.requirements,
            apply_url: m.apply_url,
        }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            password_hash: m.password_hash,
            phone: m.phone,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Active model for a job stored at `position` in the collection.
pub fn job_active_model(j: Job, position: i64) -> job::ActiveModel {
    job::ActiveModel {
        id: Set(j.id),
        position: Set(position),
        title: Set(j.title),
        company: Set(j.company),
        location: Set(j.location),
        description: Set(j.description),
        requirements: Set(j.requirements),
        apply_url: Set(j.apply_url),
    }
}

pub fn user_active_model(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        username: Set(u.username),
        email: Set(u.email),
        password_hash: Set(u.password_hash),
        phone: Set(u.phone),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}
