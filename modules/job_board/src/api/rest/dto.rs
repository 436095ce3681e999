use serde::{Deserialize, Serialize};

use crate::contract::model::{Credentials, Job, NewAccount, Profile, ProfilePatch};

/// REST DTO for a job posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDto {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub apply_url: String,
}

/// REST DTO for the public part of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupReq {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginReq {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileReq {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "newUsername")]
    pub new_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

/// Response carrying a message and the affected user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessageDto {
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Job> for JobDto {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            title: j.title,
            company: j.company,
            location: j.location,
            description: j.description,
            requirements: j.requirements,
            apply_url: j.apply_url,
        }
    }
}

impl From<Profile> for UserDto {
    fn from(p: Profile) -> Self {
        Self {
            username: p.username,
            email: p.email,
            phone: p.phone,
        }
    }
}

impl From<SignupReq> for NewAccount {
    fn from(req: SignupReq) -> Self {
        Self {
            username: req.username,
            password: req.password,
            email: req.email,
            phone: req.phone,
        }
    }
}

impl From<LoginReq> for Credentials {
    fn from(req: LoginReq) -> Self {
        Self {
            username: req.username,
            password: req.password,
        }
    }
}

impl UpdateProfileReq {
    /// Split into the lookup key and the patch to apply.
    pub fn into_parts(self) -> (Option<String>, ProfilePatch) {
        (
            self.username,
            ProfilePatch {
                new_username: self.new_username,
                email: self.email,
                phone: self.phone,
            },
        )
    }
}
