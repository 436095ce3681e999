use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Credentials, NewAccount, Profile, ProfilePatch, User};
use crate::domain::credentials::{hash_password_blocking, verify_password_blocking};
use crate::domain::error::DomainError;
use crate::domain::mapping::non_blank;
use crate::domain::repo::UsersRepository;

/// Identity fields are stored trimmed.
fn trimmed(value: Option<String>) -> Option<String> {
    non_blank(value).map(|v| v.trim().to_string())
}

/// Signup, login and profile maintenance.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct AccountsService {
    repo: Arc<dyn UsersRepository>,
}

impl AccountsService {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(
        name = "job_board.service.signup",
        skip(self, account),
        fields(username = account.username.as_deref().unwrap_or_default())
    )]
    pub async fn signup(&self, account: NewAccount) -> Result<Profile, DomainError> {
        let (Some(username), Some(password), Some(email)) = (
            trimmed(account.username),
            non_blank(account.password),
            trimmed(account.email),
        ) else {
            return Err(DomainError::validation(
                "username, password and email are required",
            ));
        };

        self.ensure_username_free(&username, None).await?;
        self.ensure_email_free(&email, None).await?;

        let password_hash = hash_password_blocking(password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            phone: trimmed(account.phone).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.repo.insert(user.clone()).await {
            // A concurrent signup may have taken the name between check and insert
            self.ensure_username_free(&user.username, None).await?;
            self.ensure_email_free(&user.email, None).await?;
            return Err(DomainError::database(format!("{e:#}")));
        }

        info!("user signed up");
        Ok(Profile::from(&user))
    }

    #[instrument(
        name = "job_board.service.login",
        skip(self, credentials),
        fields(username = credentials.username.as_deref().unwrap_or_default())
    )]
    pub async fn login(&self, credentials: Credentials) -> Result<Profile, DomainError> {
        let (Some(username), Some(password)) = (
            trimmed(credentials.username),
            non_blank(credentials.password),
        ) else {
            return Err(DomainError::validation("username and password are required"));
        };

        let user = self.find_by_username(&username).await?;
        let verified =
            verify_password_blocking(password, user.as_ref().map(|u| u.password_hash.clone()))
                .await?;

        match user {
            Some(user) if verified => {
                debug!("login succeeded");
                Ok(Profile::from(&user))
            }
            _ => {
                debug!("login rejected");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    #[instrument(name = "job_board.service.update_profile", skip(self, patch))]
    pub async fn update_profile(
        &self,
        username: Option<String>,
        patch: ProfilePatch,
    ) -> Result<Profile, DomainError> {
        let Some(username) = trimmed(username) else {
            return Err(DomainError::validation("username is required"));
        };

        let mut current = self
            .find_by_username(&username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(&username))?;

        let new_username = trimmed(patch.new_username).filter(|n| *n != current.username);
        let email = trimmed(patch.email).filter(|e| *e != current.email);
        let phone = trimmed(patch.phone);

        self.ensure_profile_free(new_username.as_deref(), email.as_deref(), current.id)
            .await?;

        if let Some(ref new_username) = new_username {
            current.username = new_username.clone();
        }
        if let Some(ref email) = email {
            current.email = email.clone();
        }
        if let Some(phone) = phone {
            current.phone = phone;
        }
        current.updated_at = Utc::now();

        if let Err(e) = self.repo.update(current.clone()).await {
            // Another request may have claimed the name or email after the check
            self.ensure_profile_free(new_username.as_deref(), email.as_deref(), current.id)
                .await?;
            return Err(DomainError::database(format!("{e:#}")));
        }

        info!(username = %current.username, "profile updated");
        Ok(Profile::from(&current))
    }

    // --- helpers ---

    async fn ensure_profile_free(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        owner: Uuid,
    ) -> Result<(), DomainError> {
        if let Some(username) = username {
            self.ensure_username_free(username, Some(owner)).await?;
        }
        if let Some(email) = email {
            self.ensure_email_free(email, Some(owner)).await?;
        }
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repo
            .find_by_username(username)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match self.find_by_username(username).await? {
            Some(other) if Some(other.id) != owner => Err(DomainError::conflict(format!(
                "Username '{username}' is already taken"
            ))),
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> Result<(), DomainError> {
        let existing = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        match existing {
            Some(other) if Some(other.id) != owner => Err(DomainError::conflict(format!(
                "Email '{email}' is already registered"
            ))),
            _ => Ok(()),
        }
    }
}
