use thiserror::Error;

/// Request-facing errors raised by the domain services.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("No jobs found")]
    NoJobs,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Failures inside a sync run. Never leaves the orchestrator; folded into `SyncOutcome`.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("remote job source is not configured")]
    SourceNotConfigured,

    #[error("remote job source failed: {message}")]
    Source { message: String },

    #[error("fallback snapshot is unusable: {message}")]
    Snapshot { message: String },

    #[error("storage failed: {message}")]
    Storage { message: String },
}

impl SyncError {
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
