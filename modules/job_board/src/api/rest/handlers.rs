use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::ApiErrorResponse;
use tracing::{info, warn};

use crate::api::rest::dto::{
    HealthDto, JobDto, LoginReq, MessageDto, SignupReq, UpdateProfileReq, UserDto, UserMessageDto,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection};
use crate::domain::service::{AccountsService, JobsService};

/// List all jobs in source order
pub async fn list_jobs(
    Extension(svc): Extension<Arc<JobsService>>,
    uri: Uri,
) -> Result<Json<Vec<JobDto>>, ApiErrorResponse> {
    match svc.list_jobs().await {
        Ok(jobs) => Ok(Json(jobs.into_iter().map(JobDto::from).collect())),
        Err(e) => {
            warn!("Failed to list jobs: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Register a new account
pub async fn signup(
    uri: Uri,
    Extension(svc): Extension<Arc<AccountsService>>,
    body: Result<Json<SignupReq>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageDto>), ApiErrorResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;

    match svc.signup(req.into()).await {
        Ok(profile) => {
            info!("Signed up user {}", profile.username);
            Ok((
                StatusCode::CREATED,
                Json(MessageDto {
                    message: "User created successfully".to_string(),
                }),
            ))
        }
        Err(e) => {
            warn!("Signup failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Check credentials and return the user's profile
pub async fn login(
    uri: Uri,
    Extension(svc): Extension<Arc<AccountsService>>,
    body: Result<Json<LoginReq>, JsonRejection>,
) -> Result<Json<UserMessageDto>, ApiErrorResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;

    match svc.login(req.into()).await {
        Ok(profile) => Ok(Json(UserMessageDto {
            message: "Login successful".to_string(),
            user: UserDto::from(profile),
        })),
        Err(e) => {
            warn!("Login failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Apply a partial profile update
pub async fn update_profile(
    uri: Uri,
    Extension(svc): Extension<Arc<AccountsService>>,
    body: Result<Json<UpdateProfileReq>, JsonRejection>,
) -> Result<Json<UserMessageDto>, ApiErrorResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    let (username, patch) = req.into_parts();

    match svc.update_profile(username, patch).await {
        Ok(profile) => Ok(Json(UserMessageDto {
            message: "Profile updated successfully".to_string(),
            user: UserDto::from(profile),
        })),
        Err(e) => {
            warn!("Profile update failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}
