use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::{AccountsService, JobsService};

/// Build the module's router: `/api/*`, `/health` and JSON fallbacks for
/// unknown paths and unsupported methods.
pub fn register_routes(
    router: Router,
    jobs: Arc<JobsService>,
    accounts: Arc<AccountsService>,
) -> Router {
    router
        .route("/api/jobs", get(handlers::list_jobs))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route("/api/profile", put(handlers::update_profile))
        .route("/health", get(handlers::health))
        .fallback(modkit::route_not_found)
        .method_not_allowed_fallback(modkit::method_not_allowed)
        .layer(Extension(jobs))
        .layer(Extension(accounts))
}
