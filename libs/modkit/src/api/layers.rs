use std::time::Duration;

use axum::{middleware::from_fn, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::api::error::error_mapping_middleware;
use crate::api::request_id::{self, MakeReqId};

/// Knobs for the process-wide HTTP middleware stack.
#[derive(Debug, Clone)]
pub struct HttpLayerOptions {
    /// Handler timeout; `None` disables it.
    pub timeout: Option<Duration>,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for HttpLayerOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            cors_enabled: false,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// Wrap a fully assembled router with the global middleware stack.
///
/// Layers added last run first, so the request passes (outermost first):
/// propagate id → set id → push id to extensions/span → trace → error mapping → timeout → cors → body limit.
/// Error mapping wraps the timeout and limit layers so their rejections get JSON bodies.
pub fn apply_global_layers(mut router: Router, opts: &HttpLayerOptions) -> Router {
    let x_request_id = request_id::header();

    router = router.layer(RequestBodyLimitLayer::new(opts.body_limit_bytes));

    if opts.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    if let Some(timeout) = opts.timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router = router.layer(from_fn(error_mapping_middleware));

    router = router.layer(request_id::create_trace_layer());
    router = router.layer(from_fn(request_id::push_req_id_to_extensions));
    router = router.layer(SetRequestIdLayer::new(x_request_id.clone(), MakeReqId));
    router = router.layer(PropagateRequestIdLayer::new(x_request_id));

    router
}
