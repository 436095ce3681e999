//! # ModKit - shared HTTP toolkit
//!
//! Building blocks reused by every HTTP-facing module:
//!
//! - **Errors**: a single JSON error body (`ApiError`) rendered with the right status
//! - **Request ids**: `x-request-id` generation, propagation and span recording
//! - **Layers**: the global middleware stack applied around the assembled router
//! - **Outgoing HTTP**: `TracedClient`, a reqwest wrapper injecting `traceparent`

pub mod api;
pub mod http;

pub use api::error::{
    error_mapping_middleware, method_not_allowed, route_not_found, ApiError, ApiErrorResponse,
};
pub use api::layers::{apply_global_layers, HttpLayerOptions};
pub use api::request_id::{create_trace_layer, push_req_id_to_extensions, MakeReqId, XRequestId};
pub use http::client::TracedClient;
