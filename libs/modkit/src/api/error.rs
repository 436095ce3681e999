use axum::{
    extract::Request,
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::request_id::XRequestId;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code, e.g. `NO_JOBS`.
    pub code: String,
    /// HTTP status code of this response.
    pub status: u16,
    /// Request path that produced the error.
    pub instance: String,
    /// Request id, filled by `error_mapping_middleware` when available.
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            status: status.as_u16(),
            instance: String::new(),
            request_id: None,
        }
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Axum response wrapper that renders `ApiError` with the matching status.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse(pub ApiError);

impl From<ApiError> for ApiErrorResponse {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let mut resp = axum::Json(self.0.clone()).into_response();
        *resp.status_mut() = status;
        // Kept so the mapping middleware can attach the request id later
        resp.extensions_mut().insert(self.0);
        resp
    }
}

/// Renders every error response as an `ApiError` body carrying the request id.
///
/// Handler errors already hold an `ApiError` in their extensions. Bare 408/413
/// responses from the timeout and body-limit layers get one built here, so this
/// must sit outside those layers and inside `push_req_id_to_extensions`.
pub async fn error_mapping_middleware(request: Request, next: Next) -> Response {
    let rid = request.extensions().get::<XRequestId>().map(|r| r.0.clone());
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    let err = match response.extensions().get::<ApiError>() {
        Some(err) if err.request_id.is_some() || rid.is_none() => return response,
        Some(err) => err.clone(),
        None => match layer_rejection(response.status()) {
            Some(err) => err.with_instance(path),
            None => return response,
        },
    };

    let err = match rid {
        Some(rid) => err.with_request_id(rid),
        None => err,
    };
    replace_body(response, err)
}

/// Errors produced by tower-http layers before any handler runs.
fn layer_rejection(status: StatusCode) -> Option<ApiError> {
    match status {
        StatusCode::REQUEST_TIMEOUT => Some(ApiError::new(
            status,
            "REQUEST_TIMEOUT",
            "Request timed out",
        )),
        StatusCode::PAYLOAD_TOO_LARGE => Some(ApiError::new(
            status,
            "PAYLOAD_TOO_LARGE",
            "Request body is too large",
        )),
        _ => None,
    }
}

/// Swap the body for the rendered `err`, keeping headers set by wrapped layers such as CORS.
fn replace_body(response: Response, err: ApiError) -> Response {
    let (mut parts, _) = response.into_parts();
    let (rendered, body) = ApiErrorResponse(err).into_response().into_parts();

    parts.status = rendered.status;
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.extend(rendered.headers);
    parts.extensions.extend(rendered.extensions);
    Response::from_parts(parts, body)
}

/// Router fallback for unknown paths.
pub async fn route_not_found(uri: Uri) -> ApiErrorResponse {
    ApiError::new(StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND", "Route not found")
        .with_instance(uri.path())
        .into()
}

/// Router fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(uri: Uri) -> ApiErrorResponse {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method not allowed",
    )
    .with_instance(uri.path())
    .into()
}
