//! JSON error responses.
//!
//! Failures never abort the response pipeline: every error becomes a JSON
//! body with an `error` message and an empty collection under the field the
//! widget normally reads, so the frontend can render a placeholder.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::cache::ResolveError;
use crate::crypto::UpstreamError;

/// An error rendered as `{"error": ..., <field>: []}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    empty_field: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, empty_field: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            empty_field,
        }
    }

    /// The integration has no API key. Reported with 200 so the widget just shows the message.
    pub fn not_configured(empty_field: &'static str) -> Self {
        Self::new(StatusCode::OK, "Crypto API is not set", empty_field)
    }

    /// Map a cache failure, prefixing the message with `context`.
    pub fn from_resolve(
        context: &str,
        err: &ResolveError<UpstreamError>,
        empty_field: &'static str,
    ) -> Self {
        Self::new(status_for(err), format!("{context}: {err}"), empty_field)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Value {
        let mut body = json!({ "error": self.message });
        body[self.empty_field] = json!([]);
        body
    }
}

/// Back-off conditions map to 503, anything else upstream did wrong to 502.
pub fn status_for<E>(err: &ResolveError<E>) -> StatusCode {
    if err.is_rate_limited() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
