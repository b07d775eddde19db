/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`. Error responses are JSON:
 *
 * ```json
 * { "error": "Error message", "status": 400 }
 * ```
 *
 * Server-side failures are logged here with their full cause before the
 * generic message goes out.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        } else if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
