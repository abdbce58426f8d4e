use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use fintech_core::CoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper translating `CoreError` into HTTP responses.
///
/// Expected business outcomes and caller mistakes map to 4xx;
/// infrastructure faults map to 5xx and are logged here, once, at the
/// boundary.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::SymbolNotFound(_) => StatusCode::NOT_FOUND,

            CoreError::DuplicateSymbol(_)
            | CoreError::UnknownTicker(_)
            | CoreError::InvalidDate(_)
            | CoreError::InvalidDateRange { .. }
            | CoreError::InvalidEmail(_)
            | CoreError::InvalidTickerCount(_)
            | CoreError::NoTrackedTickers => StatusCode::BAD_REQUEST,

            CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            CoreError::Api { .. } | CoreError::Network(_) | CoreError::Mail(_) => {
                StatusCode::BAD_GATEWAY
            }

            CoreError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
