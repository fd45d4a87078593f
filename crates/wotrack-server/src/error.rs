use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wotrack_core::error::WotrackError;

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain without touching the `WotrackError` enum.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

fn status_for(err: &WotrackError) -> StatusCode {
    match err {
        WotrackError::NotInitialized
        | WotrackError::InvalidSheetName(_)
        | WotrackError::InvalidSource(_) => StatusCode::BAD_REQUEST,
        WotrackError::WorkOrderNotFound(_) | WotrackError::SheetNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        WotrackError::MissingColumn { .. } | WotrackError::DuplicateColumn { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        WotrackError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        WotrackError::RowOutOfRange { .. }
        | WotrackError::Io(_)
        | WotrackError::Yaml(_)
        | WotrackError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = self
            .0
            .downcast_ref::<WotrackError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: WotrackError) -> StatusCode {
        AppError(err.into()).into_response().status()
    }

    #[test]
    fn work_order_not_found_maps_to_404() {
        assert_eq!(
            status_of(WotrackError::WorkOrderNotFound("1200".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn missing_column_maps_to_422() {
        let err = WotrackError::MissingColumn {
            sheet: "WO_Log".into(),
            column: "Status".into(),
        };
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn duplicate_column_maps_to_422() {
        let err = WotrackError::DuplicateColumn {
            sheet: "WO_Log".into(),
            column: "Status".into(),
        };
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_unavailable_maps_to_503() {
        assert_eq!(
            status_of(WotrackError::StoreUnavailable("timeout".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn not_initialized_maps_to_400() {
        assert_eq!(
            status_of(WotrackError::NotInitialized),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn sentinel_not_found_maps_to_404() {
        let response = AppError::not_found("no such session").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
