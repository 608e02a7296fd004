use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobly_core::JoblyError;
use serde_json::json;

/// A [`JoblyError`] rendered as `{"error": {"message", "status"}}`.
#[derive(Debug)]
pub struct ApiError(pub JoblyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            JoblyError::Validation(_) => StatusCode::BAD_REQUEST,
            JoblyError::NotFound(_) => StatusCode::NOT_FOUND,
            JoblyError::Unauthorized => StatusCode::UNAUTHORIZED,
            JoblyError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JoblyError> for ApiError {
    fn from(err: JoblyError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(JoblyError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(JoblyError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "request failed");
        }
        let message = match self.0 {
            JoblyError::Validation(msg) | JoblyError::NotFound(msg) => msg,
            other => other.to_string(),
        };
        let body = json!({"error": {"message": message, "status": status.as_u16()}});
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        let cases = [
            (JoblyError::validation("no data"), StatusCode::BAD_REQUEST),
            (JoblyError::not_found("no job: 1"), StatusCode::NOT_FOUND),
            (JoblyError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                JoblyError::Storage("pool closed".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
