//! HTTP mapping for service errors.
//!
//! Every failure is returned as `{ "error": message, "code": CODE }` with a
//! status derived from the error kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jobswipe_core::Error;
use serde::Serialize;

/// Service error carried out of an axum handler.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::JobNotFound(_) => StatusCode::NOT_FOUND,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            Error::InvalidInput(msg) => msg.clone(),
            Error::JobNotFound(_) => "Job not found in JobSearch API".to_string(),
            Error::Upstream(msg) => {
                tracing::warn!("JobSearch API error: {}", msg);
                msg.clone()
            }
            err => {
                tracing::error!("store error: {}", err);
                "A database error occurred".to_string()
            }
        };

        (status, Json(ErrorBody { error: message, code: self.0.code() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: Error) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = render(Error::InvalidInput("direction must be 'left' or 'right'".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "direction must be 'left' or 'right'");
        assert_eq!(body["code"], "INVALID_INPUT");

        let (status, body) = render(Error::JobNotFound("abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found in JobSearch API");

        let (status, body) = render(Error::Upstream("JobSearch API error 503: down".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_store_errors_are_opaque() {
        let (status, body) = render(Error::Serialization("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "A database error occurred");
        assert_eq!(body["code"], "STORE_ERROR");
    }
}
