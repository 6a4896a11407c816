//! API 에러 타입

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API 에러
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("core error: {0}")]
    Core(#[from] moim_core::Error),
}

/// 에러 응답 JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
            ApiError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone())
            }
            ApiError::NotFound { message } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            ApiError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message.clone())
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database operation failed".to_string(),
                )
            }
            ApiError::Core(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                // 인증 실패는 Display 접두어 없이 사유만 노출
                let message = match e {
                    moim_core::Error::AuthenticationFailed { reason } => reason.clone(),
                    other => other.to_string(),
                };
                (status, e.code(), message)
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                request_id: crate::middleware::current_request_id(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use moim_core::auth::{authorize_owner, AccessKind};

    use super::*;

    #[tokio::test]
    async fn test_ownership_violation_response() {
        let err = ApiError::Core(authorize_owner(AccessKind::Mutate, 1, 2).unwrap_err());
        let resp = err.into_response();

        // 403이 아닌 401, 본문 메시지는 원래 사유 그대로
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "AUTHENTICATION_FAILED");
        assert_eq!(
            json["error"]["message"],
            "Can't update or delete events of other owners."
        );
    }
}
