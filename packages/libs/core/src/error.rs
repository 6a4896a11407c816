//! 공통 에러 타입
//!
//! Moim 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Moim 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Auth Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("unsupported signing algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("token encoding failed: {0}")]
    TokenEncode(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized
            // 소유권 위반도 401로 응답합니다. 상태 코드 차이로
            // 리소스 존재 여부가 드러나지 않도록 하기 위함입니다.
            Error::AuthenticationFailed { .. } => 401,

            // 500 Internal Server Error (설정/프로그래밍 오류)
            Error::UnsupportedAlgorithm { .. } | Error::TokenEncode(_) => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            Error::UnsupportedAlgorithm { .. } => "UNSUPPORTED_ALGORITHM",
            Error::TokenEncode(_) => "TOKEN_ENCODE_ERROR",
        }
    }
}
