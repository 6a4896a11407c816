//! Auth 핸들러
//!
//! 회원가입/로그인/토큰 재발급 엔드포인트입니다. 성공 응답은 모두
//! 새 토큰 쌍이며, 기존 refresh 토큰은 무효화되지 않습니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use moim_core::auth::TokenPair;

use crate::crypto::{hash_password, verify_password};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 회원가입 요청
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 로그인 요청
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 토큰 재발급 요청
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenPair>)> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() {
        return Err(bad_request("Username and email are required"));
    }
    validate_password(&req.password)?;

    if state.db.email_exists(&req.email).await? {
        return Err(bad_request("Email already exists"));
    }
    if state.db.username_exists(&req.username).await? {
        return Err(bad_request("Username already exists"));
    }

    let user_id = state
        .db
        .create_user(&req.username, &req.email, &hash_password(&req.password))
        .await?;

    let tokens = state.tokens.generate_token_pair(user_id)?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPair>> {
    let user = state
        .db
        .user_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: "User not found".to_string(),
        })?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized {
            message: "Invalid credentials.".to_string(),
        });
    }

    let tokens = state.tokens.generate_token_pair(user.id)?;
    Ok(Json(tokens))
}

/// `POST /api/auth/refresh`
///
/// Refresh 토큰 실패는 서버 오류가 아니라 클라이언트가 재로그인으로
/// 복구할 수 있는 400입니다.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let claims = state
        .tokens
        .validate_refresh_token(&req.refresh_token)
        .ok_or_else(|| bad_request("Invalid or expired refresh token"))?;

    let tokens = state.tokens.generate_token_pair(claims.user_id)?;
    Ok(Json(tokens))
}

/// 비밀번호 정책 검사
fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(bad_request(
            "This password is too short. It must contain at least 8 characters.",
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad_request("This password is entirely numeric."));
    }
    Ok(())
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("test1234!").is_ok());

        // 8자 미만
        assert!(validate_password("test").is_err());

        // 전부 숫자
        assert!(validate_password("12345678").is_err());
    }
}
