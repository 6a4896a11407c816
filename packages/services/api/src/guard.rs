//! AccessGate
//!
//! 요청 수준 인증입니다. 보호된 핸들러는 [CurrentUser]를 추출기로
//! 받으며, 게이트는 이분법입니다: 신원이 붙거나, 요청이 비즈니스
//! 로직에 닿기 전에 전부 거부되거나.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use moim_core::auth::bearer_token;

use crate::db::User;
use crate::error::ApiError;
use crate::state::AppState;

/// 인증된 유저
///
/// 요청 객체에 숨겨 넣는 대신 명시적인 값으로 핸들러에 전달됩니다.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        // 헤더 없음/다른 스킴/서명·만료·타입 불일치는 전부 같은 401.
        // 어느 검사에서 걸렸는지는 노출하지 않습니다.
        let token = bearer_token(auth_header).ok_or_else(invalid_token)?;
        let claims = state
            .tokens
            .validate_access_token(token)
            .ok_or_else(invalid_token)?;

        // 유효한 토큰이어도 subject가 삭제된 유저면 거부 (진단 메시지만 구분)
        let user = state
            .db
            .user_by_id(claims.user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Invalid token user.".to_string(),
            })?;

        Ok(CurrentUser(user))
    }
}

fn invalid_token() -> ApiError {
    ApiError::Unauthorized {
        message: "Invalid or missing access token.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use chrono::Duration;

    use moim_core::auth::TokenType;

    use super::*;
    use crate::config::Config;

    /// 테스트용 상태 생성
    ///
    /// 공유 in-memory DB(memdb VFS)를 테스트별 이름으로 분리합니다.
    async fn state(db_name: &str) -> Arc<AppState> {
        let config = Config {
            port: 0,
            db_url: format!("sqlite:/{db_name}?vfs=memdb"),
            jwt_secret: "test-secret".to_string(),
            jwt_algorithm: "HS256".to_string(),
            access_token_lifetime: 1,
            refresh_token_lifetime: 24,
        };
        Arc::new(AppState::new(&config).await.unwrap())
    }

    async fn extract(
        state: &Arc<AppState>,
        auth_header: Option<&str>,
    ) -> Result<CurrentUser, ApiError> {
        let mut builder = Request::builder().uri("/api/events");
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, state).await
    }

    fn unauthorized_message(err: ApiError) -> String {
        match err {
            ApiError::Unauthorized { message } => message,
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let state = state("guard_missing_header").await;

        let err = extract(&state, None).await.unwrap_err();
        assert_eq!(unauthorized_message(err), "Invalid or missing access token.");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejected() {
        let state = state("guard_non_bearer").await;

        let err = extract(&state, Some("Basic dXNlcjpwdw==")).await.unwrap_err();
        assert_eq!(unauthorized_message(err), "Invalid or missing access token.");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let state = state("guard_expired").await;
        let user_id = state
            .db
            .create_user("user1", "user1@example.com", "hash")
            .await
            .unwrap();

        // 서명은 유효하지만 이미 만료된 토큰
        let token = state
            .tokens
            .create_token(user_id, TokenType::Access, Duration::seconds(-2))
            .unwrap();

        let err = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(unauthorized_message(err), "Invalid or missing access token.");
    }

    #[tokio::test]
    async fn test_deleted_identity_rejected() {
        let state = state("guard_deleted_identity").await;

        // 유저 행이 존재하지 않는 subject로 서명된 유효 토큰
        let token = state
            .tokens
            .create_token(999, TokenType::Access, Duration::hours(1))
            .unwrap();

        let err = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(unauthorized_message(err), "Invalid token user.");
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let state = state("guard_valid").await;
        let user_id = state
            .db
            .create_user("user1", "user1@example.com", "hash")
            .await
            .unwrap();

        let token = state
            .tokens
            .create_token(user_id, TokenType::Access, Duration::hours(1))
            .unwrap();

        let CurrentUser(user) = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "user1");
    }
}
