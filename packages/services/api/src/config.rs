//! API 설정

use std::env;

use anyhow::Context;

/// API 설정
///
/// 시작 시 한 번 읽어 [crate::state::AppState]에 주입되며 이후 불변입니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// SQLite 데이터베이스 URL
    pub db_url: String,

    /// 토큰 서명 비밀키 (필수)
    pub jwt_secret: String,

    /// 서명 알고리즘 이름 (HMAC 계열만 허용)
    pub jwt_algorithm: String,

    /// Access 토큰 수명 (시간)
    pub access_token_lifetime: i64,

    /// Refresh 토큰 수명 (시간)
    pub refresh_token_lifetime: i64,
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// `MOIM_JWT_SECRET`이 없으면 검증 실패가 아닌 시작 오류입니다.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("MOIM_API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            db_url: env::var("MOIM_DB_URL")
                .unwrap_or_else(|_| "sqlite://moim.db?mode=rwc".to_string()),

            jwt_secret: env::var("MOIM_JWT_SECRET")
                .context("MOIM_JWT_SECRET must be set")?,

            jwt_algorithm: env::var("MOIM_JWT_ALGORITHM")
                .unwrap_or_else(|_| "HS256".to_string()),

            access_token_lifetime: env::var("MOIM_ACCESS_TOKEN_LIFETIME")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),

            refresh_token_lifetime: env::var("MOIM_REFRESH_TOKEN_LIFETIME")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
        })
    }
}
