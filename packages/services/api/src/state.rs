//! API 앱 상태

use chrono::Duration;

use moim_core::auth::{TokenCodec, TokenService};

use crate::config::Config;
use crate::db::Db;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 설정과 토큰 서비스는
/// 시작 시 한 번 만들어져 불변으로 공유됩니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 유저/이벤트 저장소
    pub db: Db,

    /// 토큰 서비스
    pub tokens: TokenService,
}

impl AppState {
    /// 새 상태 생성
    ///
    /// 지원하지 않는 서명 알고리즘은 여기서 시작 오류로 끝납니다.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let codec = TokenCodec::new(&config.jwt_secret, &config.jwt_algorithm)?;
        let tokens = TokenService::new(
            codec,
            Duration::hours(config.access_token_lifetime),
            Duration::hours(config.refresh_token_lifetime),
        );

        let db = Db::new(&config.db_url).await?;

        Ok(Self {
            config: config.clone(),
            db,
            tokens,
        })
    }
}
