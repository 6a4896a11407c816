//! 토큰 서비스
//!
//! 코덱 위에 얹힌 애플리케이션 수준 토큰 수명주기입니다.
//! 발급된 토큰을 저장하지 않으며, 모든 연산은 현재 시각과 입력만으로
//! 결정됩니다.

use chrono::Duration;

use crate::error::Result;

use super::claims::{TokenClaims, TokenPair, TokenType};
use super::codec::TokenCodec;

/// 토큰 서비스
///
/// Access/Refresh 수명은 시작 시 설정에서 읽어 고정됩니다.
pub struct TokenService {
    codec: TokenCodec,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenService {
    /// 새 서비스 생성
    pub fn new(codec: TokenCodec, access_lifetime: Duration, refresh_lifetime: Duration) -> Self {
        Self {
            codec,
            access_lifetime,
            refresh_lifetime,
        }
    }

    /// 토큰 생성 (`iat = now`, `exp = now + lifetime`)
    pub fn create_token(
        &self,
        user_id: i64,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Result<String> {
        let claims = TokenClaims::new(user_id, token_type, lifetime);
        self.codec.encode(&claims)
    }

    /// 토큰 디코딩 + 기대 타입 대조
    ///
    /// 코덱 검증(서명/만료)을 통과해도 타입 태그가 `expected`와 다르면
    /// `None`입니다. 예상 가능한 모든 검증 실패는 `None`으로만 나타납니다.
    pub fn decode_token(&self, token: &str, expected: TokenType) -> Option<TokenClaims> {
        let claims = self.codec.decode(token)?;
        if claims.token_type != expected {
            return None;
        }
        Some(claims)
    }

    /// Access 토큰 검증
    pub fn validate_access_token(&self, token: &str) -> Option<TokenClaims> {
        self.decode_token(token, TokenType::Access)
    }

    /// Refresh 토큰 검증
    pub fn validate_refresh_token(&self, token: &str) -> Option<TokenClaims> {
        self.decode_token(token, TokenType::Refresh)
    }

    /// 같은 subject로 Access + Refresh 토큰 쌍 발급
    ///
    /// 두 토큰은 독립적인 순수 계산이며, 기존에 발급된 Refresh 토큰을
    /// 무효화하지 않습니다.
    pub fn generate_token_pair(&self, user_id: i64) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_token(user_id, TokenType::Access, self.access_lifetime)?,
            refresh_token: self.create_token(user_id, TokenType::Refresh, self.refresh_lifetime)?,
        })
    }
}
