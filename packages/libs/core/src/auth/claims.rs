//! 토큰 Claims
//!
//! 서명된 토큰에 담기는 페이로드 구조입니다.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// 토큰 종류
///
/// 디코딩 시 기대 타입과 반드시 대조합니다. Access와 Refresh는
/// 서명이 유효하더라도 서로 대체할 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// 요청 인가용 (짧은 수명)
    Access,

    /// 토큰 쌍 재발급용 (긴 수명)
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// 토큰 Claims
///
/// 타임스탬프는 unix 초 단위입니다. 발급 시 `exp > iat`가 보장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (유저 ID)
    pub user_id: i64,

    /// 토큰 종류 태그
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// 발급 시각 (unix 초)
    pub iat: i64,

    /// 만료 시각 (unix 초)
    pub exp: i64,
}

impl TokenClaims {
    /// 새 claims 생성 (`iat = now`, `exp = now + lifetime`)
    pub fn new(user_id: i64, token_type: TokenType, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            token_type,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// 만료 여부 확인
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Access/Refresh 토큰 쌍
///
/// 같은 subject로 발급되지만 수명이 독립적이며, 발급 이후
/// 둘을 연결하는 식별자는 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_wire_tags() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
        assert_eq!(TokenType::Access.as_str(), "access");
        assert_eq!(TokenType::Refresh.as_str(), "refresh");
    }

    #[test]
    fn test_claims_expiry_after_issuance() {
        let claims = TokenClaims::new(42, TokenType::Access, Duration::hours(1));

        assert_eq!(claims.user_id, 42);
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_wire_format() {
        let claims = TokenClaims {
            user_id: 7,
            token_type: TokenType::Refresh,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };

        let json: serde_json::Value = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["type"], "refresh");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_086_400);
    }
}
