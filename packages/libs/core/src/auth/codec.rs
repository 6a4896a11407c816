//! 토큰 코덱
//!
//! Claims를 서명된 문자열로 인코딩하고, 서명/만료 검증을 거쳐
//! 다시 claims로 복원합니다.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{Error, Result};

use super::claims::TokenClaims;

/// 토큰 코덱
///
/// 프로세스 전역 비밀키와 고정 알고리즘으로 HMAC 서명 JWT를
/// 인코딩/디코딩합니다. 생성 이후 불변이며 동기화 없이 공유 가능합니다.
pub struct TokenCodec {
    header: Header,
    validation: Validation,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// 새 코덱 생성
    ///
    /// `algorithm`은 HMAC 계열 이름(HS256/HS384/HS512)만 허용합니다.
    /// 그 외 값은 설정 오류로, [Error::UnsupportedAlgorithm]을 반환합니다.
    pub fn new(secret: &str, algorithm: &str) -> Result<Self> {
        let alg = Algorithm::from_str(algorithm).map_err(|_| Error::UnsupportedAlgorithm {
            name: algorithm.to_string(),
        })?;
        if !matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(Error::UnsupportedAlgorithm {
                name: algorithm.to_string(),
            });
        }

        // 만료는 초 단위 정밀도로 검사합니다 (leeway 없음).
        let mut validation = Validation::new(alg);
        validation.leeway = 0;

        Ok(Self {
            header: Header::new(alg),
            validation,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Claims를 서명된 토큰 문자열로 인코딩
    pub fn encode(&self, claims: &TokenClaims) -> Result<String> {
        Ok(jsonwebtoken::encode(&self.header, claims, &self.encoding_key)?)
    }

    /// 토큰 문자열을 검증하고 claims로 복원
    ///
    /// 서명 불일치, 구조 손상, 만료 중 하나라도 걸리면 `None`을 반환합니다.
    /// 서명 검증과 만료 검사는 독립적이며 둘 다 통과해야 합니다.
    pub fn decode(&self, token: &str) -> Option<TokenClaims> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::auth::claims::TokenType;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", "HS256").unwrap()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = codec();
        let claims = TokenClaims::new(42, TokenType::Access, Duration::hours(1));

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let codec = codec();
        let claims = TokenClaims::new(42, TokenType::Access, Duration::seconds(-2));

        // 서명은 유효하지만 만료됨
        let token = codec.encode(&claims).unwrap();
        assert!(codec.decode(&token).is_none());
    }

    #[test]
    fn test_decode_rejects_foreign_secret() {
        let codec = codec();
        let other = TokenCodec::new("another-secret", "HS256").unwrap();
        let claims = TokenClaims::new(42, TokenType::Access, Duration::hours(1));

        let token = other.encode(&claims).unwrap();
        assert!(codec.decode(&token).is_none());
    }

    #[test]
    fn test_decode_rejects_tampered_token() {
        let codec = codec();
        let claims = TokenClaims::new(42, TokenType::Access, Duration::hours(1));

        let mut token = codec.encode(&claims).unwrap();
        // 페이로드 한 글자 변조
        let mid = token.len() / 2;
        let ch = if token.as_bytes()[mid] == b'A' { "B" } else { "A" };
        token.replace_range(mid..mid + 1, ch);

        assert!(codec.decode(&token).is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let codec = codec();

        assert!(codec.decode("").is_none());
        assert!(codec.decode("not-a-token").is_none());
        assert!(codec.decode("a.b.c").is_none());
    }

    #[test]
    fn test_unsupported_algorithm_is_config_error() {
        assert!(matches!(
            TokenCodec::new("secret", "HS9000"),
            Err(Error::UnsupportedAlgorithm { .. })
        ));

        // HMAC 계열이 아닌 알고리즘도 거부
        assert!(matches!(
            TokenCodec::new("secret", "RS256"),
            Err(Error::UnsupportedAlgorithm { .. })
        ));
    }
}
