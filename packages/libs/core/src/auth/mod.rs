//! 인증 관련 타입 및 로직
//!
//! # 개요
//!
//! Moim의 인증은 서명된 만료 토큰 한 쌍으로 이루어집니다:
//!
//! - **Access Token**: 짧은 수명, 매 요청의 인가에 사용
//! - **Refresh Token**: 긴 수명, 새 토큰 쌍 발급에만 사용
//!
//! 두 토큰은 같은 비밀키로 서명되지만 타입 태그로 구분되며
//! 서로 바꿔 쓸 수 없습니다. 서버는 발급된 토큰을 저장하지 않습니다
//! (무상태, 폐기 목록 없음).

mod claims;
mod codec;
mod ownership;
mod service;

pub use claims::{TokenClaims, TokenPair, TokenType};
pub use codec::TokenCodec;
pub use ownership::{authorize_owner, AccessKind};
pub use service::TokenService;

/// Authorization 헤더에서 bearer 토큰 추출
///
/// 스킴 비교는 대소문자를 구분하지 않습니다 (`Bearer`, `bearer`, `BEARER` 모두 허용).
/// 헤더가 없거나 다른 스킴이면 `None`을 반환합니다.
pub fn bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let value = auth_header?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
