//! moim-core: Moim 공통 핵심 라이브러리
//!
//! 이 크레이트는 API 서비스가 사용하는 인증 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `auth`: 토큰 claims, 서명/검증 코덱, 토큰 서비스, 소유권 검사
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod error;

pub use error::{Error, Result};
