//! 리소스 소유권 검사
//!
//! 객체 단위 인가 규칙입니다. AccessGate(토큰 인증)를 통과한 뒤,
//! 특정 리소스 하나를 대상으로 하는 작업에만 적용됩니다.

use crate::error::{Error, Result};

/// 접근 종류
///
/// 부수효과 없는 읽기인지, 리소스를 바꾸는 작업인지만 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// 읽기 — 소유자와 무관하게 항상 허용
    Read,

    /// 수정/삭제 — 소유자에게만 허용
    Mutate,
}

/// 소유권 검사
///
/// 위반은 403이 아니라 인증 실패(401)로 처리합니다. 상태 코드
/// 차이로 리소스의 존재나 소유 관계가 새어 나가지 않게 합니다.
pub fn authorize_owner(kind: AccessKind, user_id: i64, owner_id: i64) -> Result<()> {
    match kind {
        AccessKind::Read => Ok(()),
        AccessKind::Mutate if user_id == owner_id => Ok(()),
        AccessKind::Mutate => Err(Error::AuthenticationFailed {
            reason: "Can't update or delete events of other owners.".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_always_allowed() {
        assert!(authorize_owner(AccessKind::Read, 1, 2).is_ok());
        assert!(authorize_owner(AccessKind::Read, 1, 1).is_ok());
    }

    #[test]
    fn test_mutate_requires_ownership() {
        assert!(authorize_owner(AccessKind::Mutate, 1, 1).is_ok());

        let err = authorize_owner(AccessKind::Mutate, 1, 2).unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed { .. }));

        // 401로 매핑 (403 아님)
        assert_eq!(err.status_code(), 401);
    }
}
