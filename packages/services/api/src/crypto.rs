//! 비밀번호 다이제스트
//!
//! 유저 자격 증명 저장소의 해시 유틸입니다. 인증 코어는 이 값을
//! 소유하지 않고 대조만 합니다.

use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("test1234!");

        assert!(verify_password("test1234!", &hash));
        assert!(!verify_password("test1234", &hash));
        assert_ne!(hash, "test1234!");
    }
}
