//! Core Types - 공용 타입 정의
//!
//! 레지스트리, 호스트, 플러그인이 공유하는 식별자 타입들

use serde::{Deserialize, Serialize};

// ============================================================================
// Plugin ID
// ============================================================================

/// 플러그인 ID
///
/// 레지스트리가 등록 순서대로 0부터 조밀하게 할당합니다.
/// 제거된 ID는 재사용되지 않습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PluginId(pub u64);

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plugin-{}", self.0)
    }
}

// ============================================================================
// Plugin Address
// ============================================================================

/// 배포된 플러그인 코드를 가리키는 불투명 핸들
///
/// 0은 null 핸들로 예약되어 있으며 등록할 수 없습니다.
/// 호스트가 1부터 순차적으로 할당합니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PluginAddress(pub u64);

impl PluginAddress {
    /// null 핸들 (존재하지 않는 엔트리 조회 결과)
    pub const NULL: PluginAddress = PluginAddress(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for PluginAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

// ============================================================================
// Vault ID
// ============================================================================

/// 볼트 ID
///
/// 렛저 플러그인이 생성 순서대로 0부터 할당합니다.
/// 플러그인 ID와는 별개의 네임스페이스입니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VaultId(pub u64);

impl std::fmt::Display for VaultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vault-{}", self.0)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// 호출자 주체
///
/// 소유자, 외부 호출자, 레지스트리 자신 등 모든 호출 주체를 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_address() {
        assert!(PluginAddress::NULL.is_null());
        assert!(!PluginAddress(1).is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(PluginId(3).to_string(), "plugin-3");
        assert_eq!(PluginAddress(255).to_string(), "0x000000ff");
        assert_eq!(VaultId(0).to_string(), "vault-0");
    }

    #[test]
    fn test_identity_equality() {
        let a = Identity::new("alice");
        let b: Identity = "alice".into();
        assert_eq!(a, b);
        assert_ne!(a, Identity::new("bob"));
    }
}
