//! Core Traits - 핵심 인터페이스 정의
//!
//! Layer2에서 구현하는 플러그인 능력(capability) 인터페이스를 정의합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Layer2-Core                                            │
//! │  ├── PluginRegistry (id → address, 디스패치)             │
//! │  ├── PluginHost (address → 배포된 코드)                  │
//! │  └── 내장 플러그인 (Arithmetic, Ledger)                  │
//! ├─────────────────────────────────────────────────────────┤
//! │  Layer1-Foundation (이 레이어)                           │
//! │  ├── PluginAction trait 정의                             │
//! │  ├── 식별자 타입 (PluginId, PluginAddress, Identity)     │
//! │  └── Event / Audit / Config                             │
//! └─────────────────────────────────────────────────────────┘
//! ```

use super::types::Identity;
use crate::Result;
use async_trait::async_trait;

// ============================================================================
// CallContext - 호출 컨텍스트
// ============================================================================

/// 호출 컨텍스트
///
/// 플러그인이 관찰하는 호출자 정보입니다. 레지스트리를 거쳐 디스패치되면
/// 플러그인이 보는 호출자는 레지스트리 자신이며, 원래 외부 호출자는
/// 보이지 않습니다. 간접 디스패치의 고유한 성질입니다.
#[derive(Debug, Clone)]
pub struct CallContext {
    caller: Identity,
}

impl CallContext {
    /// 새 컨텍스트 생성
    pub fn new(caller: Identity) -> Self {
        Self { caller }
    }

    /// 이 호출의 직접 호출자
    pub fn caller(&self) -> &Identity {
        &self.caller
    }
}

// ============================================================================
// PluginAction Trait - 플러그인 능력 인터페이스
// ============================================================================

/// 플러그인 능력 인터페이스
///
/// 모든 플러그인은 정수 입력을 받아 정수 결과를 반환하는 단일 연산
/// `perform_action`을 구현합니다. 레지스트리는 이 trait 객체로만
/// 플러그인을 호출합니다.
#[async_trait]
pub trait PluginAction: Send + Sync {
    /// 플러그인 이름 (로깅/이벤트용)
    fn name(&self) -> &str;

    /// 단일 연산 수행
    ///
    /// 실패는 호출자에게 그대로 전파됩니다. 레지스트리는 이 에러를
    /// 잡거나 변환하지 않습니다.
    async fn perform_action(&self, ctx: &CallContext, input: i64) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPlugin;

    #[async_trait]
    impl PluginAction for EchoPlugin {
        fn name(&self) -> &str {
            "echo"
        }

        async fn perform_action(&self, _ctx: &CallContext, input: i64) -> Result<i64> {
            Ok(input)
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let plugin: std::sync::Arc<dyn PluginAction> = std::sync::Arc::new(EchoPlugin);
        let ctx = CallContext::new(Identity::new("tester"));

        let result = plugin.perform_action(&ctx, 42).await.unwrap();
        assert_eq!(result, 42);
        assert_eq!(plugin.name(), "echo");
    }

    #[test]
    fn test_context_caller() {
        let ctx = CallContext::new(Identity::new("alice"));
        assert_eq!(ctx.caller().as_str(), "alice");
    }
}
