//! Plugin Host - 배포된 플러그인 코드 저장소
//!
//! 실행 기반(substrate)의 "이 주소에 배포된 코드가 있는가" 질의를
//! 대신하는 컴포넌트입니다. 주소를 발급하고, 주소에서 실행 가능한
//! 플러그인 trait 객체를 찾아 줍니다.

use plughub_foundation::{PluginAction, PluginAddress};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 플러그인 호스트
///
/// address → 배포된 코드 매핑. 주소 0은 null 핸들로 예약되어 있어
/// 발급되지 않습니다.
pub struct PluginHost {
    /// 배포된 플러그인 (address → 코드)
    deployed: RwLock<HashMap<PluginAddress, Arc<dyn PluginAction>>>,

    /// 다음 발급 주소 (1부터 시작)
    next_address: AtomicU64,
}

impl PluginHost {
    /// 새 호스트 생성
    pub fn new() -> Self {
        Self {
            deployed: RwLock::new(HashMap::new()),
            next_address: AtomicU64::new(1),
        }
    }

    /// 플러그인 배포
    ///
    /// 새 주소를 발급하고 코드를 저장합니다.
    pub async fn deploy(&self, plugin: Arc<dyn PluginAction>) -> PluginAddress {
        let address = PluginAddress(self.next_address.fetch_add(1, Ordering::SeqCst));

        let name = plugin.name().to_string();
        let mut deployed = self.deployed.write().await;
        deployed.insert(address, plugin);

        info!(address = %address, plugin = %name, "Deployed plugin code");
        address
    }

    /// 주소에 배포된 코드가 있는지 확인
    ///
    /// 레지스트리가 등록/교체 시점에 한 번만 호출하는 약한 검증입니다.
    pub async fn has_code(&self, address: PluginAddress) -> bool {
        let deployed = self.deployed.read().await;
        deployed.contains_key(&address)
    }

    /// 주소에서 플러그인 코드 조회
    pub async fn resolve(&self, address: PluginAddress) -> Option<Arc<dyn PluginAction>> {
        let deployed = self.deployed.read().await;
        deployed.get(&address).cloned()
    }

    /// 배포된 코드 제거
    ///
    /// 자가 소멸한 플러그인을 모델링합니다. 이 주소를 가리키는 레지스트리
    /// 엔트리는 이후 디스패치 시점에 실패합니다.
    pub async fn retire(&self, address: PluginAddress) -> bool {
        let mut deployed = self.deployed.write().await;
        let removed = deployed.remove(&address).is_some();

        if removed {
            debug!(address = %address, "Retired plugin code");
        }

        removed
    }

    /// 현재 배포된 코드 수
    pub async fn deployed_count(&self) -> usize {
        self.deployed.read().await.len()
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field(
                "next_address",
                &self.next_address.load(Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plughub_foundation::{CallContext, Result};

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
    async fn test_deploy_assigns_nonzero_addresses() {
        let host = PluginHost::new();

        let addr1 = host.deploy(Arc::new(EchoPlugin)).await;
        let addr2 = host.deploy(Arc::new(EchoPlugin)).await;

        assert!(!addr1.is_null());
        assert!(!addr2.is_null());
        assert_ne!(addr1, addr2);
        assert_eq!(host.deployed_count().await, 2);
    }

    #[tokio::test]
    async fn test_has_code() {
        let host = PluginHost::new();
        let addr = host.deploy(Arc::new(EchoPlugin)).await;

        assert!(host.has_code(addr).await);
        assert!(!host.has_code(PluginAddress(999)).await);
        assert!(!host.has_code(PluginAddress::NULL).await);
    }

    #[tokio::test]
    async fn test_retire() {
        let host = PluginHost::new();
        let addr = host.deploy(Arc::new(EchoPlugin)).await;

        assert!(host.retire(addr).await);
        assert!(!host.has_code(addr).await);
        assert!(host.resolve(addr).await.is_none());

        // 이미 제거된 주소
        assert!(!host.retire(addr).await);
    }
}
