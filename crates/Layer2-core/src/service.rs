//! Hub Service - 서비스 인스턴스 조립
//!
//! 설정에서 이벤트 버스, 감사 로거, 호스트, 레지스트리를 만들어 하나의
//! 서비스 인스턴스로 묶습니다. 전역 상태는 없습니다. 인스턴스는 한 번
//! 생성되어 외부 요청을 처리하는 쪽에 명시적으로 전달됩니다.

use crate::host::PluginHost;
use crate::registry::PluginRegistry;
use plughub_foundation::{
    AuditEventListener, AuditLogger, AuditLoggerConfig, EventBus, HubConfig, Identity, Result,
};
use std::sync::Arc;
use tracing::info;

/// 조립된 서비스 인스턴스
pub struct HubService {
    /// 설정
    config: HubConfig,

    /// 이벤트 버스
    events: Arc<EventBus>,

    /// 감사 로거 (설정으로 비활성화 가능)
    audit: Option<Arc<AuditLogger>>,

    /// 플러그인 호스트
    host: Arc<PluginHost>,

    /// 플러그인 레지스트리
    registry: Arc<PluginRegistry>,
}

impl HubService {
    /// 설정으로 서비스 생성
    pub async fn new(config: HubConfig) -> Result<Self> {
        let events = Arc::new(EventBus::with_config((&config.events).into()));

        let audit = if config.audit.enabled {
            let logger = Arc::new(AuditLogger::with_config(AuditLoggerConfig {
                db_path: config.audit.db_path.clone(),
            })?);
            AuditEventListener::register(logger.clone(), &events).await;
            Some(logger)
        } else {
            None
        };

        let host = Arc::new(PluginHost::new());
        let registry = Arc::new(PluginRegistry::new(
            Identity::new(config.owner.as_str()),
            host.clone(),
            events.clone(),
        ));

        info!(
            owner = %config.owner,
            audit = config.audit.enabled,
            "Hub service initialized"
        );

        Ok(Self {
            config,
            events,
            audit,
            host,
            registry,
        })
    }

    /// 기본 설정으로 서비스 생성
    pub async fn with_defaults() -> Result<Self> {
        Self::new(HubConfig::default()).await
    }

    /// 서비스 설정
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// 이벤트 버스
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// 감사 로거 (활성화된 경우)
    pub fn audit(&self) -> Option<&Arc<AuditLogger>> {
        self.audit.as_ref()
    }

    /// 플러그인 호스트
    pub fn host(&self) -> &Arc<PluginHost> {
        &self.host
    }

    /// 플러그인 레지스트리
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// 레지스트리 소유자 identity
    pub fn owner(&self) -> Identity {
        Identity::new(self.config.owner.as_str())
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::ArithmeticPlugin;
    use plughub_foundation::{AuditAction, AuditConfig, AuditQuery};
    use std::path::PathBuf;

    fn in_memory_config() -> HubConfig {
        HubConfig {
            owner: "owner".to_string(),
            audit: AuditConfig {
                enabled: true,
                db_path: PathBuf::from(":memory:"),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_service_wiring_end_to_end() {
        let service = HubService::new(in_memory_config()).await.unwrap();
        let owner = service.owner();

        let plugin = ArithmeticPlugin::new(2, service.events().clone()).unwrap();
        let addr = service.host().deploy(Arc::new(plugin)).await;
        let id = service.registry().add_plugin(&owner, addr).await.unwrap();

        let result = service.registry().execute_plugin(&owner, id, 21).await.unwrap();
        assert_eq!(result, 42);

        // 감사 로그: 등록 1건 + 연산 수행 1건 + 디스패치 1건
        let audit = service.audit().unwrap();
        assert_eq!(audit.count().await.unwrap(), 3);

        let executed = audit
            .query(&AuditQuery::new().with_actions(vec![AuditAction::PluginExecuted]))
            .await
            .unwrap();
        assert_eq!(executed.len(), 1);
    }

    #[tokio::test]
    async fn test_audit_can_be_disabled() {
        let mut config = in_memory_config();
        config.audit.enabled = false;

        let service = HubService::new(config).await.unwrap();
        assert!(service.audit().is_none());
        assert_eq!(service.events().listener_count().await, 0);
    }
}
