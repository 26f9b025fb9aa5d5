//! Plugin Registry - id → address 매핑과 디스패치
//!
//! 레지스트리는 플러그인 id를 등록 순서대로 조밀하게 할당하고, 등록된
//! 주소로 `execute_plugin` 호출을 전달합니다.
//!
//! ## 계약
//!
//! - 변경 연산(add/update/remove)은 소유자만 호출할 수 있습니다.
//! - id는 0부터 순차 할당되며 제거된 id는 재사용되지 않습니다.
//! - `get_plugin_count`는 누적 할당 수를 반환합니다 (살아있는 수가 아님).
//! - 주소 검증은 등록/교체 시점의 코드 존재 확인뿐입니다. 능력 인터페이스
//!   적합성은 검사하지 않으며, 부적합한 대상은 디스패치 시점에 실패합니다.
//! - 모든 연산은 검증을 먼저 마친 뒤 상태를 기록하므로, 실패한 연산은
//!   상태를 전혀 바꾸지 않습니다.
//! - 디스패치 중에는 레지스트리 잠금을 잡지 않습니다. 플러그인이 자기
//!   호출 중에 레지스트리로 재진입해도 교착 없이 동작합니다.

use crate::host::PluginHost;
use plughub_foundation::event::{registry as events, EventBus};
use plughub_foundation::{CallContext, Error, Identity, PluginAddress, PluginId, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// 디스패치 시 플러그인이 관찰하는 레지스트리 identity
const REGISTRY_IDENTITY: &str = "plugin-registry";

/// 레지스트리 테이블
///
/// 엔트리 맵과 누적 카운터는 하나의 잠금 아래에서 함께 변경됩니다.
struct RegistryTable {
    /// id → address (살아있는 엔트리만)
    entries: HashMap<PluginId, PluginAddress>,

    /// 지금까지 할당된 id 수 (제거해도 줄어들지 않음)
    assigned: u64,
}

/// 플러그인 레지스트리
///
/// 서비스 인스턴스마다 하나씩 생성되어 명시적으로 전달됩니다.
pub struct PluginRegistry {
    /// 변경 연산을 호출할 수 있는 유일한 주체 (생성 시 고정)
    owner: Identity,

    /// 디스패치 시 호출자로 관찰되는 레지스트리 자신의 identity
    identity: Identity,

    /// 배포된 코드 조회
    host: Arc<PluginHost>,

    /// 이벤트 버스
    events: Arc<EventBus>,

    /// 레지스트리 상태
    table: RwLock<RegistryTable>,
}

impl PluginRegistry {
    /// 새 레지스트리 생성
    ///
    /// 소유자는 생성 시 한 번 지정되며 이후 변경할 수 없습니다.
    pub fn new(owner: Identity, host: Arc<PluginHost>, events: Arc<EventBus>) -> Self {
        Self {
            owner,
            identity: Identity::new(REGISTRY_IDENTITY),
            host,
            events,
            table: RwLock::new(RegistryTable {
                entries: HashMap::new(),
                assigned: 0,
            }),
        }
    }

    /// 레지스트리 소유자
    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// 레지스트리 자신의 identity (디스패치 호출자)
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    // ========================================================================
    // 변경 연산 (소유자 전용)
    // ========================================================================

    /// 플러그인 등록
    ///
    /// 다음 순차 id를 할당하고 엔트리를 저장합니다. 성공 시
    /// `plugin.added` 이벤트를 발행하고 새 id를 반환합니다.
    pub async fn add_plugin(&self, caller: &Identity, address: PluginAddress) -> Result<PluginId> {
        self.ensure_owner(caller)?;
        self.validate_address(address).await?;

        let id = {
            let mut table = self.table.write().await;
            let id = PluginId(table.assigned);
            table.assigned += 1;
            table.entries.insert(id, address);
            id
        };

        info!(id = %id, address = %address, "Registered plugin");
        self.events.publish(events::plugin_added(id, address)).await;

        Ok(id)
    }

    /// 플러그인 교체
    ///
    /// id는 그대로 두고 저장된 주소만 바꿉니다.
    pub async fn update_plugin(
        &self,
        caller: &Identity,
        id: PluginId,
        new_address: PluginAddress,
    ) -> Result<()> {
        self.ensure_owner(caller)?;

        let old_address = {
            let mut table = self.table.write().await;

            let Some(&old_address) = table.entries.get(&id) else {
                return Err(Error::not_found(id.to_string()));
            };

            if new_address.is_null() {
                return Err(Error::InvalidAddress);
            }
            if !self.host.has_code(new_address).await {
                return Err(Error::InvalidPlugin {
                    address: new_address,
                });
            }

            table.entries.insert(id, new_address);
            old_address
        };

        info!(id = %id, old = %old_address, new = %new_address, "Updated plugin");
        self.events
            .publish(events::plugin_updated(id, old_address, new_address))
            .await;

        Ok(())
    }

    /// 플러그인 제거
    ///
    /// 엔트리를 지웁니다. id는 이후 조회에서 "없음"이 되며 다시
    /// 할당되지 않습니다.
    pub async fn remove_plugin(&self, caller: &Identity, id: PluginId) -> Result<()> {
        self.ensure_owner(caller)?;

        {
            let mut table = self.table.write().await;
            if table.entries.remove(&id).is_none() {
                return Err(Error::not_found(id.to_string()));
            }
        }

        info!(id = %id, "Removed plugin");
        self.events.publish(events::plugin_removed(id)).await;

        Ok(())
    }

    // ========================================================================
    // 디스패치 (모든 호출자 허용)
    // ========================================================================

    /// 플러그인 실행
    ///
    /// id로 플러그인을 찾아 `perform_action(input)`을 전달합니다.
    /// 플러그인의 실패는 변환 없이 그대로 전파됩니다. 성공 시
    /// `plugin.executed` 이벤트를 발행하고 결과를 반환합니다.
    pub async fn execute_plugin(
        &self,
        caller: &Identity,
        id: PluginId,
        input: i64,
    ) -> Result<i64> {
        // 조회는 읽기 잠금으로만. 플러그인 호출 동안에는 잠금을 잡지
        // 않으므로 재진입 호출이 교착하지 않는다.
        let address = {
            let table = self.table.read().await;
            table.entries.get(&id).copied()
        }
        .ok_or_else(|| Error::not_found(id.to_string()))?;

        // 등록 이후 코드가 사라졌을 수 있다 (등록 시점 검증만 하는
        // 약한 검사의 수용된 위험)
        let plugin = self
            .host
            .resolve(address)
            .await
            .ok_or(Error::InvalidPlugin { address })?;

        debug!(
            id = %id,
            plugin = plugin.name(),
            caller = %caller,
            input,
            "Dispatching plugin call"
        );

        let ctx = CallContext::new(self.identity.clone());
        let result = plugin.perform_action(&ctx, input).await?;

        info!(id = %id, input, result, "Plugin executed");
        self.events
            .publish(events::plugin_executed(id, input, result))
            .await;

        Ok(result)
    }

    // ========================================================================
    // 조회 (실패 없음)
    // ========================================================================

    /// 플러그인 주소 조회
    ///
    /// 없는 id는 null 주소를 반환합니다.
    pub async fn get_plugin_address(&self, id: PluginId) -> PluginAddress {
        let table = self.table.read().await;
        table
            .entries
            .get(&id)
            .copied()
            .unwrap_or(PluginAddress::NULL)
    }

    /// 누적 할당 카운터
    ///
    /// 지금까지 `add_plugin`이 성공한 횟수입니다. 제거는 이 값을
    /// 줄이지 않습니다.
    pub async fn get_plugin_count(&self) -> u64 {
        self.table.read().await.assigned
    }

    // ========================================================================
    // 내부 헬퍼
    // ========================================================================

    fn ensure_owner(&self, caller: &Identity) -> Result<()> {
        if caller != &self.owner {
            warn!(caller = %caller, "Rejected registry mutation from non-owner");
            return Err(Error::unauthorized(caller.as_str()));
        }
        Ok(())
    }

    async fn validate_address(&self, address: PluginAddress) -> Result<()> {
        if address.is_null() {
            return Err(Error::InvalidAddress);
        }
        if !self.host.has_code(address).await {
            return Err(Error::InvalidPlugin { address });
        }
        Ok(())
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// 테스트
// ============================================================================
