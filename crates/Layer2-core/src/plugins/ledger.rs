//! Ledger Plugin - 생성 전용 볼트 렛저
//!
//! 자체적으로 조밀한 볼트 테이블을 유지합니다. 레지스트리의 플러그인
//! 테이블과는 완전히 별개의 네임스페이스입니다. 생성 이후 잔액이나
//! active 상태를 바꾸는 연산은 존재하지 않습니다 (입출금/이체 없음).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plughub_foundation::event::{plugin, vault, EventBus};
use plughub_foundation::{CallContext, Error, Identity, PluginAction, Result, VaultId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

// ============================================================================
// VaultRecord
// ============================================================================

/// 볼트 레코드 (생성 후 불변)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    /// 볼트 ID (0부터 생성 순서대로)
    pub id: VaultId,

    /// 생성자 (디스패치 경유 시 레지스트리 자신)
    pub owner: Identity,

    /// 잔액 (생성 시 지정, 이후 불변, 검증 없음)
    pub balance: i64,

    /// 활성 플래그 (생성 시 항상 true, 비활성화 연산 없음)
    pub active: bool,

    /// 생성 시간 (레코드 간 비감소)
    pub created_at: DateTime<Utc>,
}

/// 볼트 테이블
struct VaultTable {
    records: Vec<VaultRecord>,

    /// 마지막 생성 시간 (시계가 뒤로 가도 생성 시간은 내려가지 않음)
    last_created_at: DateTime<Utc>,
}

// ============================================================================
// LedgerPlugin
// ============================================================================

/// 렛저 플러그인
pub struct LedgerPlugin {
    /// 볼트 저장소
    vaults: RwLock<VaultTable>,

    /// 이벤트 버스
    events: Arc<EventBus>,
}

impl LedgerPlugin {
    /// 새 플러그인 생성
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            vaults: RwLock::new(VaultTable {
                records: Vec::new(),
                last_created_at: DateTime::<Utc>::MIN_UTC,
            }),
            events,
        }
    }

    /// 볼트 생성 (공통 경로)
    async fn create_vault(&self, owner: Identity, balance: i64) -> VaultId {
        let id = {
            let mut table = self.vaults.write().await;

            let now = Utc::now().max(table.last_created_at);
            let id = VaultId(table.records.len() as u64);

            table.records.push(VaultRecord {
                id,
                owner: owner.clone(),
                balance,
                active: true,
                created_at: now,
            });
            table.last_created_at = now;

            id
        };

        info!(id = %id, owner = %owner, balance, "Vault created");
        self.events.publish(vault::created(id, &owner, balance)).await;

        id
    }

    /// 레지스트리를 거치지 않는 직접 생성
    ///
    /// 소유자는 직접 호출자 자신입니다.
    pub async fn create_vault_direct(&self, caller: &Identity, initial_balance: i64) -> VaultId {
        self.create_vault(caller.clone(), initial_balance).await
    }

    /// 볼트 정보 조회
    ///
    /// `id >= get_vault_count()`이면 `NotFound`. 범위 검사만으로
    /// 충분합니다 (삭제 메커니즘이 없으므로). 반환값은 불변 스냅샷입니다.
    pub async fn get_vault_info(&self, id: VaultId) -> Result<VaultRecord> {
        let table = self.vaults.read().await;
        table
            .records
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| Error::not_found(id.to_string()))
    }

    /// 지금까지 생성된 볼트 수 (단조 증가)
    pub async fn get_vault_count(&self) -> u64 {
        self.vaults.read().await.records.len() as u64
    }
}

#[async_trait]
impl PluginAction for LedgerPlugin {
    fn name(&self) -> &str {
        "ledger"
    }

    async fn perform_action(&self, ctx: &CallContext, input: i64) -> Result<i64> {
        // 디스패치 경유 시 관찰되는 호출자는 레지스트리 자신이다.
        // 원래 외부 호출자는 이 플러그인에 보이지 않는다.
        let id = self.create_vault(ctx.caller().clone(), input).await;

        self.events
            .publish(plugin::action_performed(self.name(), input, id.0 as i64))
            .await;

        Ok(id.0 as i64)
    }
}

// ============================================================================
// 테스트
// ============================================================================
