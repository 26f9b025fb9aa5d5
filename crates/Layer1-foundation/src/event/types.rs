//! Event Types - 시스템 전체에서 사용되는 이벤트 타입 정의
//!
//! 레지스트리 변경과 플러그인 실행에서 발생하는 이벤트를 정의합니다.
//! 이벤트는 성공한 연산에서만 발행됩니다. 실패한 연산은 아무것도
//! 발행하지 않습니다.

use crate::core::{Identity, PluginAddress, PluginId, VaultId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Event Category
// ============================================================================

/// 이벤트 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// 시스템 이벤트 (서비스 시작/종료)
    System,
    /// 레지스트리 변경 및 디스패치 이벤트
    Registry,
    /// 플러그인 자체 실행 이벤트
    Plugin,
    /// 볼트 생성 이벤트
    Vault,
    /// 에러 이벤트
    Error,
}

impl EventCategory {
    /// 카테고리 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Registry => "registry",
            Self::Plugin => "plugin",
            Self::Vault => "vault",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// Event Severity
// ============================================================================

/// 이벤트 심각도
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    /// 디버그 정보
    Debug,
    /// 일반 정보
    Info,
    /// 경고
    Warning,
    /// 에러
    Error,
}

impl EventSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Default for EventSeverity {
    fn default() -> Self {
        Self::Info
    }
}

// ============================================================================
// HubEvent - 핵심 이벤트 타입
// ============================================================================

/// PlugHub 시스템 이벤트
///
/// 모든 성공한 변경/디스패치에서 발행되는 이벤트의 공통 구조입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubEvent {
    /// 이벤트 ID
    pub id: EventId,

    /// 이벤트 타입 (예: "plugin.executed", "vault.created")
    pub event_type: String,

    /// 이벤트 카테고리
    pub category: EventCategory,

    /// 심각도
    pub severity: EventSeverity,

    /// 이벤트 발생 시간
    pub timestamp: DateTime<Utc>,

    /// 이벤트 소스 (컴포넌트)
    pub source: String,

    /// 연산을 일으킨 호출자 (알려진 경우)
    pub caller: Option<String>,

    /// 이벤트 데이터
    pub data: Value,
}

impl HubEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: impl Into<String>, category: EventCategory) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            category,
            severity: EventSeverity::Info,
            timestamp: Utc::now(),
            source: String::new(),
            caller: None,
            data: Value::Null,
        }
    }

    /// 심각도 설정
    pub fn with_severity(mut self, severity: EventSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// 소스 설정
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// 호출자 설정
    pub fn with_caller(mut self, caller: &Identity) -> Self {
        self.caller = Some(caller.as_str().to_string());
        self
    }

    /// 데이터 설정
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

// ============================================================================
// 사전 정의된 이벤트 타입들
// ============================================================================

/// 레지스트리 이벤트
pub mod registry {
    use super::*;

    /// 플러그인 등록 이벤트
    pub fn plugin_added(id: PluginId, address: PluginAddress) -> HubEvent {
        HubEvent::new("plugin.added", EventCategory::Registry)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id.0,
                "address": address.0,
            }))
    }

    /// 플러그인 교체 이벤트
    pub fn plugin_updated(
        id: PluginId,
        old_address: PluginAddress,
        new_address: PluginAddress,
    ) -> HubEvent {
        HubEvent::new("plugin.updated", EventCategory::Registry)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id.0,
                "old_address": old_address.0,
                "new_address": new_address.0,
            }))
    }

    /// 플러그인 제거 이벤트
    pub fn plugin_removed(id: PluginId) -> HubEvent {
        HubEvent::new("plugin.removed", EventCategory::Registry)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id.0,
            }))
    }

    /// 디스패치 성공 이벤트
    pub fn plugin_executed(id: PluginId, input: i64, result: i64) -> HubEvent {
        HubEvent::new("plugin.executed", EventCategory::Registry)
            .with_source("registry")
            .with_data(serde_json::json!({
                "id": id.0,
                "input": input,
                "result": result,
            }))
    }
}

/// 플러그인 이벤트
pub mod plugin {
    use super::*;

    /// 플러그인 연산 수행 이벤트
    pub fn action_performed(plugin: &str, input: i64, result: i64) -> HubEvent {
        HubEvent::new("plugin.action_performed", EventCategory::Plugin)
            .with_source(plugin)
            .with_data(serde_json::json!({
                "plugin": plugin,
                "input": input,
                "result": result,
            }))
    }
}

/// 볼트 이벤트
pub mod vault {
    use super::*;

    /// 볼트 생성 이벤트
    pub fn created(id: VaultId, owner: &Identity, balance: i64) -> HubEvent {
        HubEvent::new("vault.created", EventCategory::Vault)
            .with_source("ledger")
            .with_caller(owner)
            .with_data(serde_json::json!({
                "id": id.0,
                "owner": owner.as_str(),
                "balance": balance,
            }))
    }
}

// ============================================================================
// 테스트
// ============================================================================
