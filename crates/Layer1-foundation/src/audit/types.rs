//! Audit Log Types - 감사 로그 타입 정의
//!
//! 레지스트리 변경, 디스패치, 볼트 생성의 감사 기록을 위한 타입들입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Audit Entry ID
// ============================================================================

/// 감사 로그 엔트리 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

impl AuditId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Audit Action Type
// ============================================================================

/// 감사 대상 액션 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // 레지스트리 관련
    /// 플러그인 등록
    PluginAdded,
    /// 플러그인 교체
    PluginUpdated,
    /// 플러그인 제거
    PluginRemoved,
    /// 디스패치 성공
    PluginExecuted,

    // 플러그인 관련
    /// 플러그인 연산 수행
    ActionPerformed,
    /// 볼트 생성
    VaultCreated,

    // 기타
    /// 사용자 정의 액션
    Custom,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PluginAdded => "plugin_added",
            Self::PluginUpdated => "plugin_updated",
            Self::PluginRemoved => "plugin_removed",
            Self::PluginExecuted => "plugin_executed",
            Self::ActionPerformed => "action_performed",
            Self::VaultCreated => "vault_created",
            Self::Custom => "custom",
        }
    }
}

// ============================================================================
// Audit Result
// ============================================================================

/// 감사 대상 작업의 결과
///
/// 실패한 연산은 이벤트를 발행하지 않으므로 버스를 통해 기록되는
/// 엔트리는 전부 Success입니다. Failure는 로거를 직접 사용하는
/// 호출자를 위해 남아 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    /// 성공
    Success,
    /// 실패
    Failure,
}

impl AuditResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

// ============================================================================
// Audit Entry
// ============================================================================

/// 감사 로그 엔트리
///
/// 성공한 변경/디스패치의 감사 기록입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 고유 ID
    pub id: AuditId,

    /// 발생 시간
    pub timestamp: DateTime<Utc>,

    /// 액션 타입
    pub action: AuditAction,

    /// 결과
    pub result: AuditResult,

    /// 액터 (호출자 또는 소스 컴포넌트)
    pub actor: String,

    /// 대상 (플러그인 id, 볼트 id 등)
    pub target: Option<String>,

    /// 추가 데이터
    pub data: Value,

    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
}

impl AuditEntry {
    /// 새 감사 엔트리 생성
    pub fn new(action: AuditAction, actor: impl Into<String>) -> Self {
        Self {
            id: AuditId::new(),
            timestamp: Utc::now(),
            action,
            result: AuditResult::Success,
            actor: actor.into(),
            target: None,
            data: Value::Null,
            error: None,
        }
    }

    /// 결과 설정
    pub fn with_result(mut self, result: AuditResult) -> Self {
        self.result = result;
        self
    }

    /// 대상 설정
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// 데이터 설정
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// 에러 설정
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.result = AuditResult::Failure;
        self
    }
}

// ============================================================================
// Audit Query
// ============================================================================

/// 감사 로그 조회 쿼리
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// 액션 필터
    pub actions: Option<Vec<AuditAction>>,

    /// 결과 필터
    pub results: Option<Vec<AuditResult>>,

    /// 액터 필터
    pub actor: Option<String>,

    /// 최대 결과 수
    pub limit: Option<usize>,

    /// 오프셋
    pub offset: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(mut self, actions: Vec<AuditAction>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_results(mut self, results: Vec<AuditResult>) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// 엔트리가 쿼리와 매칭되는지 확인
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref actions) = self.actions {
            if !actions.contains(&entry.action) {
                return false;
            }
        }

        if let Some(ref results) = self.results {
            if !results.contains(&entry.result) {
                return false;
            }
        }

        if let Some(ref actor) = self.actor {
            if &entry.actor != actor {
                return false;
            }
        }

        true
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_entry_creation() {
        let entry = AuditEntry::new(AuditAction::PluginExecuted, "registry")
            .with_target("plugin-0")
            .with_data(serde_json::json!({"input": 5, "result": 10}));

        assert_eq!(entry.action, AuditAction::PluginExecuted);
        assert_eq!(entry.result, AuditResult::Success);
        assert_eq!(entry.actor, "registry");
        assert_eq!(entry.target, Some("plugin-0".to_string()));
    }

    #[test]
    fn test_with_error_marks_failure() {
        let entry =
            AuditEntry::new(AuditAction::Custom, "test").with_error("something went wrong");

        assert_eq!(entry.result, AuditResult::Failure);
        assert!(entry.error.is_some());
    }

    #[test]
    fn test_audit_query() {
        let entry = AuditEntry::new(AuditAction::PluginAdded, "owner");

        let query = AuditQuery::new()
            .with_actions(vec![AuditAction::PluginAdded])
            .with_actor("owner");

        assert!(query.matches(&entry));

        let query2 = AuditQuery::new().with_actions(vec![AuditAction::PluginRemoved]);

        assert!(!query2.matches(&entry));
    }
}
