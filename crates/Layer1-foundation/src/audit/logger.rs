//! Audit Logger - 감사 로그 기록 및 관리
//!
//! 감사 로그를 SQLite에 저장하고 조회하는 기능을 제공합니다.

use super::types::{AuditAction, AuditEntry, AuditId, AuditQuery, AuditResult};
use crate::event::{EventBus, EventCategory, EventListener, HubEvent};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

// ============================================================================
// AuditLogger
// ============================================================================

/// 감사 로거 설정
#[derive(Debug, Clone)]
pub struct AuditLoggerConfig {
    /// 데이터베이스 경로
    pub db_path: PathBuf,
}

impl Default for AuditLoggerConfig {
    fn default() -> Self {
        let db_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plughub")
            .join("audit.db");

        Self { db_path }
    }
}

/// 감사 로거
///
/// 성공한 레지스트리 변경과 디스패치를 추가 전용으로 기록합니다.
///
/// ## 사용법
///
/// ```ignore
/// use plughub_foundation::audit::{AuditLogger, AuditEntry, AuditAction};
///
/// let logger = AuditLogger::in_memory()?;
///
/// let entry = AuditEntry::new(AuditAction::PluginAdded, "owner")
///     .with_target("plugin-0");
///
/// logger.log(entry).await?;
///
/// let entries = logger.recent(10).await?;
/// ```
pub struct AuditLogger {
    /// SQLite 연결
    db: Mutex<Connection>,

    /// 설정
    config: AuditLoggerConfig,
}

impl AuditLogger {
    /// 기본 설정으로 감사 로거 생성
    pub fn new() -> crate::Result<Self> {
        Self::with_config(AuditLoggerConfig::default())
    }

    /// 커스텀 설정으로 감사 로거 생성
    pub fn with_config(config: AuditLoggerConfig) -> crate::Result<Self> {
        // 디렉토리 생성
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&config.db_path)?;
        Self::init_tables(&conn)?;

        info!(
            db_path = %config.db_path.display(),
            "Audit logger initialized"
        );

        Ok(Self {
            db: Mutex::new(conn),
            config,
        })
    }

    /// 인메모리 로거 생성 (테스트용)
    pub fn in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_tables(&conn)?;

        Ok(Self {
            db: Mutex::new(conn),
            config: AuditLoggerConfig {
                db_path: PathBuf::from(":memory:"),
            },
        })
    }

    /// 테이블 초기화
    fn init_tables(conn: &Connection) -> crate::Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                action TEXT NOT NULL,
                result TEXT NOT NULL,
                actor TEXT NOT NULL,
                target TEXT,
                data TEXT NOT NULL,
                error TEXT
            )
            "#,
            [],
        )?;

        // 인덱스 생성
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_audit_action ON audit_log(action)",
            [],
        )?;

        Ok(())
    }

    /// 로거 설정
    pub fn config(&self) -> &AuditLoggerConfig {
        &self.config
    }

    /// 감사 로그 기록
    pub async fn log(&self, entry: AuditEntry) -> crate::Result<AuditId> {
        let db = self.db.lock().await;

        let id = entry.id.clone();
        let timestamp = entry.timestamp.to_rfc3339();
        let action = entry.action.as_str();
        let result = entry.result.as_str();
        let data = serde_json::to_string(&entry.data)?;

        db.execute(
            r#"
            INSERT INTO audit_log (
                id, timestamp, action, result, actor, target, data, error
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                id.0,
                timestamp,
                action,
                result,
                entry.actor,
                entry.target,
                data,
                entry.error,
            ],
        )?;

        debug!(
            audit_id = %id,
            action = action,
            actor = %entry.actor,
            "Audit entry logged"
        );

        Ok(id)
    }

    /// ID로 감사 로그 조회
    pub async fn get(&self, id: &AuditId) -> crate::Result<Option<AuditEntry>> {
        let db = self.db.lock().await;

        let entry = db
            .query_row(
                "SELECT * FROM audit_log WHERE id = ?1",
                params![id.0],
                |row| Self::row_to_entry(row),
            )
            .optional()?;

        Ok(entry)
    }

    /// 쿼리로 감사 로그 조회
    pub async fn query(&self, query: &AuditQuery) -> crate::Result<Vec<AuditEntry>> {
        let db = self.db.lock().await;

        let mut sql = String::from("SELECT * FROM audit_log WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        // 액션 필터
        if let Some(ref actions) = query.actions {
            let placeholders: Vec<String> = actions.iter().map(|_| "?".to_string()).collect();
            sql.push_str(&format!(" AND action IN ({})", placeholders.join(", ")));
            for action in actions {
                params_vec.push(Box::new(action.as_str().to_string()));
            }
        }

        // 결과 필터
        if let Some(ref results) = query.results {
            let placeholders: Vec<String> = results.iter().map(|_| "?".to_string()).collect();
            sql.push_str(&format!(" AND result IN ({})", placeholders.join(", ")));
            for result in results {
                params_vec.push(Box::new(result.as_str().to_string()));
            }
        }

        // 액터 필터
        if let Some(ref actor) = query.actor {
            sql.push_str(" AND actor = ?");
            params_vec.push(Box::new(actor.clone()));
        }

        // 정렬
        sql.push_str(" ORDER BY timestamp DESC");

        // 페이지네이션
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = db.prepare(&sql)?;
        let entries = stmt
            .query_map(params_refs.as_slice(), |row| Self::row_to_entry(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    /// 최근 감사 로그 조회
    pub async fn recent(&self, limit: usize) -> crate::Result<Vec<AuditEntry>> {
        self.query(&AuditQuery::new().with_limit(limit)).await
    }

    /// 총 엔트리 수
    pub async fn count(&self) -> crate::Result<u64> {
        let db = self.db.lock().await;
        let count: u64 = db.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 행을 AuditEntry로 변환
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<AuditEntry> {
        let id: String = row.get("id")?;
        let timestamp: String = row.get("timestamp")?;
        let action: String = row.get("action")?;
        let result: String = row.get("result")?;
        let actor: String = row.get("actor")?;
        let target: Option<String> = row.get("target")?;
        let data: String = row.get("data")?;
        let error: Option<String> = row.get("error")?;

        Ok(AuditEntry {
            id: AuditId(id),
            timestamp: chrono::DateTime::parse_from_rfc3339(&timestamp)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
            action: parse_action(&action),
            result: parse_result(&result),
            actor,
            target,
            data: serde_json::from_str(&data).unwrap_or(Value::Null),
            error,
        })
    }
}

// ============================================================================
// AuditEventListener - EventBus 연동
// ============================================================================

/// 이벤트 버스와 연동되는 감사 리스너
///
/// 버스에 발행된 이벤트는 전부 성공한 연산의 기록이므로 그대로
/// Success 엔트리로 변환됩니다.
pub struct AuditEventListener {
    logger: Arc<AuditLogger>,
}

impl AuditEventListener {
    pub fn new(logger: Arc<AuditLogger>) -> Self {
        Self { logger }
    }

    /// EventBus에 리스너 등록
    pub async fn register(logger: Arc<AuditLogger>, event_bus: &EventBus) {
        let listener = Arc::new(Self::new(logger));
        event_bus.subscribe(listener).await;
    }
}

#[async_trait]
impl EventListener for AuditEventListener {
    fn name(&self) -> &str {
        "audit_logger"
    }

    fn categories(&self) -> Option<Vec<EventCategory>> {
        // 감사 대상 카테고리만 구독
        Some(vec![
            EventCategory::Registry,
            EventCategory::Plugin,
            EventCategory::Vault,
        ])
    }

    async fn on_event(&self, event: &HubEvent) {
        let action = match event.event_type.as_str() {
            "plugin.added" => AuditAction::PluginAdded,
            "plugin.updated" => AuditAction::PluginUpdated,
            "plugin.removed" => AuditAction::PluginRemoved,
            "plugin.executed" => AuditAction::PluginExecuted,
            "plugin.action_performed" => AuditAction::ActionPerformed,
            "vault.created" => AuditAction::VaultCreated,
            _ => return,
        };

        let actor = event
            .caller
            .clone()
            .unwrap_or_else(|| event.source.clone());

        let mut entry = AuditEntry::new(action, actor)
            .with_result(AuditResult::Success)
            .with_data(event.data.clone());

        if let Some(id) = event.data.get("id").and_then(|v| v.as_u64()) {
            entry = entry.with_target(id.to_string());
        }

        // 로그 기록
        if let Err(e) = self.logger.log(entry).await {
            error!(error = %e, "Failed to log audit entry from event");
        }
    }
}

// ============================================================================
// 헬퍼 함수
// ============================================================================

fn parse_action(s: &str) -> AuditAction {
    match s {
        "plugin_added" => AuditAction::PluginAdded,
        "plugin_updated" => AuditAction::PluginUpdated,
        "plugin_removed" => AuditAction::PluginRemoved,
        "plugin_executed" => AuditAction::PluginExecuted,
        "action_performed" => AuditAction::ActionPerformed,
        "vault_created" => AuditAction::VaultCreated,
        _ => AuditAction::Custom,
    }
}

fn parse_result(s: &str) -> AuditResult {
    match s {
        "failure" => AuditResult::Failure,
        _ => AuditResult::Success,
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::registry;
    use crate::{PluginAddress, PluginId};

    #[tokio::test]
    async fn test_audit_logger_basic() {
        let logger = AuditLogger::in_memory().unwrap();

        let entry = AuditEntry::new(AuditAction::PluginAdded, "owner")
            .with_target("0")
            .with_data(serde_json::json!({"address": 1}));

        let id = logger.log(entry).await.unwrap();

        let retrieved = logger.get(&id).await.unwrap();
        assert!(retrieved.is_some());

        let entry = retrieved.unwrap();
        assert_eq!(entry.actor, "owner");
        assert_eq!(entry.action, AuditAction::PluginAdded);
        assert_eq!(entry.target, Some("0".to_string()));
    }

    #[tokio::test]
    async fn test_audit_query() {
        let logger = AuditLogger::in_memory().unwrap();

        // 여러 엔트리 추가
        for i in 0..5 {
            let entry = AuditEntry::new(AuditAction::PluginExecuted, format!("caller-{}", i));
            logger.log(entry).await.unwrap();
        }

        // 쿼리
        let entries = logger.recent(3).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(logger.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_event_listener_bridges_bus_to_log() {
        let logger = Arc::new(AuditLogger::in_memory().unwrap());
        let bus = EventBus::new();
        AuditEventListener::register(logger.clone(), &bus).await;

        bus.publish(registry::plugin_added(PluginId(0), PluginAddress(1)))
            .await;
        bus.publish(registry::plugin_executed(PluginId(0), 5, 10))
            .await;
        // 감사 대상이 아닌 이벤트
        bus.publish(HubEvent::new("system.started", EventCategory::System))
            .await;

        assert_eq!(logger.count().await.unwrap(), 2);

        let executed = logger
            .query(&AuditQuery::new().with_actions(vec![AuditAction::PluginExecuted]))
            .await
            .unwrap();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].data["input"], 5);
        assert_eq!(executed[0].data["result"], 10);
    }
}
