//! Config - 통합 설정 관리
//!
//! 서비스 인스턴스 하나를 구성하는 데 필요한 모든 설정 (HubConfig)

use crate::event::EventBusConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 설정 파일명
pub const HUB_CONFIG_FILE: &str = "plughub.toml";

// ============================================================================
// Hub Config (통합)
// ============================================================================

/// PlugHub 통합 설정
///
/// 파일에서 로드하거나 코드에서 직접 구성할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// 레지스트리 소유자 identity
    ///
    /// 등록/교체/제거 연산은 이 주체만 호출할 수 있습니다.
    pub owner: String,

    /// 이벤트 채널 설정
    pub events: EventChannelConfig,

    /// 감사 로그 설정
    pub audit: AuditConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            owner: "owner".to_string(),
            events: EventChannelConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl HubConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 파일에서 로드
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

// ============================================================================
// Event Channel Config
// ============================================================================

/// 이벤트 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventChannelConfig {
    /// 브로드캐스트 채널 용량
    pub channel_capacity: usize,

    /// 이벤트 히스토리 보관 개수
    pub history_size: usize,

    /// 디버그 모드 (모든 이벤트 로깅)
    pub debug_mode: bool,
}

impl Default for EventChannelConfig {
    fn default() -> Self {
        let bus = EventBusConfig::default();
        Self {
            channel_capacity: bus.channel_capacity,
            history_size: bus.history_size,
            debug_mode: bus.debug_mode,
        }
    }
}

impl From<&EventChannelConfig> for EventBusConfig {
    fn from(config: &EventChannelConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            history_size: config.history_size,
            debug_mode: config.debug_mode,
        }
    }
}

// ============================================================================
// Audit Config
// ============================================================================

/// 감사 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// 감사 로그 활성화 여부
    pub enabled: bool,

    /// 데이터베이스 경로 (":memory:"는 인메모리)
    pub db_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        let db_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plughub")
            .join("audit.db");

        Self {
            enabled: true,
            db_path,
        }
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();
        assert_eq!(config.owner, "owner");
        assert!(config.audit.enabled);
        assert_eq!(config.events.channel_capacity, 1024);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
owner = "alice"

[events]
history_size = 64

[audit]
enabled = false
"#
        )
        .unwrap();

        let config = HubConfig::load_from(file.path()).unwrap();
        assert_eq!(config.owner, "alice");
        assert_eq!(config.events.history_size, 64);
        // 생략된 필드는 기본값
        assert_eq!(config.events.channel_capacity, 1024);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "owner = [not valid").unwrap();

        let err = HubConfig::load_from(file.path()).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
    }
}
