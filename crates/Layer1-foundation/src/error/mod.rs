//! Error types for PlugHub
//!
//! 모든 에러를 중앙에서 관리

use crate::core::PluginAddress;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// PlugHub 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 권한 관련
    // ========================================================================
    #[error("Unauthorized: caller '{caller}' is not the registry owner")]
    Unauthorized { caller: String },

    // ========================================================================
    // 레지스트리 관련
    // ========================================================================
    #[error("Invalid address: the null address cannot be registered")]
    InvalidAddress,

    #[error("Invalid plugin: no deployed code at {address}")]
    InvalidPlugin { address: PluginAddress },

    #[error("Not found: {0}")]
    NotFound(String),

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // 플러그인 실행 관련
    // ========================================================================
    #[error("Plugin execution failed: {plugin} - {message}")]
    Execution { plugin: String, message: String },

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 에러 종류의 안정적인 문자열 태그
    ///
    /// 테스트와 감사 로그가 구체적인 실패 조건을 단언할 때 사용합니다.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Unauthorized { .. } => "unauthorized",
            Error::InvalidAddress => "invalid_address",
            Error::InvalidPlugin { .. } => "invalid_plugin",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Execution { .. } => "execution",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Sqlite(_) => "sqlite",
            Error::Internal(_) => "internal",
        }
    }

    /// Unauthorized 에러 생성 헬퍼
    pub fn unauthorized(caller: impl Into<String>) -> Self {
        Error::Unauthorized {
            caller: caller.into(),
        }
    }

    /// NotFound 에러 생성 헬퍼
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    /// 플러그인 실행 에러 생성 헬퍼
    pub fn execution(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
