//! plughub-core: Core Runtime for PlugHub
//!
//! Layer2 - 레지스트리/디스패처 구현 레이어
//!
//! # 주요 모듈
//!
//! - `host`: 배포된 플러그인 코드 저장소 (address → dyn PluginAction)
//! - `registry`: id → address 매핑, 소유자 게이트, 디스패치
//! - `plugins`: 내장 플러그인 (Arithmetic, Ledger)
//! - `service`: 서비스 인스턴스 조립 (HubService)
//!
//! # 사용 예시
//!
//! ```ignore
//! use plughub_core::{ArithmeticPlugin, HubService};
//! use plughub_foundation::HubConfig;
//! use std::sync::Arc;
//!
//! let service = HubService::new(HubConfig::default()).await?;
//! let owner = service.owner();
//!
//! // 플러그인 배포 후 등록
//! let plugin = ArithmeticPlugin::new(2, service.events().clone())?;
//! let addr = service.host().deploy(Arc::new(plugin)).await;
//! let id = service.registry().add_plugin(&owner, addr).await?;
//!
//! // 디스패치
//! let result = service.registry().execute_plugin(&owner, id, 5).await?;
//! assert_eq!(result, 10);
//! ```

// Core modules
pub mod host;
pub mod plugins;
pub mod registry;
pub mod service;

// Re-exports: Host
pub use host::PluginHost;

// Re-exports: Registry
pub use registry::PluginRegistry;

// Re-exports: Plugins
pub use plugins::{ArithmeticPlugin, LedgerPlugin, VaultRecord};

// Re-exports: Service
pub use service::HubService;
