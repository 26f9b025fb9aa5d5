//! Event System - 이벤트 발행/구독 시스템
//!
//! 레지스트리와 플러그인에서 발생하는 이벤트를 관리합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      EventBus                        │
//! │  ┌──────────┐  ┌───────────────┐  ┌──────────────┐   │
//! │  │ History  │  │ Listeners     │  │ Broadcast    │   │
//! │  │ (감사    │  │ (AuditLogger  │  │ (스트림      │   │
//! │  │  채널)   │  │  등)          │  │  구독자)     │   │
//! │  └──────────┘  └───────────────┘  └──────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! 이벤트는 성공한 연산에서만 발행됩니다. 버스는 서비스 인스턴스에
//! 속하며 명시적으로 전달됩니다.

mod bus;
mod types;

pub use bus::{EventBus, EventBusConfig, EventFilter, EventListener, ListenerId};
pub use types::{plugin, registry, vault, EventCategory, EventId, EventSeverity, HubEvent};
