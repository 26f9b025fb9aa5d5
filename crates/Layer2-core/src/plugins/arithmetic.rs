//! Arithmetic Plugin - 곱셈 변환 플러그인
//!
//! 생성 시 고정된 양의 계수로 입력을 곱하는 순수 변환입니다.

use async_trait::async_trait;
use plughub_foundation::event::{plugin as events, EventBus};
use plughub_foundation::{CallContext, Error, PluginAction, Result};
use std::sync::Arc;
use tracing::debug;

/// 곱셈 플러그인
pub struct ArithmeticPlugin {
    /// 생성 시 고정되는 양의 계수
    factor: i64,

    /// 이벤트 버스
    events: Arc<EventBus>,
}

impl std::fmt::Debug for ArithmeticPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArithmeticPlugin")
            .field("factor", &self.factor)
            .finish_non_exhaustive()
    }
}

impl ArithmeticPlugin {
    /// 새 플러그인 생성
    ///
    /// 계수가 양수가 아니면 `InvalidConfig`로 실패하며 인스턴스는
    /// 만들어지지 않습니다.
    pub fn new(factor: i64, events: Arc<EventBus>) -> Result<Self> {
        if factor <= 0 {
            return Err(Error::InvalidConfig(format!(
                "arithmetic factor must be positive, got {}",
                factor
            )));
        }

        Ok(Self { factor, events })
    }

    /// 동일한 계산을 이벤트 없이 수행 (조회용)
    ///
    /// 호출 이력을 남기지 않고 결과만 확인할 때 사용합니다.
    /// 곱셈 오버플로우는 래핑하지 않고 실패합니다.
    pub fn calculate_result(&self, input: i64) -> Result<i64> {
        input.checked_mul(self.factor).ok_or_else(|| {
            Error::execution(
                "arithmetic",
                format!("multiplication overflow: {} * {}", input, self.factor),
            )
        })
    }

    /// 설정된 계수
    pub fn get_factor(&self) -> i64 {
        self.factor
    }
}

#[async_trait]
impl PluginAction for ArithmeticPlugin {
    fn name(&self) -> &str {
        "arithmetic"
    }

    async fn perform_action(&self, _ctx: &CallContext, input: i64) -> Result<i64> {
        let result = self.calculate_result(input)?;

        debug!(input, factor = self.factor, result, "Arithmetic action performed");
        self.events
            .publish(events::action_performed(self.name(), input, result))
            .await;

        Ok(result)
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plughub_foundation::Identity;

    fn bus() -> Arc<EventBus> {
        Arc::new(EventBus::new())
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        let err = ArithmeticPlugin::new(0, bus()).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");

        let err = ArithmeticPlugin::new(-3, bus()).unwrap_err();
        assert_eq!(err.kind(), "invalid_config");
    }

    #[tokio::test]
    async fn test_perform_action_multiplies_and_emits() {
        let events = bus();
        let plugin = ArithmeticPlugin::new(2, events.clone()).unwrap();
        let ctx = CallContext::new(Identity::new("caller"));

        let result = plugin.perform_action(&ctx, 5).await.unwrap();
        assert_eq!(result, 10);
        assert_eq!(events.event_count(), 1);
    }

    #[tokio::test]
    async fn test_calculate_result_emits_nothing() {
        let events = bus();
        let plugin = ArithmeticPlugin::new(3, events.clone()).unwrap();

        assert_eq!(plugin.calculate_result(7).unwrap(), 21);
        assert_eq!(plugin.get_factor(), 3);
        assert_eq!(events.event_count(), 0);
    }

    #[tokio::test]
    async fn test_overflow_fails_without_event() {
        let events = bus();
        let plugin = ArithmeticPlugin::new(2, events.clone()).unwrap();
        let ctx = CallContext::new(Identity::new("caller"));

        let err = plugin.perform_action(&ctx, i64::MAX).await.unwrap_err();
        assert_eq!(err.kind(), "execution");
        assert_eq!(events.event_count(), 0);
    }
}
