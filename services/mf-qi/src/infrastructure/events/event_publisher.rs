//! 事件发布器
//!
//! 事件在聚合保存成功之后发布，发布失败不影响已提交的状态。

use std::sync::Arc;

use async_trait::async_trait;
use domain_core::EventEnvelope;
use tokio::sync::RwLock;

use crate::domain::events::InspectionEvent;

pub type InspectionEventEnvelope = EventEnvelope<InspectionEvent>;

/// 事件发布器 trait
#[async_trait]
pub trait InspectionEventPublisher: Send + Sync {
    /// 发布单个事件
    async fn publish(&self, envelope: InspectionEventEnvelope);

    /// 批量发布事件
    async fn publish_all(&self, envelopes: Vec<InspectionEventEnvelope>);
}

/// 内存事件总线实现
pub struct InMemoryEventBus {
    events: Arc<RwLock<Vec<InspectionEventEnvelope>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// 获取所有发布的事件（用于测试）
    pub async fn get_events(&self) -> Vec<InspectionEventEnvelope> {
        self.events.read().await.clone()
    }

    /// 清空事件（用于测试）
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InspectionEventPublisher for InMemoryEventBus {
    async fn publish(&self, envelope: InspectionEventEnvelope) {
        tracing::info!(
            event_type = %envelope.event_type,
            aggregate_id = %envelope.aggregate_id,
            aggregate_version = envelope.aggregate_version,
            "Domain event published"
        );
        self.events.write().await.push(envelope);
    }

    async fn publish_all(&self, envelopes: Vec<InspectionEventEnvelope>) {
        for envelope in envelopes {
            self.publish(envelope).await;
        }
    }
}

/// NoOp 事件发布器
pub struct NoOpEventPublisher;

#[async_trait]
impl InspectionEventPublisher for NoOpEventPublisher {
    async fn publish(&self, _envelope: InspectionEventEnvelope) {}

    async fn publish_all(&self, _envelopes: Vec<InspectionEventEnvelope>) {}
}

/// 日志事件发布器
pub struct LoggingEventPublisher;

#[async_trait]
impl InspectionEventPublisher for LoggingEventPublisher {
    async fn publish(&self, envelope: InspectionEventEnvelope) {
        match serde_json::to_string(&envelope.data) {
            Ok(payload) => tracing::info!(
                event_type = %envelope.event_type,
                aggregate_id = %envelope.aggregate_id,
                payload = %payload,
                "Domain event: {}",
                envelope.event_type
            ),
            Err(e) => tracing::warn!(
                event_type = %envelope.event_type,
                error = %e,
                "Failed to serialize domain event"
            ),
        }
    }

    async fn publish_all(&self, envelopes: Vec<InspectionEventEnvelope>) {
        for envelope in envelopes {
            self.publish(envelope).await;
        }
    }
}
