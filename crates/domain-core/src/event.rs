//! 领域事件

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain Event trait
pub trait DomainEvent: Send + Sync + Serialize {
    /// 事件类型名称
    fn event_type(&self) -> &'static str;

    /// 聚合类型
    fn aggregate_type(&self) -> &'static str;

    /// 聚合 ID
    fn aggregate_id(&self) -> String;
}

/// 事件信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    pub id: Uuid,
    pub event_type: String,
    pub aggregate_type: String,
    pub aggregate_id: String,
    /// 事件发生后被修改记录的版本号
    pub aggregate_version: u64,
    pub user_id: Option<UserId>,
    pub occurred_at: DateTime<Utc>,
    pub data: E,
}

impl<E: DomainEvent> EventEnvelope<E> {
    pub fn new(event: E, aggregate_version: u64, user_id: Option<UserId>) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event.event_type().to_string(),
            aggregate_type: event.aggregate_type().to_string(),
            aggregate_id: event.aggregate_id(),
            aggregate_version,
            user_id,
            occurred_at: Utc::now(),
            data: event,
        }
    }
}
