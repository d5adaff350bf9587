//! 进程内按 key 互斥的锁管理器

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use errors::{AppError, AppResult};
use ports::{AggregateLock, LockGuard};
use tracing::warn;

use crate::domain::value_objects::InspectionId;

/// 检验单聚合的锁 key，缺陷关联的流转同样使用所属检验单的 key
pub fn inspection_lock_key(inspection_id: &InspectionId) -> String {
    format!("inspection:{}", inspection_id)
}

/// 进程内聚合锁
///
/// 每个 key 对应一个 `tokio::sync::Mutex`，无人持有也无人等待的条目在下次获取时清理。
#[derive(Default)]
pub struct KeyedLockManager {
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        slots.entry(key.to_string()).or_default().clone()
    }

    /// 当前登记的 key 数量
    pub fn tracked_keys(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl AggregateLock for KeyedLockManager {
    async fn acquire(&self, key: &str, timeout: Duration) -> AppResult<LockGuard> {
        let slot = self.slot(key);
        match tokio::time::timeout(timeout, slot.lock_owned()).await {
            Ok(guard) => Ok(LockGuard::new(key, guard)),
            Err(_) => {
                warn!(key, ?timeout, "Timed out waiting for aggregate lock");
                Err(AppError::conflict(format!(
                    "Timed out waiting for lock on {}",
                    key
                )))
            }
        }
    }
}
