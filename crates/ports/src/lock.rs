//! 聚合锁 trait 定义

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;
use errors::AppResult;

/// 锁守卫，drop 时释放锁
pub struct LockGuard {
    key: String,
    _inner: Box<dyn Any + Send + Sync>,
}

impl LockGuard {
    pub fn new(key: impl Into<String>, inner: impl Any + Send + Sync) -> Self {
        Self {
            key: key.into(),
            _inner: Box::new(inner),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("key", &self.key).finish()
    }
}

/// 按 key 串行化的锁
///
/// 同一 key 上的持有者互斥，不同 key 互不影响。
#[async_trait]
pub trait AggregateLock: Send + Sync {
    /// 获取锁，超时返回 `AppError::Conflict`
    async fn acquire(&self, key: &str, timeout: Duration) -> AppResult<LockGuard>;
}
