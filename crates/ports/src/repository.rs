//! Repository trait 定义

use async_trait::async_trait;
use errors::AppResult;

/// 基础 Repository trait
///
/// `save` 以单个事务持久化整个聚合（含其拥有的子记录），
/// 并返回持久化后的状态（版本号已递增）。
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存实体
    async fn save(&self, entity: &T) -> AppResult<T>;

    /// 删除实体
    async fn delete(&self, id: &ID) -> AppResult<()>;

    /// 检查是否存在
    async fn exists(&self, id: &ID) -> AppResult<bool>;
}
