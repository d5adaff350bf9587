//! 检验单仓储接口

use async_trait::async_trait;
use errors::AppResult;
use ports::Repository;

use crate::domain::entities::Inspection;
use crate::domain::value_objects::InspectionId;

/// 检验单仓储接口
///
/// `find_by_id` 连同缺陷关联与测量记录一起加载聚合；
/// `save` 在同一事务内持久化聚合根与全部子记录，版本不一致时返回 `Conflict`。
#[async_trait]
pub trait InspectionRepository: Repository<Inspection, InspectionId> {
    /// 根据编码查找检验单
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Inspection>>;

    /// 检查编码是否存在
    async fn exists_by_code(&self, code: &str) -> AppResult<bool>;
}
