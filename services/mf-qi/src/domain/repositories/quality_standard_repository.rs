//! 质量标准仓储接口

use async_trait::async_trait;
use errors::AppResult;
use ports::Repository;

use crate::domain::value_objects::{QualityStandard, QualityStandardId};

/// 质量标准仓储接口
#[async_trait]
pub trait QualityStandardRepository: Repository<QualityStandard, QualityStandardId> {
    /// 根据编码查找质量标准
    async fn find_by_code(&self, code: &str) -> AppResult<Option<QualityStandard>>;
}
