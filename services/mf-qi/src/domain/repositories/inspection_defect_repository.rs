//! 检验缺陷关联仓储接口

use async_trait::async_trait;
use errors::AppResult;
use ports::Repository;

use crate::domain::entities::InspectionDefect;
use crate::domain::value_objects::{InspectionDefectId, InspectionId};

/// 检验缺陷关联仓储接口
#[async_trait]
pub trait InspectionDefectRepository: Repository<InspectionDefect, InspectionDefectId> {
    /// 查找某检验单下的全部缺陷关联
    async fn find_by_inspection(
        &self,
        inspection_id: &InspectionId,
    ) -> AppResult<Vec<InspectionDefect>>;
}
