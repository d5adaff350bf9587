//! Inspection queries

use crate::domain::value_objects::{InspectionDefectId, InspectionId};

/// 获取检验单查询
#[derive(Debug, Clone)]
pub struct GetInspectionQuery {
    pub inspection_id: InspectionId,
}

/// 按编码获取检验单查询
#[derive(Debug, Clone)]
pub struct GetInspectionByCodeQuery {
    pub code: String,
}

/// 获取检验缺陷查询
#[derive(Debug, Clone)]
pub struct GetDefectLinkQuery {
    pub defect_link_id: InspectionDefectId,
}

/// 列出检验单下的缺陷查询
#[derive(Debug, Clone)]
pub struct ListDefectLinksQuery {
    pub inspection_id: InspectionId,
}
