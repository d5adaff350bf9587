//! Inspection defect commands

use common::UserId;
use errors::{AppError, AppResult};

use crate::domain::enums::InspectionDefectStatus;
use crate::domain::value_objects::InspectionDefectId;

/// 确认检验缺陷命令
#[derive(Debug, Clone)]
pub struct ConfirmDefectLinkCommand {
    pub defect_link_id: InspectionDefectId,
    pub user_id: Option<UserId>,
}

/// 取消检验缺陷命令
#[derive(Debug, Clone)]
pub struct CancelDefectLinkCommand {
    pub defect_link_id: InspectionDefectId,
    pub user_id: Option<UserId>,
}

/// 关闭检验缺陷命令
#[derive(Debug, Clone)]
pub struct CloseDefectLinkCommand {
    pub defect_link_id: InspectionDefectId,
    pub user_id: Option<UserId>,
}

/// 变更检验缺陷状态命令
#[derive(Debug, Clone)]
pub struct ChangeDefectLinkStatusCommand {
    pub defect_link_id: InspectionDefectId,
    pub new_status: Option<InspectionDefectStatus>,
    pub user_id: Option<UserId>,
}

impl ChangeDefectLinkStatusCommand {
    pub fn validate(&self) -> AppResult<InspectionDefectStatus> {
        self.new_status
            .ok_or_else(|| AppError::validation("Status must not be null"))
    }
}
