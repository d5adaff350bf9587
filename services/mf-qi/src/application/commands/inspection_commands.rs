//! Inspection commands

use common::UserId;
use errors::{AppError, AppResult};

use crate::domain::entities::MAX_CODE_LEN;
use crate::domain::enums::{InspectionResult, InspectionStatus, InspectionType};
use crate::domain::value_objects::{
    BatchId, DefectId, InspectionId, ProductId, QualityCheckId, QualityStandardId,
};

/// 创建检验单命令
#[derive(Debug, Clone)]
pub struct CreateInspectionCommand {
    pub user_id: Option<UserId>,
    pub code: String,
    pub inspection_type: InspectionType,
    pub quantity_inspected: i32,
    pub quantity_accepted: i32,
    pub quantity_rejected: i32,
    pub result: Option<InspectionResult>,
    pub notes: Option<String>,
    pub batch_id: Option<BatchId>,
    pub product_id: Option<ProductId>,
    pub inspector_id: Option<UserId>,
    pub quality_check_id: Option<QualityCheckId>,
}

impl CreateInspectionCommand {
    /// 仅带必填字段的命令，数量均为 0
    pub fn new(code: impl Into<String>, inspection_type: InspectionType) -> Self {
        Self {
            user_id: None,
            code: code.into(),
            inspection_type,
            quantity_inspected: 0,
            quantity_accepted: 0,
            quantity_rejected: 0,
            result: None,
            notes: None,
            batch_id: None,
            product_id: None,
            inspector_id: None,
            quality_check_id: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.code.trim().is_empty() {
            return Err(AppError::validation("Inspection code must not be empty"));
        }
        if self.code.chars().count() > MAX_CODE_LEN {
            return Err(AppError::validation(format!(
                "Inspection code must not exceed {} characters",
                MAX_CODE_LEN
            )));
        }
        if self.quantity_inspected < 0 || self.quantity_accepted < 0 || self.quantity_rejected < 0
        {
            return Err(AppError::validation("Quantities must not be negative"));
        }
        Ok(())
    }
}

/// 删除检验单命令
#[derive(Debug, Clone)]
pub struct DeleteInspectionCommand {
    pub inspection_id: InspectionId,
    pub user_id: Option<UserId>,
}

/// 登记缺陷命令
#[derive(Debug, Clone)]
pub struct RecordDefectCommand {
    pub inspection_id: InspectionId,
    pub defect_id: DefectId,
    pub quantity_affected: i32,
    pub user_id: Option<UserId>,
}

impl RecordDefectCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.quantity_affected < 0 {
            return Err(AppError::validation("Affected quantity must not be negative"));
        }
        Ok(())
    }
}

/// 登记测量值命令
#[derive(Debug, Clone)]
pub struct RecordMeasurementCommand {
    pub inspection_id: InspectionId,
    pub quality_standard_id: QualityStandardId,
    pub measured_value: f64,
    pub user_id: Option<UserId>,
}

impl RecordMeasurementCommand {
    pub fn validate(&self) -> AppResult<()> {
        if !self.measured_value.is_finite() {
            return Err(AppError::validation("Measured value must be a finite number"));
        }
        Ok(())
    }
}

// ========== 状态流转命令 ==========

/// 确认检验单命令
#[derive(Debug, Clone)]
pub struct ConfirmInspectionCommand {
    pub inspection_id: InspectionId,
    pub user_id: Option<UserId>,
}

/// 取消检验单命令
#[derive(Debug, Clone)]
pub struct CancelInspectionCommand {
    pub inspection_id: InspectionId,
    pub user_id: Option<UserId>,
}

/// 关闭检验单命令
#[derive(Debug, Clone)]
pub struct CloseInspectionCommand {
    pub inspection_id: InspectionId,
    pub user_id: Option<UserId>,
}

/// 变更检验单状态命令
///
/// `new_status` 为 `None` 时视为缺失参数，在加载检验单之前即被拒绝。
#[derive(Debug, Clone)]
pub struct ChangeInspectionStatusCommand {
    pub inspection_id: InspectionId,
    pub new_status: Option<InspectionStatus>,
    pub user_id: Option<UserId>,
}

impl ChangeInspectionStatusCommand {
    pub fn validate(&self) -> AppResult<InspectionStatus> {
        self.new_status
            .ok_or_else(|| AppError::validation("Status must not be null"))
    }
}
