//! 检验缺陷关联实体

use common::{AuditInfo, UserId};
use domain_core::Entity;
use serde::{Deserialize, Serialize};

use crate::domain::enums::{InspectionDefectStatus, LifecycleStatus};
use crate::domain::lifecycle::{self, Lifecycle, LifecycleError, Transition, TransitionPlan};
use crate::domain::value_objects::{DefectId, InspectionDefectId, InspectionId};

/// 检验缺陷关联
///
/// 表示"某次检验中发现了缺陷目录中的某个缺陷，影响 N 件"。
/// 归属于检验单聚合，不能脱离检验单单独存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionDefect {
    id: InspectionDefectId,
    inspection_id: InspectionId,
    defect_id: DefectId,
    quantity_affected: i32,
    confirmed: bool,
    status: InspectionDefectStatus,
    /// 乐观锁版本
    version: u64,
    audit_info: AuditInfo,
}

impl InspectionDefect {
    pub(crate) fn new(
        inspection_id: InspectionId,
        defect_id: DefectId,
        quantity_affected: i32,
        user_id: Option<UserId>,
    ) -> Self {
        Self {
            id: InspectionDefectId::new(),
            inspection_id,
            defect_id,
            quantity_affected,
            confirmed: false,
            status: LifecycleStatus::New,
            version: 0,
            audit_info: AuditInfo::new(user_id),
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &InspectionDefectId {
        &self.id
    }

    pub fn inspection_id(&self) -> &InspectionId {
        &self.inspection_id
    }

    pub fn defect_id(&self) -> &DefectId {
        &self.defect_id
    }

    pub fn quantity_affected(&self) -> i32 {
        self.quantity_affected
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn status(&self) -> InspectionDefectStatus {
        self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== 状态流转 ==========

    /// 执行状态流转，被拒绝时记录保持不变
    pub fn transition(
        &mut self,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> Result<TransitionPlan, LifecycleError> {
        let plan = lifecycle::apply(self, transition)?;
        self.audit_info.update(user_id);
        Ok(plan)
    }

    /// 由检验单确认级联调用，只置 confirmed，不改变 status
    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Lifecycle for InspectionDefect {
    const SUBJECT: &'static str = "inspection defects";

    fn status(&self) -> LifecycleStatus {
        self.status
    }

    fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    fn write_lifecycle(&mut self, status: LifecycleStatus, confirmed: bool) {
        self.status = status;
        self.confirmed = confirmed;
    }
}

impl Entity for InspectionDefect {
    type Id = InspectionDefectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
