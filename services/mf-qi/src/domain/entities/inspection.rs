//! 检验单聚合根

use common::{AuditInfo, UserId};
use domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{InspectionDefect, Measurement};
use crate::domain::enums::{InspectionResult, InspectionStatus, InspectionType, LifecycleStatus};
use crate::domain::lifecycle::{
    self, Cascade, Lifecycle, LifecycleError, Transition, TransitionPlan,
};
use crate::domain::value_objects::{
    BatchId, DefectId, InspectionDefectId, InspectionId, MeasurementId, ProductId,
    QualityCheckId, QualityStandard,
};
use crate::error::{ServiceError, ServiceResult};

/// 检验单编码最大长度
pub const MAX_CODE_LEN: usize = 50;

/// 一次流转的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub plan: TransitionPlan,
    /// 被级联确认的缺陷数
    pub defects_confirmed: usize,
    /// 被级联确认的测量记录数
    pub measurements_confirmed: usize,
}

/// 检验单
///
/// 聚合根，按值拥有检验缺陷与测量记录，作为一个整体加载和保存。
/// `status` 与 `confirmed` 只能通过 [`Inspection::transition`] 修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    id: InspectionId,
    /// 检验单编码（唯一）
    code: String,
    inspection_type: InspectionType,
    quantity_inspected: i32,
    quantity_accepted: i32,
    quantity_rejected: i32,
    result: InspectionResult,
    notes: Option<String>,
    confirmed: bool,
    status: InspectionStatus,
    batch_id: Option<BatchId>,
    product_id: Option<ProductId>,
    inspector_id: Option<UserId>,
    quality_check_id: Option<QualityCheckId>,
    defects: Vec<InspectionDefect>,
    measurements: Vec<Measurement>,
    /// 乐观锁版本，新建为 0，每次保存递增
    version: u64,
    audit_info: AuditInfo,
}

impl Inspection {
    /// 创建检验单，状态为 NEW
    pub fn new(code: impl Into<String>, inspection_type: InspectionType) -> Self {
        Self {
            id: InspectionId::new(),
            code: code.into(),
            inspection_type,
            quantity_inspected: 0,
            quantity_accepted: 0,
            quantity_rejected: 0,
            result: InspectionResult::default(),
            notes: None,
            confirmed: false,
            status: LifecycleStatus::New,
            batch_id: None,
            product_id: None,
            inspector_id: None,
            quality_check_id: None,
            defects: Vec::new(),
            measurements: Vec::new(),
            version: 0,
            audit_info: AuditInfo::default(),
        }
    }

    // ========== Builders ==========

    pub fn with_quantities(mut self, inspected: i32, accepted: i32, rejected: i32) -> Self {
        self.quantity_inspected = inspected;
        self.quantity_accepted = accepted;
        self.quantity_rejected = rejected;
        self
    }

    pub fn with_result(mut self, result: InspectionResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_batch(mut self, batch_id: BatchId) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_inspector(mut self, inspector_id: UserId) -> Self {
        self.inspector_id = Some(inspector_id);
        self
    }

    pub fn with_quality_check(mut self, quality_check_id: QualityCheckId) -> Self {
        self.quality_check_id = Some(quality_check_id);
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> &InspectionId {
        &self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn inspection_type(&self) -> InspectionType {
        self.inspection_type
    }

    pub fn quantity_inspected(&self) -> i32 {
        self.quantity_inspected
    }

    pub fn quantity_accepted(&self) -> i32 {
        self.quantity_accepted
    }

    pub fn quantity_rejected(&self) -> i32 {
        self.quantity_rejected
    }

    pub fn result(&self) -> InspectionResult {
        self.result
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn status(&self) -> InspectionStatus {
        self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    pub fn batch_id(&self) -> Option<&BatchId> {
        self.batch_id.as_ref()
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn inspector_id(&self) -> Option<&UserId> {
        self.inspector_id.as_ref()
    }

    pub fn quality_check_id(&self) -> Option<&QualityCheckId> {
        self.quality_check_id.as_ref()
    }

    pub fn defects(&self) -> &[InspectionDefect] {
        &self.defects
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn defect(&self, id: &InspectionDefectId) -> Option<&InspectionDefect> {
        self.defects.iter().find(|d| d.id() == id)
    }

    // ========== 子记录 ==========

    /// 登记缺陷，仅未确认过的 NEW 检验单可登记
    pub fn record_defect(
        &mut self,
        defect_id: DefectId,
        quantity_affected: i32,
        user_id: Option<UserId>,
    ) -> ServiceResult<InspectionDefectId> {
        self.ensure_open_for_records("Defects")?;
        if quantity_affected < 0 {
            return Err(ServiceError::InvalidInput(
                "Affected quantity must not be negative".to_string(),
            ));
        }

        let defect = InspectionDefect::new(self.id, defect_id, quantity_affected, user_id.clone());
        let defect_link_id = *defect.id();
        self.defects.push(defect);
        self.audit_info.update(user_id);
        Ok(defect_link_id)
    }

    /// 登记测量值，仅未确认过的 NEW 检验单可登记
    pub fn record_measurement(
        &mut self,
        standard: &QualityStandard,
        measured_value: f64,
        user_id: Option<UserId>,
    ) -> ServiceResult<MeasurementId> {
        self.ensure_open_for_records("Measurements")?;
        if !measured_value.is_finite() {
            return Err(ServiceError::InvalidInput(
                "Measured value must be a finite number".to_string(),
            ));
        }

        let measurement = Measurement::new(self.id, standard, measured_value);
        let measurement_id = *measurement.id();
        self.measurements.push(measurement);
        self.audit_info.update(user_id);
        Ok(measurement_id)
    }

    /// 已确认过的检验单即使被改回 NEW 也不再接受子记录
    fn ensure_open_for_records(&self, what: &str) -> ServiceResult<()> {
        if self.status != LifecycleStatus::New {
            return Err(ServiceError::InvalidInput(format!(
                "{} can only be recorded on NEW inspections, current status is {}",
                what, self.status
            )));
        }
        if self.confirmed {
            return Err(ServiceError::InvalidInput(format!(
                "{} cannot be recorded on inspections that have been confirmed",
                what
            )));
        }
        Ok(())
    }

    // ========== 状态流转 ==========

    /// 执行状态流转并按计划级联确认子记录
    ///
    /// 被拒绝时检验单及其子记录均保持不变。
    pub fn transition(
        &mut self,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let plan = lifecycle::apply(self, transition)?;

        let (defects_confirmed, measurements_confirmed) = match plan.cascade {
            Cascade::None => (0, 0),
            Cascade::DefectsWithQuantity => (
                confirm_all(self.defects.iter_mut().filter(|d| d.quantity_affected() > 0)),
                self.confirm_measurements(),
            ),
            Cascade::All => (
                confirm_all(self.defects.iter_mut()),
                self.confirm_measurements(),
            ),
        };

        self.audit_info.update(user_id);
        Ok(TransitionOutcome {
            plan,
            defects_confirmed,
            measurements_confirmed,
        })
    }

    fn confirm_measurements(&mut self) -> usize {
        for measurement in &mut self.measurements {
            measurement.mark_confirmed();
        }
        self.measurements.len()
    }

    // ========== 持久化支持 ==========

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn defect_mut(&mut self, id: &InspectionDefectId) -> Option<&mut InspectionDefect> {
        self.defects.iter_mut().find(|d| d.id() == id)
    }

    pub(crate) fn defects_mut(&mut self) -> &mut [InspectionDefect] {
        &mut self.defects
    }

    pub(crate) fn remove_defect(&mut self, id: &InspectionDefectId) -> Option<InspectionDefect> {
        let index = self.defects.iter().position(|d| d.id() == id)?;
        Some(self.defects.remove(index))
    }
}

fn confirm_all<'a>(defects: impl Iterator<Item = &'a mut InspectionDefect>) -> usize {
    let mut confirmed = 0;
    for defect in defects {
        defect.mark_confirmed();
        confirmed += 1;
    }
    confirmed
}

impl Lifecycle for Inspection {
    const SUBJECT: &'static str = "inspections";

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

impl Entity for Inspection {
    type Id = InspectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Inspection {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }

    fn version(&self) -> u64 {
        Inspection::version(self)
    }
}
