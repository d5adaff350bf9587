//! Business logic handler
//!
//! 每个变更操作都在 `inspection:<id>` 锁内完成“加载、流转、保存”，
//! 同一检验单及其缺陷的并发请求因此串行执行。保存成功后才发布事件。

use std::sync::Arc;

use common::{AuditInfo, UserId};
use domain_core::{AggregateRoot, EventEnvelope};
use errors::{AppError, AppResult};
use ports::{AggregateLock, LockGuard};
use tracing::{error, info, warn};

use crate::config::LifecycleConfig;
use crate::domain::entities::{Inspection, InspectionDefect, TransitionOutcome};
use crate::domain::events::InspectionEvent;
use crate::domain::lifecycle::{LifecycleError, Transition};
use crate::domain::repositories::{
    InspectionDefectRepository, InspectionRepository, QualityStandardRepository,
};
use crate::domain::value_objects::{InspectionDefectId, InspectionId, MeasurementId};
use crate::infrastructure::events::InspectionEventPublisher;
use crate::infrastructure::locking::inspection_lock_key;
use crate::infrastructure::observability::{TransitionTimer, record_cascade, record_transition};

use super::commands::*;
use super::queries::*;

const INSPECTION: &str = "inspection";
const INSPECTION_DEFECT: &str = "inspection_defect";

pub struct ServiceHandler {
    inspection_repo: Arc<dyn InspectionRepository>,
    defect_repo: Arc<dyn InspectionDefectRepository>,
    standard_repo: Arc<dyn QualityStandardRepository>,
    locks: Arc<dyn AggregateLock>,
    publisher: Arc<dyn InspectionEventPublisher>,
    config: LifecycleConfig,
}

impl ServiceHandler {
    pub fn new(
        inspection_repo: Arc<dyn InspectionRepository>,
        defect_repo: Arc<dyn InspectionDefectRepository>,
        standard_repo: Arc<dyn QualityStandardRepository>,
        locks: Arc<dyn AggregateLock>,
        publisher: Arc<dyn InspectionEventPublisher>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            inspection_repo,
            defect_repo,
            standard_repo,
            locks,
            publisher,
            config,
        }
    }

    // ========== 检验单 CRUD ==========

    /// 创建检验单
    pub async fn create_inspection(&self, cmd: CreateInspectionCommand) -> AppResult<InspectionId> {
        info!(code = %cmd.code, "Creating inspection");

        // 1. 验证命令
        cmd.validate()?;

        // 2. 检查编码是否已存在
        if self.inspection_repo.exists_by_code(&cmd.code).await? {
            return Err(AppError::conflict(format!(
                "Inspection code {} already exists",
                cmd.code
            )));
        }

        // 3. 创建检验单实体
        let mut inspection = Inspection::new(cmd.code, cmd.inspection_type)
            .with_quantities(
                cmd.quantity_inspected,
                cmd.quantity_accepted,
                cmd.quantity_rejected,
            )
            .with_result(cmd.result.unwrap_or_default());

        // 设置审计信息
        *inspection.audit_info_mut() = AuditInfo::new(cmd.user_id.clone());

        if let Some(notes) = cmd.notes {
            inspection = inspection.with_notes(notes);
        }
        if let Some(batch_id) = cmd.batch_id {
            inspection = inspection.with_batch(batch_id);
        }
        if let Some(product_id) = cmd.product_id {
            inspection = inspection.with_product(product_id);
        }
        if let Some(inspector_id) = cmd.inspector_id {
            inspection = inspection.with_inspector(inspector_id);
        }
        if let Some(quality_check_id) = cmd.quality_check_id {
            inspection = inspection.with_quality_check(quality_check_id);
        }

        // 4. 保存
        let saved = self.inspection_repo.save(&inspection).await?;
        let inspection_id = *saved.id();

        self.publish(
            InspectionEvent::Created {
                inspection_id,
                code: saved.code().to_string(),
            },
            saved.version(),
            cmd.user_id,
        )
        .await;

        info!(%inspection_id, "Inspection created");
        Ok(inspection_id)
    }

    /// 获取检验单
    pub async fn get_inspection(&self, query: GetInspectionQuery) -> AppResult<Inspection> {
        self.load_inspection(&query.inspection_id).await
    }

    /// 按编码获取检验单
    pub async fn get_inspection_by_code(
        &self,
        query: GetInspectionByCodeQuery,
    ) -> AppResult<Inspection> {
        self.inspection_repo
            .find_by_code(&query.code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inspection {} not found", query.code)))
    }

    /// 删除检验单及其全部子记录
    pub async fn delete_inspection(&self, cmd: DeleteInspectionCommand) -> AppResult<()> {
        info!(inspection_id = %cmd.inspection_id, "Deleting inspection");

        let _guard = self.lock_inspection(&cmd.inspection_id).await?;
        let inspection = self.load_inspection(&cmd.inspection_id).await?;

        self.inspection_repo
            .delete(&cmd.inspection_id)
            .await
            .inspect_err(|e| {
                error!(
                    inspection_id = %cmd.inspection_id,
                    error = %e,
                    "Failed to delete inspection"
                )
            })?;

        self.publish(
            InspectionEvent::Deleted {
                inspection_id: cmd.inspection_id,
            },
            inspection.version(),
            cmd.user_id,
        )
        .await;
        Ok(())
    }

    // ========== 子记录 ==========

    /// 登记缺陷
    pub async fn record_defect(&self, cmd: RecordDefectCommand) -> AppResult<InspectionDefectId> {
        info!(inspection_id = %cmd.inspection_id, defect_id = %cmd.defect_id, "Recording defect");
        cmd.validate()?;

        let _guard = self.lock_inspection(&cmd.inspection_id).await?;
        let mut inspection = self.load_inspection(&cmd.inspection_id).await?;

        let defect_link_id =
            inspection.record_defect(cmd.defect_id, cmd.quantity_affected, cmd.user_id.clone())?;
        let saved = self.save_inspection(&inspection).await?;

        self.publish(
            InspectionEvent::DefectRecorded {
                inspection_id: cmd.inspection_id,
                defect_link_id,
                defect_id: cmd.defect_id,
                quantity_affected: cmd.quantity_affected,
            },
            saved.version(),
            cmd.user_id,
        )
        .await;
        Ok(defect_link_id)
    }

    /// 登记测量值，是否合格由质量标准的上下限判定
    pub async fn record_measurement(
        &self,
        cmd: RecordMeasurementCommand,
    ) -> AppResult<MeasurementId> {
        info!(
            inspection_id = %cmd.inspection_id,
            quality_standard_id = %cmd.quality_standard_id,
            "Recording measurement"
        );
        cmd.validate()?;

        let standard = self
            .standard_repo
            .find_by_id(&cmd.quality_standard_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Quality standard {} not found",
                    cmd.quality_standard_id
                ))
            })?;

        let _guard = self.lock_inspection(&cmd.inspection_id).await?;
        let mut inspection = self.load_inspection(&cmd.inspection_id).await?;

        let measurement_id =
            inspection.record_measurement(&standard, cmd.measured_value, cmd.user_id.clone())?;
        let within_spec = standard.accepts(cmd.measured_value);
        let saved = self.save_inspection(&inspection).await?;

        self.publish(
            InspectionEvent::MeasurementRecorded {
                inspection_id: cmd.inspection_id,
                measurement_id,
                quality_standard_id: cmd.quality_standard_id,
                within_spec,
            },
            saved.version(),
            cmd.user_id,
        )
        .await;
        Ok(measurement_id)
    }

    // ========== 检验单状态流转 ==========

    /// 确认检验单，级联确认数量大于 0 的缺陷和全部测量记录
    pub async fn confirm_inspection(&self, cmd: ConfirmInspectionCommand) -> AppResult<Inspection> {
        self.transition_inspection(cmd.inspection_id, Transition::Confirm, cmd.user_id)
            .await
    }

    /// 取消检验单
    pub async fn cancel_inspection(&self, cmd: CancelInspectionCommand) -> AppResult<Inspection> {
        self.transition_inspection(cmd.inspection_id, Transition::Cancel, cmd.user_id)
            .await
    }

    /// 关闭检验单
    pub async fn close_inspection(&self, cmd: CloseInspectionCommand) -> AppResult<Inspection> {
        self.transition_inspection(cmd.inspection_id, Transition::Close, cmd.user_id)
            .await
    }

    /// 变更检验单状态
    pub async fn change_inspection_status(
        &self,
        cmd: ChangeInspectionStatusCommand,
    ) -> AppResult<Inspection> {
        let new_status = cmd.validate()?;
        self.transition_inspection(
            cmd.inspection_id,
            Transition::ChangeStatus(new_status),
            cmd.user_id,
        )
        .await
    }

    async fn transition_inspection(
        &self,
        inspection_id: InspectionId,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> AppResult<Inspection> {
        info!(%inspection_id, %transition, "Transitioning inspection");

        let timer = TransitionTimer::new(INSPECTION);
        let result = self
            .apply_inspection_transition(inspection_id, transition, user_id)
            .await;
        timer.finish();
        record_transition(INSPECTION, &transition, outcome_label(&result));

        result
    }

    async fn apply_inspection_transition(
        &self,
        inspection_id: InspectionId,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> AppResult<Inspection> {
        let _guard = self.lock_inspection(&inspection_id).await?;
        let mut inspection = self.load_inspection(&inspection_id).await?;

        let outcome = inspection
            .transition(transition, user_id.clone())
            .map_err(|e| rejected(INSPECTION, &inspection_id.to_string(), e))?;
        let saved = self.save_inspection(&inspection).await?;

        record_cascade(outcome.defects_confirmed, outcome.measurements_confirmed);
        info!(
            %inspection_id,
            from = %outcome.plan.from,
            to = %outcome.plan.to,
            cascaded_defects = outcome.defects_confirmed,
            cascaded_measurements = outcome.measurements_confirmed,
            version = saved.version(),
            "Inspection transitioned"
        );

        self.publish(
            inspection_event(inspection_id, transition, &outcome),
            saved.version(),
            user_id,
        )
        .await;
        Ok(saved)
    }

    // ========== 检验缺陷 ==========

    /// 获取检验缺陷
    pub async fn get_defect_link(&self, query: GetDefectLinkQuery) -> AppResult<InspectionDefect> {
        self.load_defect_link(&query.defect_link_id).await
    }

    /// 列出检验单下的全部缺陷
    pub async fn list_defect_links(
        &self,
        query: ListDefectLinksQuery,
    ) -> AppResult<Vec<InspectionDefect>> {
        if !self.inspection_repo.exists(&query.inspection_id).await? {
            return Err(AppError::not_found(format!(
                "Inspection {} not found",
                query.inspection_id
            )));
        }
        self.defect_repo.find_by_inspection(&query.inspection_id).await
    }

    /// 确认检验缺陷，不级联
    pub async fn confirm_defect_link(
        &self,
        cmd: ConfirmDefectLinkCommand,
    ) -> AppResult<InspectionDefect> {
        self.transition_defect_link(cmd.defect_link_id, Transition::Confirm, cmd.user_id)
            .await
    }

    /// 取消检验缺陷
    pub async fn cancel_defect_link(
        &self,
        cmd: CancelDefectLinkCommand,
    ) -> AppResult<InspectionDefect> {
        self.transition_defect_link(cmd.defect_link_id, Transition::Cancel, cmd.user_id)
            .await
    }

    /// 关闭检验缺陷
    pub async fn close_defect_link(
        &self,
        cmd: CloseDefectLinkCommand,
    ) -> AppResult<InspectionDefect> {
        self.transition_defect_link(cmd.defect_link_id, Transition::Close, cmd.user_id)
            .await
    }

    /// 变更检验缺陷状态
    pub async fn change_defect_link_status(
        &self,
        cmd: ChangeDefectLinkStatusCommand,
    ) -> AppResult<InspectionDefect> {
        let new_status = cmd.validate()?;
        self.transition_defect_link(
            cmd.defect_link_id,
            Transition::ChangeStatus(new_status),
            cmd.user_id,
        )
        .await
    }

    async fn transition_defect_link(
        &self,
        defect_link_id: InspectionDefectId,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> AppResult<InspectionDefect> {
        info!(%defect_link_id, %transition, "Transitioning inspection defect");

        let timer = TransitionTimer::new(INSPECTION_DEFECT);
        let result = self
            .apply_defect_transition(defect_link_id, transition, user_id)
            .await;
        timer.finish();
        record_transition(INSPECTION_DEFECT, &transition, outcome_label(&result));

        result
    }

    async fn apply_defect_transition(
        &self,
        defect_link_id: InspectionDefectId,
        transition: Transition,
        user_id: Option<UserId>,
    ) -> AppResult<InspectionDefect> {
        // 锁的是所属检验单，先读一次拿到检验单 ID，加锁后重新加载
        let inspection_id = *self.load_defect_link(&defect_link_id).await?.inspection_id();
        let _guard = self.lock_inspection(&inspection_id).await?;
        let mut link = self.load_defect_link(&defect_link_id).await?;

        let plan = link
            .transition(transition, user_id.clone())
            .map_err(|e| rejected(INSPECTION_DEFECT, &defect_link_id.to_string(), e))?;
        let saved = self.defect_repo.save(&link).await.inspect_err(|e| {
            error!(%defect_link_id, error = %e, "Failed to save inspection defect")
        })?;

        info!(
            %defect_link_id,
            from = %plan.from,
            to = %plan.to,
            version = saved.version(),
            "Inspection defect transitioned"
        );

        self.publish(
            InspectionEvent::DefectStatusChanged {
                inspection_id,
                defect_link_id,
                from: plan.from,
                to: plan.to,
            },
            saved.version(),
            user_id,
        )
        .await;
        Ok(saved)
    }

    // ========== 内部辅助 ==========

    async fn lock_inspection(&self, inspection_id: &InspectionId) -> AppResult<LockGuard> {
        self.locks
            .acquire(&inspection_lock_key(inspection_id), self.config.lock_timeout())
            .await
    }

    async fn load_inspection(&self, inspection_id: &InspectionId) -> AppResult<Inspection> {
        self.inspection_repo
            .find_by_id(inspection_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inspection {} not found", inspection_id)))
    }

    async fn load_defect_link(
        &self,
        defect_link_id: &InspectionDefectId,
    ) -> AppResult<InspectionDefect> {
        self.defect_repo
            .find_by_id(defect_link_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Inspection defect {} not found", defect_link_id))
            })
    }

    async fn save_inspection(&self, inspection: &Inspection) -> AppResult<Inspection> {
        self.inspection_repo.save(inspection).await.inspect_err(|e| {
            error!(inspection_id = %inspection.id(), error = %e, "Failed to save inspection")
        })
    }

    async fn publish(&self, event: InspectionEvent, version: u64, user_id: Option<UserId>) {
        if !self.config.publish_events {
            return;
        }
        self.publisher
            .publish(EventEnvelope::new(event, version, user_id))
            .await;
    }
}

fn rejected(entity: &str, id: &str, error: LifecycleError) -> AppError {
    warn!(
        entity,
        id,
        from = %error.from,
        transition = %error.transition,
        reason = %error.reason,
        "Transition rejected"
    );
    error.into()
}

fn outcome_label<T>(result: &AppResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(AppError::InvalidTransition(_)) => "rejected",
        Err(_) => "error",
    }
}

fn inspection_event(
    inspection_id: InspectionId,
    transition: Transition,
    outcome: &TransitionOutcome,
) -> InspectionEvent {
    let from = outcome.plan.from;
    if outcome.plan.confirms {
        return InspectionEvent::Confirmed {
            inspection_id,
            from,
            cascaded_defects: outcome.defects_confirmed,
            cascaded_measurements: outcome.measurements_confirmed,
        };
    }
    match transition {
        Transition::Cancel => InspectionEvent::Cancelled {
            inspection_id,
            from,
        },
        Transition::Close => InspectionEvent::Closed { inspection_id },
        Transition::Confirm | Transition::ChangeStatus(_) => InspectionEvent::StatusChanged {
            inspection_id,
            from,
            to: outcome.plan.to,
        },
    }
}
