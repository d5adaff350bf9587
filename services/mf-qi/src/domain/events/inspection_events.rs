//! 检验单领域事件

use domain_core::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::domain::enums::LifecycleStatus;
use crate::domain::value_objects::{
    DefectId, InspectionDefectId, InspectionId, MeasurementId, QualityStandardId,
};

/// 检验单领域事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InspectionEvent {
    /// 检验单已创建
    Created {
        inspection_id: InspectionId,
        code: String,
    },
    /// 已登记缺陷
    DefectRecorded {
        inspection_id: InspectionId,
        defect_link_id: InspectionDefectId,
        defect_id: DefectId,
        quantity_affected: i32,
    },
    /// 已登记测量值
    MeasurementRecorded {
        inspection_id: InspectionId,
        measurement_id: MeasurementId,
        quality_standard_id: QualityStandardId,
        within_spec: bool,
    },
    /// 检验单已确认（含级联数量）
    Confirmed {
        inspection_id: InspectionId,
        from: LifecycleStatus,
        cascaded_defects: usize,
        cascaded_measurements: usize,
    },
    /// 检验单已取消
    Cancelled {
        inspection_id: InspectionId,
        from: LifecycleStatus,
    },
    /// 检验单已关闭
    Closed { inspection_id: InspectionId },
    /// 检验单状态已变更（非确认的任意变更）
    StatusChanged {
        inspection_id: InspectionId,
        from: LifecycleStatus,
        to: LifecycleStatus,
    },
    /// 检验单已删除
    Deleted { inspection_id: InspectionId },
    /// 检验缺陷状态已变更
    DefectStatusChanged {
        inspection_id: InspectionId,
        defect_link_id: InspectionDefectId,
        from: LifecycleStatus,
        to: LifecycleStatus,
    },
}

impl InspectionEvent {
    pub fn inspection_id(&self) -> &InspectionId {
        match self {
            Self::Created { inspection_id, .. }
            | Self::DefectRecorded { inspection_id, .. }
            | Self::MeasurementRecorded { inspection_id, .. }
            | Self::Confirmed { inspection_id, .. }
            | Self::Cancelled { inspection_id, .. }
            | Self::Closed { inspection_id }
            | Self::StatusChanged { inspection_id, .. }
            | Self::Deleted { inspection_id }
            | Self::DefectStatusChanged { inspection_id, .. } => inspection_id,
        }
    }
}

impl DomainEvent for InspectionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "InspectionCreated",
            Self::DefectRecorded { .. } => "InspectionDefectRecorded",
            Self::MeasurementRecorded { .. } => "InspectionMeasurementRecorded",
            Self::Confirmed { .. } => "InspectionConfirmed",
            Self::Cancelled { .. } => "InspectionCancelled",
            Self::Closed { .. } => "InspectionClosed",
            Self::StatusChanged { .. } => "InspectionStatusChanged",
            Self::Deleted { .. } => "InspectionDeleted",
            Self::DefectStatusChanged { .. } => "InspectionDefectStatusChanged",
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "Inspection"
    }

    fn aggregate_id(&self) -> String {
        self.inspection_id().to_string()
    }
}
