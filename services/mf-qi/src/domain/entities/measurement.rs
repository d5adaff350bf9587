//! 测量记录实体

use domain_core::Entity;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{InspectionId, MeasurementId, QualityStandard, QualityStandardId};

/// 测量记录
///
/// 没有独立的状态机，只有 `confirmed` 标记，随检验单确认级联置位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    id: MeasurementId,
    inspection_id: InspectionId,
    quality_standard_id: QualityStandardId,
    measured_value: f64,
    within_spec: bool,
    confirmed: bool,
}

impl Measurement {
    pub(crate) fn new(
        inspection_id: InspectionId,
        standard: &QualityStandard,
        measured_value: f64,
    ) -> Self {
        Self {
            id: MeasurementId::new(),
            inspection_id,
            quality_standard_id: standard.id,
            measured_value,
            within_spec: standard.accepts(measured_value),
            confirmed: false,
        }
    }

    pub fn id(&self) -> &MeasurementId {
        &self.id
    }

    pub fn inspection_id(&self) -> &InspectionId {
        &self.inspection_id
    }

    pub fn quality_standard_id(&self) -> &QualityStandardId {
        &self.quality_standard_id
    }

    pub fn measured_value(&self) -> f64 {
        self.measured_value
    }

    pub fn is_within_spec(&self) -> bool {
        self.within_spec
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }
}

impl Entity for Measurement {
    type Id = MeasurementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
