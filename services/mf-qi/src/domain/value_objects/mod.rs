//! 值对象模块

mod ids;
mod quality_standard;

pub use ids::{
    BatchId, DefectId, InspectionDefectId, InspectionId, MeasurementId, ProductId,
    QualityCheckId, QualityStandardId,
};
pub use quality_standard::QualityStandard;
