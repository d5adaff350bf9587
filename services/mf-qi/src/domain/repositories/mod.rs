//! 仓储接口模块

mod inspection_defect_repository;
mod inspection_repository;
mod quality_standard_repository;

pub use inspection_defect_repository::InspectionDefectRepository;
pub use inspection_repository::InspectionRepository;
pub use quality_standard_repository::QualityStandardRepository;
