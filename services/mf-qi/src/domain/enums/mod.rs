//! 枚举模块

mod inspection_result;
mod inspection_type;
mod lifecycle_status;

pub use inspection_result::InspectionResult;
pub use inspection_type::InspectionType;
pub use lifecycle_status::{InspectionDefectStatus, InspectionStatus, LifecycleStatus};
