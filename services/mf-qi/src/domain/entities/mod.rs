//! 实体模块

mod inspection;
mod inspection_defect;
mod measurement;

pub use inspection::{Inspection, MAX_CODE_LEN, TransitionOutcome};
pub use inspection_defect::InspectionDefect;
pub use measurement::Measurement;
