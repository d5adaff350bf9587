//! 检验类型枚举

use serde::{Deserialize, Serialize};

/// 检验类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionType {
    /// 来料检验
    #[default]
    Incoming,
    /// 过程检验
    InProcess,
    /// 成品检验
    Final,
    /// 出货检验
    Outgoing,
}

impl From<i32> for InspectionType {
    fn from(value: i32) -> Self {
        match value {
            2 => InspectionType::InProcess,
            3 => InspectionType::Final,
            4 => InspectionType::Outgoing,
            _ => InspectionType::Incoming,
        }
    }
}

impl From<InspectionType> for i32 {
    fn from(value: InspectionType) -> Self {
        match value {
            InspectionType::Incoming => 1,
            InspectionType::InProcess => 2,
            InspectionType::Final => 3,
            InspectionType::Outgoing => 4,
        }
    }
}
