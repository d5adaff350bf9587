//! 检验结论枚举

use serde::{Deserialize, Serialize};

/// 检验结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionResult {
    /// 待判定
    #[default]
    Pending,
    /// 合格
    Passed,
    /// 不合格
    Failed,
    /// 让步接收
    ConditionallyAccepted,
}

impl InspectionResult {
    /// 是否允许放行
    pub fn allows_release(&self) -> bool {
        matches!(
            self,
            InspectionResult::Passed | InspectionResult::ConditionallyAccepted
        )
    }
}
