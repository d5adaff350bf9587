//! 生命周期状态枚举（检验单/检验缺陷共用）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 生命周期状态
///
/// 状态之间的合法流转只由 [`crate::domain::lifecycle::plan`] 决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    /// 新建
    #[default]
    New,
    /// 已确认
    Confirmed,
    /// 已关闭
    Closed,
    /// 已取消
    Cancelled,
}

/// 检验单状态
pub type InspectionStatus = LifecycleStatus;

/// 检验缺陷状态
pub type InspectionDefectStatus = LifecycleStatus;

impl LifecycleStatus {
    pub const ALL: [LifecycleStatus; 4] = [
        LifecycleStatus::New,
        LifecycleStatus::Confirmed,
        LifecycleStatus::Closed,
        LifecycleStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::New => "NEW",
            LifecycleStatus::Confirmed => "CONFIRMED",
            LifecycleStatus::Closed => "CLOSED",
            LifecycleStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(LifecycleStatus::New),
            "CONFIRMED" => Ok(LifecycleStatus::Confirmed),
            "CLOSED" => Ok(LifecycleStatus::Closed),
            "CANCELLED" => Ok(LifecycleStatus::Cancelled),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

impl From<LifecycleStatus> for i32 {
    fn from(status: LifecycleStatus) -> Self {
        match status {
            LifecycleStatus::New => 1,
            LifecycleStatus::Confirmed => 2,
            LifecycleStatus::Closed => 3,
            LifecycleStatus::Cancelled => 4,
        }
    }
}

impl TryFrom<i32> for LifecycleStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LifecycleStatus::New),
            2 => Ok(LifecycleStatus::Confirmed),
            3 => Ok(LifecycleStatus::Closed),
            4 => Ok(LifecycleStatus::Cancelled),
            other => Err(format!("Unknown status code: {}", other)),
        }
    }
}
