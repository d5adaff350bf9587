//! 强类型 ID 定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
        #[display("{_0}")]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(
    /// 检验单 ID
    InspectionId
);

define_id!(
    /// 检验缺陷关联 ID
    InspectionDefectId
);

define_id!(
    /// 测量记录 ID
    MeasurementId
);

define_id!(
    /// 缺陷目录 ID
    DefectId
);

define_id!(
    /// 质量标准 ID
    QualityStandardId
);

define_id!(
    /// 质量检查记录 ID
    QualityCheckId
);

define_id!(
    /// 批次 ID
    BatchId
);

define_id!(
    /// 产品 ID
    ProductId
);
