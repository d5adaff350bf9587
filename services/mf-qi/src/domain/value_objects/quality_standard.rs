//! 质量标准值对象

use serde::{Deserialize, Serialize};

use super::QualityStandardId;

/// 质量标准
///
/// 测量值落在 `[min_value, max_value]`（缺省的一侧不设限）内即为合格。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityStandard {
    pub id: QualityStandardId,
    pub code: String,
    pub name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
}

impl QualityStandard {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: QualityStandardId::new(),
            code: code.into(),
            name: name.into(),
            min_value: None,
            max_value: None,
            unit: None,
        }
    }

    pub fn with_bounds(mut self, min_value: Option<f64>, max_value: Option<f64>) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// 判断测量值是否在规格内
    pub fn accepts(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_min = self.min_value.is_none_or(|min| value >= min);
        let below_max = self.max_value.is_none_or(|max| value <= max);
        above_min && below_max
    }
}
