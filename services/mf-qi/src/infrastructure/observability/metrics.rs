//! QI Metrics
//!
//! 生命周期流转指标记录

use metrics::{counter, histogram};
use std::time::Instant;

use crate::domain::lifecycle::Transition;

/// 记录一次状态流转
///
/// `outcome` 取值 `success` / `rejected` / `error`。
pub fn record_transition(entity: &str, transition: &Transition, outcome: &str) {
    let labels = [
        ("entity", entity.to_string()),
        ("transition", transition.name().to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!("qi_lifecycle_transitions_total", &labels).increment(1);
}

/// 记录确认级联影响的子记录数
pub fn record_cascade(defects: usize, measurements: usize) {
    if defects > 0 {
        counter!("qi_children_confirmed_total", "kind" => "defect").increment(defects as u64);
    }
    if measurements > 0 {
        counter!("qi_children_confirmed_total", "kind" => "measurement")
            .increment(measurements as u64);
    }
}

/// 流转耗时计时器
pub struct TransitionTimer {
    start: Instant,
    entity: &'static str,
}

impl TransitionTimer {
    pub fn new(entity: &'static str) -> Self {
        Self {
            start: Instant::now(),
            entity,
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed().as_secs_f64();
        histogram!("qi_lifecycle_transition_duration_seconds", "entity" => self.entity)
            .record(duration);
    }
}
