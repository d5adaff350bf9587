//! 生命周期状态机
//!
//! 检验单与检验缺陷共用同一张状态流转表：
//!
//! | 请求                       | 允许的当前状态        | 目标状态   | 副作用                         |
//! |----------------------------|-----------------------|------------|--------------------------------|
//! | `Confirm`                  | 任意                  | CONFIRMED  | confirmed = true，按数量级联    |
//! | `Cancel`                   | NEW / CONFIRMED       | CANCELLED  | 无                             |
//! | `Close`                    | CONFIRMED             | CLOSED     | 无                             |
//! | `ChangeStatus(CONFIRMED)`  | NEW                   | CONFIRMED  | confirmed = true，全量级联      |
//! | `ChangeStatus(其他)`       | 除 CLOSED 外任意      | 请求的状态 | 无                             |
//!
//! `Confirm` 是不校验前置状态的快捷入口，与 `ChangeStatus(CONFIRMED)` 的前置条件和
//! 级联范围都不同，两者需分别保持。

use std::fmt;

use thiserror::Error;

use crate::domain::enums::LifecycleStatus;

/// 状态流转请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// 确认（快捷入口）
    Confirm,
    /// 取消
    Cancel,
    /// 关闭
    Close,
    /// 变更为任意状态
    ChangeStatus(LifecycleStatus),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Confirm => "confirm",
            Transition::Cancel => "cancel",
            Transition::Close => "close",
            Transition::ChangeStatus(_) => "change_status",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::ChangeStatus(status) => write!(f, "change_status({})", status),
            other => f.write_str(other.name()),
        }
    }
}

/// 确认时对子记录的级联范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    /// 不级联
    None,
    /// 仅影响数量大于 0 的缺陷，测量记录全部确认
    DefectsWithQuantity,
    /// 全部缺陷与测量记录
    All,
}

/// 通过校验的流转计划
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: LifecycleStatus,
    pub to: LifecycleStatus,
    /// 是否置 confirmed = true
    pub confirms: bool,
    pub cascade: Cascade,
}

/// 被拒绝的状态流转
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct LifecycleError {
    pub subject: &'static str,
    pub from: LifecycleStatus,
    pub transition: Transition,
    pub reason: String,
}

impl LifecycleError {
    fn new(
        subject: &'static str,
        from: LifecycleStatus,
        transition: Transition,
        reason: String,
    ) -> Self {
        Self {
            subject,
            from,
            transition,
            reason,
        }
    }
}

/// 查表得出流转计划，不修改任何状态
///
/// `subject` 是出现在错误消息中的复数名词，如 `inspections`。
pub fn plan(
    from: LifecycleStatus,
    transition: Transition,
    subject: &'static str,
) -> Result<TransitionPlan, LifecycleError> {
    use LifecycleStatus::{Cancelled, Closed, Confirmed, New};

    let allow = |to: LifecycleStatus,
                 confirms: bool,
                 cascade: Cascade|
     -> Result<TransitionPlan, LifecycleError> {
        Ok(TransitionPlan {
            from,
            to,
            confirms,
            cascade,
        })
    };
    let reject = |reason: String| -> Result<TransitionPlan, LifecycleError> {
        Err(LifecycleError::new(subject, from, transition, reason))
    };

    match (transition, from) {
        (Transition::Confirm, _) => allow(Confirmed, true, Cascade::DefectsWithQuantity),

        (Transition::Cancel, New | Confirmed) => allow(Cancelled, false, Cascade::None),
        (Transition::Cancel, _) => reject(format!(
            "Only NEW or CONFIRMED {} can be cancelled",
            subject
        )),

        (Transition::Close, Confirmed) => allow(Closed, false, Cascade::None),
        (Transition::Close, _) => reject(format!("Only CONFIRMED {} can be closed", subject)),

        (Transition::ChangeStatus(_), Closed) => {
            reject(format!("Closed {} cannot change status", subject))
        }
        (Transition::ChangeStatus(Confirmed), New) => allow(Confirmed, true, Cascade::All),
        (Transition::ChangeStatus(Confirmed), _) => {
            reject(format!("Only NEW {} can be confirmed", subject))
        }
        (Transition::ChangeStatus(to), _) => allow(to, false, Cascade::None),
    }
}

/// 受状态机管理的实体
///
/// 仅在 crate 内可见，status/confirmed 只能经由 [`apply`] 写入。
pub(crate) trait Lifecycle {
    /// 错误消息中的复数名词
    const SUBJECT: &'static str;

    fn status(&self) -> LifecycleStatus;

    fn is_confirmed(&self) -> bool;

    fn write_lifecycle(&mut self, status: LifecycleStatus, confirmed: bool);
}

/// 对实体执行一次流转：查表、写入状态，返回计划供调用方处理级联
///
/// 被拒绝时实体保持不变。
pub(crate) fn apply<E: Lifecycle>(
    entity: &mut E,
    transition: Transition,
) -> Result<TransitionPlan, LifecycleError> {
    let plan = plan(entity.status(), transition, E::SUBJECT)?;
    let confirmed = entity.is_confirmed() || plan.confirms;
    entity.write_lifecycle(plan.to, confirmed);
    Ok(plan)
}
