//! 实体基础 trait

use common::AuditInfo;

/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根 trait
///
/// 聚合根是事务与并发控制的边界，`version` 用于乐观锁。
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;
    fn version(&self) -> u64;
}
