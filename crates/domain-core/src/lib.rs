//! domain-core - 跨 context 的领域核心类型
//!
//! 实体/聚合根 trait 与领域事件信封

mod entity;
mod event;

pub use entity::*;
pub use event::*;

// Re-export common types
pub use common::{AuditInfo, UserId};
