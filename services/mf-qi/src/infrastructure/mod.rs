//! 基础设施层

pub mod events;
pub mod locking;
pub mod observability;
pub mod persistence;
