//! mf-qi - 质量检验服务
//!
//! 检验单与检验缺陷的生命周期管理：确认、取消、关闭、状态变更，
//! 以及确认时对缺陷和测量记录的级联。

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
