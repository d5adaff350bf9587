//! cuba-common - 跨服务共享的通用类型

pub mod types;

pub use types::*;
