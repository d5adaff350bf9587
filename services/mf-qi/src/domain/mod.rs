//! 领域层
//!
//! 实体、值对象、枚举、生命周期状态机、仓储接口与领域事件

pub mod entities;
pub mod enums;
pub mod events;
pub mod lifecycle;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use enums::*;
pub use events::*;
pub use lifecycle::{Cascade, LifecycleError, Transition, TransitionPlan};
pub use repositories::*;
pub use value_objects::*;
