//! 领域事件模块

mod inspection_events;

pub use inspection_events::InspectionEvent;
