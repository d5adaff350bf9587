//! Commands

mod defect_commands;
mod inspection_commands;

pub use defect_commands::*;
pub use inspection_commands::*;
