//! Queries

mod inspection_queries;

pub use inspection_queries::*;
