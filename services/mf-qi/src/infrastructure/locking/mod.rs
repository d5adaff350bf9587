//! 聚合锁

mod keyed_lock;

pub use keyed_lock::{KeyedLockManager, inspection_lock_key};
