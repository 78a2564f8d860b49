//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache.
//!
//! # Tasks
//! - Sweeper: Periodically runs maintenance so expired entries are reclaimed
//!   without any foreground access

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle, SWEEP_BUFFER};
