//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: drops expired physical entries from the memory store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
