//! Background Tasks Module
//!
//! - Cache sweep: reclaims expired memory-backend entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
