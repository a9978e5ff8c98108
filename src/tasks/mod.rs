//! Background Tasks Module
//!
//! Long-running tasks spawned alongside the HTTP server.

mod gc;

pub use gc::spawn_gc_task;
