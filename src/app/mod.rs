// roitab - app/mod.rs
//
// Application layer: file I/O, configuration loading, and batch
// orchestration around the core transform.

pub mod batch;
pub mod config;
pub mod convert;
