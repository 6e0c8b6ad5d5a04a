//! Fixed-interval recurring tasks with per-cycle failure isolation.
//!
//! Tasks are registered up front and run for the process lifetime; there is
//! no per-task cancellation, only whole-supervisor shutdown.

pub mod error;
pub mod service;

pub use {
    error::{Error, Result},
    service::{Scheduler, Supervisor, TaskFn},
};
