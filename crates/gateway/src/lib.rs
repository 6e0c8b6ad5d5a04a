//! The gateway host runtime.
//!
//! Owns the startup sequence (plugin install, lazy load, first heartbeat),
//! the in-memory message buffer shared between the reply pipeline and the
//! flush job, the operator console reporter, and the recurring maintenance
//! jobs. Transport adapters, storage, and the resource service stay behind
//! the traits in `warren-channels` and `warren-media`.

pub mod account_store;
pub mod buffer;
pub mod heartbeat;
pub mod host;
pub mod maintenance;
pub mod outbound;
pub mod pipeline;
pub mod record_store;
pub mod reporter;

pub use {
    buffer::MessageBuffer,
    host::Host,
    pipeline::{ReplyFailure, ReplyPipeline},
    reporter::ConsoleReporter,
};
