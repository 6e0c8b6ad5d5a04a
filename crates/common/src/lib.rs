//! Shared types and error definitions used across all warren crates.

pub mod content;
pub mod error;

pub use {
    content::{Content, Segment},
    error::{Error, FromMessage, Result},
};
