//! Adapter and account abstractions for the gateway host.
//!
//! Each messaging platform implements the adapter traits; the host core only
//! sees capability queries, outbound dispatch, and inbound payloads.

pub mod accounts;
pub mod adapter;
pub mod error;
pub mod inbound;
pub mod records;

pub use {
    accounts::{Account, AccountRegistry, MemoryAccounts},
    adapter::{AdapterContext, Outbound},
    error::{Error, Result},
    inbound::{Inbound, InboundEvent, InboundMessage},
    records::{MemoryRecordStore, MessageRecordEntry, MessageRecordStore},
};
