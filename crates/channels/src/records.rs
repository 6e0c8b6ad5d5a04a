use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Result, inbound::InboundMessage};

/// Fixed classification tag for records produced by the reply pipeline.
pub const CLASSIFY_CALL: &str = "call";

/// Message type recorded when the inbound payload carries none.
pub const DEFAULT_MESSAGE_TYPE: &str = "channel";

/// A lightweight fact about one handled inbound interaction.
///
/// Immutable once created; buffered in memory and persisted in batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecordEntry {
    pub account_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub message_type: String,
    pub classify: String,
    /// Seconds since epoch, captured at enqueue time.
    pub create_time: i64,
}

impl MessageRecordEntry {
    /// Build the record for one inbound message reaching a callback.
    pub fn for_call(message: &InboundMessage, create_time: i64) -> Self {
        Self {
            account_id: message.account_id.clone(),
            user_id: message.user_id.clone(),
            channel_id: message.channel_id.clone(),
            message_type: message
                .message_type
                .clone()
                .unwrap_or_else(|| DEFAULT_MESSAGE_TYPE.to_string()),
            classify: CLASSIFY_CALL.to_string(),
            create_time,
        }
    }
}

/// Persistent sink for message records.
#[async_trait]
pub trait MessageRecordStore: Send + Sync {
    async fn batch_insert(&self, records: &[MessageRecordEntry]) -> Result<()>;

    /// Delete records with `create_time` strictly before `timestamp`.
    /// Returns the number of rows removed.
    async fn delete_before(&self, timestamp: i64) -> Result<u64>;

    /// Recent records for one account, newest first. Operator forensics.
    async fn list_by_account(&self, account_id: &str, limit: u32)
    -> Result<Vec<MessageRecordEntry>>;
}

/// In-memory store backed by a `Vec`. No persistence — for tests only.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<MessageRecordEntry>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageRecordStore for MemoryRecordStore {
    async fn batch_insert(&self, records: &[MessageRecordEntry]) -> Result<()> {
        let mut all = self.records.lock().unwrap_or_else(|e| e.into_inner());
        all.extend_from_slice(records);
        Ok(())
    }

    async fn delete_before(&self, timestamp: i64) -> Result<u64> {
        let mut all = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let before = all.len();
        all.retain(|r| r.create_time >= timestamp);
        Ok((before - all.len()) as u64)
    }

    async fn list_by_account(
        &self,
        account_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageRecordEntry>> {
        let all = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<_> = all
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        matching.truncate(limit as usize);
        Ok(matching)
    }
}
