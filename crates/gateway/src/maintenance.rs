//! Periodic record maintenance: batch flush and retention purge.

use {
    chrono::{DateTime, Local, NaiveTime, TimeZone},
    tracing::{debug, info, warn},
    warren_channels::MessageRecordStore,
};

use crate::buffer::MessageBuffer;

/// Swap the live buffer for an empty one and persist the snapshot.
///
/// A persistence failure drops the snapshot — an accepted-loss policy, since
/// records are low-value telemetry. The failure is logged, never retried.
pub async fn flush_records(
    buffer: &MessageBuffer,
    store: &dyn MessageRecordStore,
) -> anyhow::Result<()> {
    let snapshot = buffer.drain();
    if snapshot.is_empty() {
        return Ok(());
    }
    match store.batch_insert(&snapshot).await {
        Ok(()) => debug!(count = snapshot.len(), "flushed message records"),
        Err(e) => {
            warn!(count = snapshot.len(), error = %e, "record flush failed, batch dropped");
        },
    }
    Ok(())
}

/// Delete records older than local midnight `retention_days` days ago.
pub async fn purge_records(
    store: &dyn MessageRecordStore,
    retention_days: i64,
) -> anyhow::Result<()> {
    let boundary = retention_boundary(Local::now(), retention_days);
    let removed = store.delete_before(boundary).await?;
    if removed > 0 {
        info!(removed, boundary, "purged expired message records");
    }
    Ok(())
}

/// Epoch seconds of local midnight `days` days before `now`. The boundary is
/// exclusive: a record created exactly at it is kept.
pub fn retention_boundary(now: DateTime<Local>, days: i64) -> i64 {
    let day = now.date_naive() - chrono::Duration::days(days);
    let midnight = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use warren_channels::{MemoryRecordStore, MessageRecordEntry};

    use super::*;

    fn entry(create_time: i64) -> MessageRecordEntry {
        MessageRecordEntry {
            account_id: "A1".into(),
            user_id: "U1".into(),
            channel_id: "C1".into(),
            message_type: "channel".into(),
            classify: "call".into(),
            create_time,
        }
    }

    #[tokio::test]
    async fn flush_persists_snapshot_and_resets_buffer() {
        let buffer = MessageBuffer::new();
        let store = MemoryRecordStore::new();
        for t in 0..5 {
            buffer.push(entry(t));
        }

        flush_records(&buffer, &store).await.unwrap();
        assert_eq!(store.len(), 5);
        assert!(buffer.is_empty());

        // An immediate second flush with no new appends persists nothing.
        flush_records(&buffer, &store).await.unwrap();
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn flush_failure_drops_the_batch() {
        struct FailingStore;

        #[async_trait::async_trait]
        impl MessageRecordStore for FailingStore {
            async fn batch_insert(
                &self,
                _records: &[MessageRecordEntry],
            ) -> warren_channels::Result<()> {
                Err(warren_channels::Error::unavailable("storage offline"))
            }

            async fn delete_before(&self, _timestamp: i64) -> warren_channels::Result<u64> {
                Ok(0)
            }

            async fn list_by_account(
                &self,
                _account_id: &str,
                _limit: u32,
            ) -> warren_channels::Result<Vec<MessageRecordEntry>> {
                Ok(Vec::new())
            }
        }

        let buffer = MessageBuffer::new();
        buffer.push(entry(1));

        // The flush itself succeeds (the loss is deliberate) and the buffer
        // stays drained — no requeue.
        flush_records(&buffer, &FailingStore).await.unwrap();
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn purge_respects_strict_boundary() {
        let store = MemoryRecordStore::new();
        let boundary = retention_boundary(Local::now(), 7);
        store
            .batch_insert(&[entry(boundary - 1), entry(boundary), entry(boundary + 1)])
            .await
            .unwrap();

        purge_records(&store, 7).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn boundary_is_midnight_seven_days_back() {
        let now = Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let expected = Local.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert_eq!(retention_boundary(now, 7), expected.timestamp());
    }

    #[test]
    fn boundary_ignores_time_of_day() {
        let morning = Local.with_ymd_and_hms(2024, 3, 20, 1, 5, 0).unwrap();
        let evening = Local.with_ymd_and_hms(2024, 3, 20, 23, 55, 0).unwrap();
        assert_eq!(retention_boundary(morning, 7), retention_boundary(evening, 7));
    }
}
