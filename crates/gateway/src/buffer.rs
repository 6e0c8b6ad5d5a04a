use std::sync::Mutex;

use warren_channels::MessageRecordEntry;

/// Append-only buffer shared between the reply pipeline (high-frequency
/// producer) and the periodic flush job (low-frequency consumer).
///
/// One instance is constructed at bootstrap and passed by handle — never a
/// free-floating global.
#[derive(Default)]
pub struct MessageBuffer {
    entries: Mutex<Vec<MessageRecordEntry>>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: MessageRecordEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    /// Take the whole buffer, leaving it empty, in one locked step.
    ///
    /// Appends racing a flush land in either the snapshot or the fresh
    /// buffer — never both, never neither.
    pub fn drain(&self) -> Vec<MessageRecordEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *entries)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn entry(user_id: &str) -> MessageRecordEntry {
        MessageRecordEntry {
            account_id: "A1".into(),
            user_id: user_id.into(),
            channel_id: "C1".into(),
            message_type: "channel".into(),
            classify: "call".into(),
            create_time: 0,
        }
    }

    #[test]
    fn drain_empties_the_buffer() {
        let buffer = MessageBuffer::new();
        buffer.push(entry("u1"));
        buffer.push(entry("u2"));

        let snapshot = buffer.drain();
        assert_eq!(snapshot.len(), 2);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_never_lost_or_duplicated() {
        let buffer = Arc::new(MessageBuffer::new());
        let mut producers = Vec::new();
        for p in 0..8 {
            let buffer = Arc::clone(&buffer);
            producers.push(tokio::spawn(async move {
                for i in 0..100 {
                    buffer.push(entry(&format!("{p}-{i}")));
                }
            }));
        }

        // Drain repeatedly while producers are running.
        let drainer = {
            let buffer = Arc::clone(&buffer);
            tokio::spawn(async move {
                let mut collected = Vec::new();
                for _ in 0..50 {
                    collected.extend(buffer.drain());
                    tokio::task::yield_now().await;
                }
                collected
            })
        };

        for p in producers {
            p.await.unwrap();
        }
        let mut collected = drainer.await.unwrap();
        collected.extend(buffer.drain());

        assert_eq!(collected.len(), 800);
        let unique: std::collections::HashSet<_> =
            collected.iter().map(|e| e.user_id.clone()).collect();
        assert_eq!(unique.len(), 800);
    }
}
