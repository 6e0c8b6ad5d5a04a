use {
    async_trait::async_trait,
    sqlx::SqlitePool,
    warren_channels::{Error, MessageRecordEntry, MessageRecordStore, Result},
};

/// SQLite-backed message record store.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the message_record table schema.
    pub async fn init(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS message_record (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id  TEXT    NOT NULL,
                user_id     TEXT    NOT NULL,
                channel_id  TEXT    NOT NULL,
                msg_type    TEXT    NOT NULL,
                classify    TEXT    NOT NULL,
                create_time INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_message_record_account_created
             ON message_record (account_id, create_time DESC)",
        )
        .execute(pool)
        .await?;

        // The purge job scans by create_time alone.
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_message_record_created
             ON message_record (create_time)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageRecordStore for SqliteRecordStore {
    async fn batch_insert(&self, records: &[MessageRecordEntry]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::external("begin record batch", e))?;

        for record in records {
            sqlx::query(
                "INSERT INTO message_record
                 (account_id, user_id, channel_id, msg_type, classify, create_time)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&record.account_id)
            .bind(&record.user_id)
            .bind(&record.channel_id)
            .bind(&record.message_type)
            .bind(&record.classify)
            .bind(record.create_time)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::external("insert record", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::external("commit record batch", e))
    }

    async fn delete_before(&self, timestamp: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM message_record WHERE create_time < ?")
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::external("delete records", e))?;
        Ok(result.rows_affected())
    }

    async fn list_by_account(
        &self,
        account_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageRecordEntry>> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String, i64)>(
            "SELECT account_id, user_id, channel_id, msg_type, classify, create_time
             FROM message_record
             WHERE account_id = ?
             ORDER BY create_time DESC
             LIMIT ?",
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::external("list records", e))?;

        Ok(rows
            .into_iter()
            .map(|r| MessageRecordEntry {
                account_id: r.0,
                user_id: r.1,
                channel_id: r.2,
                message_type: r.3,
                classify: r.4,
                create_time: r.5,
            })
            .collect())
    }
}
