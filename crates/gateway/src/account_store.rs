use {
    async_trait::async_trait,
    sqlx::SqlitePool,
    warren_channels::{Account, AccountRegistry, Error, Result},
};

/// SQLite-backed account registry.
pub struct SqliteAccounts {
    pool: SqlitePool,
}

impl SqliteAccounts {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the bot_account table schema.
    pub async fn init(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bot_account (
                id              TEXT PRIMARY KEY,
                enabled         INTEGER NOT NULL DEFAULT 1,
                is_main         INTEGER NOT NULL DEFAULT 0,
                console_channel TEXT
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert or replace one account row. Used by provisioning tooling.
    pub async fn upsert(&self, account: &Account) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO bot_account (id, enabled, is_main, console_channel)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(account.enabled)
        .bind(account.is_main)
        .bind(&account.console_channel)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::external("upsert account", e))?;
        Ok(())
    }
}

#[async_trait]
impl AccountRegistry for SqliteAccounts {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, (String, bool, bool, Option<String>)>(
            "SELECT id, enabled, is_main, console_channel
             FROM bot_account
             WHERE enabled = 1
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::external("list accounts", e))?;

        Ok(rows
            .into_iter()
            .map(|r| Account {
                id: r.0,
                enabled: r.1,
                is_main: r.2,
                console_channel: r.3,
            })
            .collect())
    }
}
