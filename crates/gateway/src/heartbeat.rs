//! Liveness reporting: one ping per active account against the monitoring
//! endpoint.

use {async_trait::async_trait, tracing::warn, warren_channels::AccountRegistry};

/// Liveness endpoint client. Fire-and-forget semantics are acceptable.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, account_id: &str) -> anyhow::Result<()>;
}

/// GETs `{url}?appid=<account>`.
pub struct HttpPinger {
    url: String,
    client: reqwest::Client,
}

impl HttpPinger {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Pinger for HttpPinger {
    async fn ping(&self, account_id: &str) -> anyhow::Result<()> {
        self.client
            .get(&self.url)
            .query(&[("appid", account_id)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// One liveness round. A failed ping is logged per account and never blocks
/// the remaining accounts.
pub async fn heartbeat_round(
    accounts: &dyn AccountRegistry,
    pinger: &dyn Pinger,
) -> anyhow::Result<()> {
    for account in accounts.list_accounts().await? {
        if let Err(e) = pinger.ping(&account.id).await {
            warn!(account = %account.id, error = %e, "heartbeat ping failed");
        }
    }
    Ok(())
}
