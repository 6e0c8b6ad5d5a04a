use async_trait::async_trait;

use crate::Result;

/// One configured bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Disabled accounts are skipped by liveness reporting.
    pub enabled: bool,
    /// Main accounts receive operator diagnostics.
    pub is_main: bool,
    /// Channel the operator console lives in, if configured.
    pub console_channel: Option<String>,
}

/// Source of configured accounts — the gateway provides the concrete
/// implementation.
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// All enabled accounts.
    async fn list_accounts(&self) -> Result<Vec<Account>>;
}

/// Fixed account list backed by a `Vec`. No persistence — for tests only.
pub struct MemoryAccounts {
    accounts: Vec<Account>,
}

impl MemoryAccounts {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountRegistry for MemoryAccounts {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.enabled)
            .cloned()
            .collect())
    }
}
