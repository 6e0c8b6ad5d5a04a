use {async_trait::async_trait, warren_common::Content};

use crate::Result;

/// Read-only view of the adapter instance a callback ran under.
///
/// The host decides behavior through these capability queries — it never
/// inspects the adapter's concrete type.
pub trait AdapterContext: Send + Sync {
    /// Platform identifier (e.g. "qq-guild", "onebot").
    fn kind(&self) -> &str;

    /// Account this adapter instance is bound to.
    fn account_id(&self) -> &str;

    /// Human-readable description used in diagnostic reports.
    fn describe(&self) -> String {
        format!("{}[{}]", self.kind(), self.account_id())
    }

    /// Whether the platform accepts hosted media references in outbound
    /// content. Adapters returning `true` get binary payloads rewritten to
    /// reference URLs before transmission.
    fn supports_rich_content(&self) -> bool {
        false
    }
}

/// Send content to a channel through the transport layer.
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, account_id: &str, channel_id: &str, content: &Content) -> Result<()>;
}
