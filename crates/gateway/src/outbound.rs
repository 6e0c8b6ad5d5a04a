//! Fallback outbound used when no platform adapter is linked in.

use {
    async_trait::async_trait,
    tracing::info,
    warren_channels::{Outbound, Result},
    warren_common::{Content, Segment},
};

/// Writes outbound dispatches to the log instead of a transport.
///
/// Useful for headless deployments and local runs where the platform
/// adapters are not configured yet.
#[derive(Default)]
pub struct LoggingOutbound;

#[async_trait]
impl Outbound for LoggingOutbound {
    async fn send(&self, account_id: &str, channel_id: &str, content: &Content) -> Result<()> {
        let images = content
            .segments()
            .iter()
            .filter(|s| matches!(s, Segment::Image(_) | Segment::ImageUrl(_)))
            .count();
        info!(
            account = account_id,
            channel = channel_id,
            images,
            text = %content.plain_text(),
            "outbound message (no adapter configured)"
        );
        Ok(())
    }
}
