//! Operator-facing diagnostics for failed reply callbacks.

use std::sync::Arc;

use {
    tracing::error,
    warren_channels::{AccountRegistry, AdapterContext, Inbound, Outbound},
    warren_common::Content,
    warren_media::{Uploader, rewrite_rich_content},
};

/// Renders a formatted trace into image bytes for platforms where a wall of
/// text is unreadable.
pub type TraceRenderer = Arc<dyn Fn(&str) -> Vec<u8> + Send + Sync>;

/// Builds a diagnostic report per intercepted failure and sends it to every
/// main account's console channel.
pub struct ConsoleReporter {
    accounts: Arc<dyn AccountRegistry>,
    outbound: Arc<dyn Outbound>,
    uploader: Arc<dyn Uploader>,
    trace_renderer: Option<TraceRenderer>,
}

impl ConsoleReporter {
    pub fn new(
        accounts: Arc<dyn AccountRegistry>,
        outbound: Arc<dyn Outbound>,
        uploader: Arc<dyn Uploader>,
    ) -> Self {
        Self {
            accounts,
            outbound,
            uploader,
            trace_renderer: None,
        }
    }

    /// Attach a trace-to-image renderer; rendered traces become image
    /// segments instead of text.
    #[must_use]
    pub fn with_trace_renderer(mut self, renderer: TraceRenderer) -> Self {
        self.trace_renderer = Some(renderer);
        self
    }

    /// Build and dispatch one report. This runs inside an error path
    /// already, so every failure here is logged and swallowed.
    pub async fn report(&self, err: &anyhow::Error, adapter: &dyn AdapterContext, inbound: &Inbound) {
        let content = self.build_report(err, adapter, inbound);

        // Rich-content platforms get binary payloads converted to hosted
        // references; everyone else sends the segments as-is. Decided by
        // capability query, not adapter type.
        let content = if adapter.supports_rich_content() {
            let segments = rewrite_rich_content(content.into_segments(), self.uploader.as_ref()).await;
            Content::from_segments(segments)
        } else {
            content
        };

        self.send_to_console(&content).await;
    }

    fn build_report(
        &self,
        err: &anyhow::Error,
        adapter: &dyn AdapterContext,
        inbound: &Inbound,
    ) -> Content {
        let header = [
            format!("Adapter: {}", adapter.describe()),
            format!("Bot: {}", inbound.account_id()),
            format!("Channel: {}", inbound.channel_id()),
            format!("User: {}", inbound.user_id()),
            String::new(),
            inbound.text().to_string(),
        ]
        .join("\n");

        let trace = format!("{err:?}");
        let content = Content::new().text(header);
        match &self.trace_renderer {
            Some(render) => content.image(render(&trace)),
            None => content.text(format!("\n\n{trace}")),
        }
    }

    /// Send once per main account with a configured console channel;
    /// accounts without one are skipped silently.
    async fn send_to_console(&self, content: &Content) {
        let accounts = match self.accounts.list_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!(error = %e, "cannot list accounts for console report");
                return;
            },
        };

        for account in accounts.iter().filter(|a| a.is_main) {
            let Some(channel) = &account.console_channel else {
                continue;
            };
            if let Err(e) = self.outbound.send(&account.id, channel, content).await {
                error!(account = %account.id, error = %e, "console report dispatch failed");
            }
        }
    }
}
