//! Reply-pipeline hooks: per-message record capture and error interception.
//!
//! Handlers are collected through explicit registration calls into a typed
//! table — composition stays visible and testable, with no import-time side
//! effects.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use {
    tracing::error,
    warren_channels::{AdapterContext, Inbound, InboundMessage, MessageRecordEntry},
};

use crate::buffer::MessageBuffer;

/// Context handed to every registered error handler.
#[derive(Clone)]
pub struct ReplyFailure {
    pub error: Arc<anyhow::Error>,
    pub adapter: Arc<dyn AdapterContext>,
    pub inbound: Inbound,
}

type ErrorHandlerFn = Arc<
    dyn Fn(ReplyFailure) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync,
>;

/// Hooks the host wires into the bot's reply path.
pub struct ReplyPipeline {
    buffer: Arc<MessageBuffer>,
    on_error: Vec<ErrorHandlerFn>,
}

impl ReplyPipeline {
    pub fn new(buffer: Arc<MessageBuffer>) -> Self {
        Self {
            buffer,
            on_error: Vec::new(),
        }
    }

    /// Register an error handler. Handlers run in registration order on
    /// every intercepted failure.
    pub fn on_error<F, Fut>(&mut self, handler: F)
    where
        F: Fn(ReplyFailure) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_error
            .push(Arc::new(move |failure| Box::pin(handler(failure))));
    }

    pub fn handler_count(&self) -> usize {
        self.on_error.len()
    }

    /// Record one inbound message reaching a reply callback.
    pub fn observe(&self, message: &InboundMessage) {
        let create_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.buffer
            .push(MessageRecordEntry::for_call(message, create_time));
    }

    /// Run every registered handler for an intercepted failure.
    ///
    /// This is already an error path: handler failures are logged and
    /// swallowed, never re-raised.
    pub async fn dispatch_error(
        &self,
        err: anyhow::Error,
        adapter: Arc<dyn AdapterContext>,
        inbound: Inbound,
    ) {
        let err = Arc::new(err);
        for handler in &self.on_error {
            let failure = ReplyFailure {
                error: Arc::clone(&err),
                adapter: Arc::clone(&adapter),
                inbound: inbound.clone(),
            };
            if let Err(e) = handler(failure).await {
                error!(error = %e, "reply error handler failed");
            }
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct TestAdapter;

    impl AdapterContext for TestAdapter {
        fn kind(&self) -> &str {
            "test"
        }

        fn account_id(&self) -> &str {
            "A1"
        }
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            account_id: "A1".into(),
            user_id: "U1".into(),
            channel_id: "C1".into(),
            message_type: None,
            text: text.into(),
        }
    }

    #[test]
    fn observe_pushes_one_record_per_message() {
        let buffer = Arc::new(MessageBuffer::new());
        let pipeline = ReplyPipeline::new(Arc::clone(&buffer));

        pipeline.observe(&message("hi"));
        pipeline.observe(&message("there"));

        let records = buffer.drain();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].classify, "call");
        assert_eq!(records[0].message_type, "channel");
        assert!(records[0].create_time > 0);
    }

    #[tokio::test]
    async fn dispatch_runs_all_handlers_despite_failures() {
        let buffer = Arc::new(MessageBuffer::new());
        let mut pipeline = ReplyPipeline::new(buffer);
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        pipeline.on_error(move |_failure| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("handler broke")
            }
        });
        let c = Arc::clone(&calls);
        pipeline.on_error(move |failure| {
            let c = Arc::clone(&c);
            async move {
                assert_eq!(failure.inbound.user_id(), "U1");
                assert!(failure.error.to_string().contains("original"));
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        pipeline
            .dispatch_error(
                anyhow::anyhow!("original failure"),
                Arc::new(TestAdapter),
                Inbound::from(message("hello")),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dispatch_with_no_handlers_is_a_no_op() {
        let pipeline = ReplyPipeline::new(Arc::new(MessageBuffer::new()));
        pipeline
            .dispatch_error(
                anyhow::anyhow!("nobody listening"),
                Arc::new(TestAdapter),
                Inbound::from(message("x")),
            )
            .await;
        assert_eq!(pipeline.handler_count(), 0);
    }
}
