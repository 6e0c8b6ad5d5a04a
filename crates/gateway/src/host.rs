//! Host bootstrap: the startup sequence and recurring-job wiring.
//!
//! Order matters: plugin install and lazy load run to completion before any
//! recurring job starts, and the first liveness round fires at boot rather
//! than one interval later.

use std::{sync::Arc, time::Duration};

use {
    tracing::{info, warn},
    warren_channels::{AccountRegistry, MessageRecordStore, Outbound},
    warren_config::WarrenConfig,
    warren_media::Uploader,
    warren_plugins::{PluginRegistry, install_all},
    warren_tasks::{Scheduler, Supervisor},
};

use crate::{
    buffer::MessageBuffer,
    heartbeat::{Pinger, heartbeat_round},
    maintenance::{flush_records, purge_records},
    pipeline::ReplyPipeline,
    reporter::{ConsoleReporter, TraceRenderer},
};

/// External collaborators the host is wired to at construction time.
pub struct HostServices {
    pub accounts: Arc<dyn AccountRegistry>,
    pub records: Arc<dyn MessageRecordStore>,
    pub outbound: Arc<dyn Outbound>,
    pub pinger: Arc<dyn Pinger>,
    pub uploader: Arc<dyn Uploader>,
    pub trace_renderer: Option<TraceRenderer>,
}

/// The assembled runtime, produced by [`Host::bootstrap`].
pub struct Host {
    config: WarrenConfig,
    services: HostServices,
    plugins: PluginRegistry,
    buffer: Arc<MessageBuffer>,
    pipeline: Arc<ReplyPipeline>,
}

impl Host {
    /// Run the startup sequence: install plugins, run deferred init, wire
    /// the reply pipeline, fire one liveness round. Recurring jobs are not
    /// started yet — see [`Host::start_jobs`].
    pub async fn bootstrap(config: WarrenConfig, services: HostServices) -> anyhow::Result<Self> {
        let mut plugins = PluginRegistry::new();
        let installed = install_all(&config.plugins_dir, &mut plugins).await?;
        if installed > 0 {
            info!(count = installed, "successfully installed plugin(s)");
        }
        plugins.run_deferred_init().await?;

        let buffer = Arc::new(MessageBuffer::new());

        let mut reporter = ConsoleReporter::new(
            Arc::clone(&services.accounts),
            Arc::clone(&services.outbound),
            Arc::clone(&services.uploader),
        );
        if let Some(renderer) = services.trace_renderer.clone() {
            reporter = reporter.with_trace_renderer(renderer);
        }
        let reporter = Arc::new(reporter);

        let mut pipeline = ReplyPipeline::new(Arc::clone(&buffer));
        {
            let reporter = Arc::clone(&reporter);
            pipeline.on_error(move |failure| {
                let reporter = Arc::clone(&reporter);
                async move {
                    reporter
                        .report(&failure.error, failure.adapter.as_ref(), &failure.inbound)
                        .await;
                    Ok(())
                }
            });
        }

        // Monitoring should see the boot before the first scheduled
        // interval elapses.
        if let Err(e) = heartbeat_round(services.accounts.as_ref(), services.pinger.as_ref()).await
        {
            warn!(error = %e, "initial heartbeat round failed");
        }

        Ok(Self {
            config,
            services,
            plugins,
            buffer,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Register the built-in recurring jobs and start the scheduler.
    pub fn start_jobs(&self) -> warren_tasks::Result<Supervisor> {
        let mut scheduler = Scheduler::new();

        let accounts = Arc::clone(&self.services.accounts);
        let pinger = Arc::clone(&self.services.pinger);
        scheduler.register(
            "heartbeat",
            Duration::from_secs(self.config.heartbeat.interval_secs),
            move || {
                let accounts = Arc::clone(&accounts);
                let pinger = Arc::clone(&pinger);
                async move { heartbeat_round(accounts.as_ref(), pinger.as_ref()).await }
            },
        )?;

        let buffer = Arc::clone(&self.buffer);
        let records = Arc::clone(&self.services.records);
        scheduler.register(
            "record-flush",
            Duration::from_secs(self.config.records.flush_interval_secs),
            move || {
                let buffer = Arc::clone(&buffer);
                let records = Arc::clone(&records);
                async move { flush_records(buffer.as_ref(), records.as_ref()).await }
            },
        )?;

        let records = Arc::clone(&self.services.records);
        let retention_days = self.config.records.retention_days;
        scheduler.register(
            "record-purge",
            Duration::from_secs(self.config.records.purge_interval_secs),
            move || {
                let records = Arc::clone(&records);
                async move { purge_records(records.as_ref(), retention_days).await }
            },
        )?;

        Ok(scheduler.start())
    }

    /// Hooks the transport layer wires into its reply path.
    pub fn pipeline(&self) -> Arc<ReplyPipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn buffer(&self) -> Arc<MessageBuffer> {
        Arc::clone(&self.buffer)
    }
}
