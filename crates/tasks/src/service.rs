//! The scheduler: one independent timer loop per registered task.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use {
    tokio::{task::JoinHandle, time::MissedTickBehavior},
    tracing::{error, info},
};

use crate::{Error, Result};

/// Callback for one task's work. Effectful, no return value beyond failure.
pub type TaskFn =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync>;

struct RecurringTask {
    name: String,
    interval: Duration,
    work: TaskFn,
}

/// Collects recurring tasks before start; consumed by [`Scheduler::start`].
///
/// Intervals are fixed at registration and tasks run until process shutdown.
/// Overlap policy: a cycle is spawned on every tick whether or not the
/// previous cycle finished, so slow work piles up rather than skewing the
/// schedule.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<RecurringTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recurring task. `interval` must be at least one second.
    pub fn register<F, Fut>(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        work: F,
    ) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = name.into();
        if interval < Duration::from_secs(1) {
            return Err(Error::interval_too_short(name));
        }
        self.tasks.push(RecurringTask {
            name,
            interval,
            work: Arc::new(move || Box::pin(work())),
        });
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn one independent loop per registered task and hand their
    /// [`JoinHandle`]s to a supervisor.
    pub fn start(self) -> Supervisor {
        let mut handles = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            info!(
                task = %task.name,
                interval_secs = task.interval.as_secs(),
                "starting recurring task"
            );
            handles.push(tokio::spawn(run_task(task)));
        }
        Supervisor { handles }
    }
}

async fn run_task(task: RecurringTask) {
    let mut ticker = tokio::time::interval(task.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the first cycle
    // runs one full interval after start.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let name = task.name.clone();
        let work = Arc::clone(&task.work);
        // Each cycle gets its own tokio task: a slow, failing, or panicking
        // cycle cannot delay this task's schedule or any sibling task.
        tokio::spawn(async move {
            if let Err(e) = work().await {
                error!(task = %name, error = %e, "task cycle failed");
            }
        });
    }
}

/// Owns the running task loops. The only way to stop them is process
/// shutdown or [`Supervisor::shutdown`], which abandons in-flight cycles
/// best-effort.
pub struct Supervisor {
    handles: Vec<JoinHandle<()>>,
}

impl Supervisor {
    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// Abort every task loop.
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        info!(count = self.handles.len(), "scheduler stopped");
    }
}
