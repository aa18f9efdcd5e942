//! src/controller/event_loop.rs
//! ============================================================================
//! # Event Loop: background task results
//!
//! Spawned tasks never touch state. They report through an unbounded
//! channel of [`TaskResult`]s which the main loop drains one at a time, so
//! the engine always has exactly one writer.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{error::AppError, model::catalog_item::CatalogItem, util::debounce::Settled};

/// Completion message from a background task.
#[derive(Debug)]
pub enum TaskResult {
    /// The startup fetch settled.
    CatalogLoaded(Result<Vec<CatalogItem>, AppError>),

    /// The search debounce delay elapsed without further input.
    SearchSettled(Settled<String>),
}

impl From<Settled<String>> for TaskResult {
    fn from(settled: Settled<String>) -> Self {
        Self::SearchSettled(settled)
    }
}

/// Point-in-time processing metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnap {
    pub tasks: u64,
    pub actions: u64,
    pub avg: Duration,
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    tasks: u64,
    actions: u64,
    busy: Duration,
    started: Instant,
}

impl EventLoop {
    pub fn new(task_rx: mpsc::UnboundedReceiver<TaskResult>) -> Self {
        info!("Initializing event loop");
        Self {
            task_rx,
            tasks: 0,
            actions: 0,
            busy: Duration::ZERO,
            started: Instant::now(),
        }
    }

    /// Waits for the next task result. Pending forever once every sender is
    /// gone, so it can sit in a `select!` without spinning.
    pub async fn next_task(&mut self) -> TaskResult {
        match self.task_rx.recv().await {
            Some(result) => {
                self.tasks += 1;
                debug!("Task result #{} received", self.tasks);
                result
            }
            None => std::future::pending().await,
        }
    }

    /// Records time spent handling one task result or action.
    pub fn record(&mut self, elapsed: Duration, is_action: bool) {
        if is_action {
            self.actions += 1;
        }
        self.busy += elapsed;
    }

    #[must_use]
    pub fn snapshot_metrics(&self) -> MetricsSnap {
        let handled = self.tasks + self.actions;
        let avg = if handled == 0 {
            Duration::ZERO
        } else {
            self.busy / u32::try_from(handled).unwrap_or(u32::MAX)
        };

        MetricsSnap {
            tasks: self.tasks,
            actions: self.actions,
            avg,
        }
    }

    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_task_counts_results() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut event_loop = EventLoop::new(rx);

        tx.send(TaskResult::from(Settled {
            generation: 1,
            value: "zoo".to_string(),
        }))
        .unwrap();

        match event_loop.next_task().await {
            TaskResult::SearchSettled(s) => assert_eq!(s.value, "zoo"),
            other => panic!("unexpected {other:?}"),
        }

        event_loop.record(Duration::from_millis(4), false);
        event_loop.record(Duration::from_millis(2), true);
        let snap = event_loop.snapshot_metrics();
        assert_eq!(snap.tasks, 1);
        assert_eq!(snap.actions, 1);
        assert_eq!(snap.avg, Duration::from_millis(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_never_resolves() {
        let (tx, rx) = mpsc::unbounded_channel::<TaskResult>();
        drop(tx);
        let mut event_loop = EventLoop::new(rx);

        let waited =
            tokio::time::timeout(Duration::from_secs(5), event_loop.next_task()).await;
        assert!(waited.is_err());
    }
}
