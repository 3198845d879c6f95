//! Scheduler
//!
//! Single sequential loop around the pipeline: one pass per timer tick, at
//! most one pass ever in flight, shutdown observed between passes. This is
//! the only component that talks to the alerting collaborator, and the only
//! place the sticky cursor survives between passes.

use crate::application::BackupPipeline;
use crate::domain::ports::Alerter;
use crate::infrastructure::ShutdownController;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub struct Scheduler {
    pipeline: BackupPipeline,
    interval: Duration,
    /// `None` when alerting is disabled by configuration.
    alerter: Option<Arc<dyn Alerter>>,
    parse_mode: Option<String>,
    shutdown: ShutdownController,
    /// Sticky cursor threaded into each pass; updated only on success.
    next_start: usize,
}

impl Scheduler {
    pub fn new(
        pipeline: BackupPipeline,
        interval: Duration,
        alerter: Option<Arc<dyn Alerter>>,
        parse_mode: Option<String>,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            pipeline,
            interval,
            alerter,
            parse_mode,
            shutdown,
            next_start: 0,
        }
    }

    /// Run until shutdown.
    ///
    /// Ticks that fire while a pass is running are skipped, never queued:
    /// a pass that overruns the interval is followed by an idle wait for the
    /// next tick, not by back-to-back catch-up passes.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval fires immediately; swallow it
        // so the first backup happens one full interval after startup.
        ticker.tick().await;

        let mut shutdown_rx = self.shutdown.subscribe();
        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_pass().await,
                _ = shutdown_rx.recv() => {
                    tracing::info!("scheduler stopped");
                    return;
                }
            }
        }
    }

    async fn run_pass(&mut self) {
        match self.pipeline.run_once(self.next_start).await {
            Ok(report) => {
                self.next_start = report.next_start;
                tracing::info!(
                    "backup pass succeeded: node={} archive={} pruned_local={} pruned_remote={}",
                    report.node,
                    report.archive_name,
                    report.pruned_local,
                    report.pruned_remote
                );
                self.notify(&format!("Backup succeeded: {}", report.archive_name))
                    .await;
            }
            Err(e) => {
                tracing::error!("backup pass failed: {e}");
                self.notify(&format!("ERROR {e}")).await;
            }
        }
    }

    /// Best-effort alert delivery; a failed delivery is logged and the loop
    /// moves on.
    async fn notify(&self, message: &str) {
        let Some(alerter) = &self.alerter else { return };
        tracing::info!("sending alert");
        if let Err(e) = alerter.notify(message, self.parse_mode.as_deref()).await {
            tracing::error!("alert delivery failed: {e}");
        }
    }
}
