//! Training Events - Observer hooks for the training loop
//!
//! The trainer never logs directly. It reports to a `TrainingObserver`;
//! `LogObserver` forwards to the `log` facade, `NoopObserver` drops everything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::logic::model::{Topology, TrainingReport};

/// Receives training progress. All methods default to no-ops.
pub trait TrainingObserver {
    /// Training is about to start
    fn on_start(&mut self, _topology: &Topology, _rows: usize) {}

    /// An epoch finished with the given total network error
    fn on_epoch(&mut self, _epoch: usize, _error: f64) {}

    /// The network error became non-finite
    fn on_diverged(&mut self, _epoch: usize) {}

    /// Training finished without divergence
    fn on_finish(&mut self, _report: &TrainingReport) {}

    /// Checked between epochs; returning true stops training early
    fn should_stop(&self) -> bool {
        false
    }
}

/// Silent observer
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {}

/// Shared cancellation flag for a running training loop
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Forwards training events to `log`
#[derive(Debug, Clone)]
pub struct LogObserver {
    progress_interval: usize,
    cancel: Option<CancelToken>,
}

impl LogObserver {
    pub fn new(progress_interval: usize) -> Self {
        Self {
            progress_interval,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PROGRESS_INTERVAL)
    }
}

impl TrainingObserver for LogObserver {
    fn on_start(&mut self, topology: &Topology, rows: usize) {
        log::info!("Starting building classifier: network {} on {} samples", topology, rows);
    }

    fn on_epoch(&mut self, epoch: usize, error: f64) {
        if self.progress_interval > 0 && epoch % self.progress_interval == 0 {
            log::debug!("Epoch {}: total error {:.6}", epoch, error);
        }
    }

    fn on_diverged(&mut self, epoch: usize) {
        log::warn!("Network error became non-finite at epoch {}", epoch);
    }

    fn on_finish(&mut self, report: &TrainingReport) {
        log::info!("Total error: {}", report.final_error);
        log::info!("Number of epochs: {} ({:?})", report.epochs, report.stop_reason);
    }

    fn should_stop(&self) -> bool {
        self.cancel.as_ref().map(|c| c.is_cancelled()).unwrap_or(false)
    }
}
