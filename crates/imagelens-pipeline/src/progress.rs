//! Batch progress reporting

use tracing::info;

/// Receives coarse progress while a batch runs.
pub trait BatchProgress: Send + Sync {
    /// Called after each item, in input order
    fn on_item(&self, completed: usize, total: usize, success: bool);

    /// Called once when the batch is done
    fn on_finish(&self, _successful: usize, _failed: usize) {}
}

/// Ignores progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl BatchProgress for NoopProgress {
    fn on_item(&self, _completed: usize, _total: usize, _success: bool) {}
}

/// Logs progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl BatchProgress for TracingProgress {
    fn on_item(&self, completed: usize, total: usize, success: bool) {
        info!(
            "Processed image {}/{} ({})",
            completed,
            total,
            if success { "ok" } else { "failed" }
        );
    }

    fn on_finish(&self, successful: usize, failed: usize) {
        info!("Batch complete: {} successful, {} failed", successful, failed);
    }
}
