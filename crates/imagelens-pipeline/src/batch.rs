//! Batch orchestration
//!
//! Items run through an order-preserving bounded stream, so `results[i]`
//! always belongs to `sources[i]` whatever the concurrency.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::envelope::{BatchEnvelope, ProcessingEnvelope};
use crate::orchestrator::AnalysisOrchestrator;
use crate::progress::BatchProgress;
use crate::request::BatchRequest;

impl AnalysisOrchestrator {
    /// Analyze every source in `request`.
    ///
    /// The provider and credential are resolved once. If that fails the
    /// batch stops before any per-item work and every item carries the same
    /// configuration error. Otherwise one item's failure never affects the
    /// others.
    pub async fn process_batch(
        &self,
        request: &BatchRequest,
        progress: &dyn BatchProgress,
    ) -> BatchEnvelope {
        let started = Instant::now();
        let total = request.sources.len();
        let kind = request.provider.unwrap_or(self.settings().default_provider);

        let provider = match self.resolve_provider(kind, request.api_key.as_deref()) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("Batch of {} images aborted: {}", total, e);
                let message = e.to_string();
                let results = request
                    .sources
                    .iter()
                    .map(|_| ProcessingEnvelope::failure(kind.as_str(), message.as_str()))
                    .collect();
                let envelope = BatchEnvelope::from_results(results, started.elapsed());
                progress.on_finish(envelope.successful, envelope.failed);
                return envelope;
            }
        };

        let concurrency = self.settings().batch_workers();
        info!(
            "Processing batch of {} images with {} (concurrency {})",
            total, kind, concurrency
        );

        let mut items = stream::iter(request.sources.iter())
            .map(|source| self.process_with(provider.as_ref(), source, &request.analysis))
            .buffered(concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(envelope) = items.next().await {
            let success = envelope.success;
            if !success {
                warn!(
                    "Batch item {}/{} failed: {}",
                    results.len() + 1,
                    total,
                    envelope.error.as_deref().unwrap_or_default()
                );
            }
            results.push(envelope);
            progress.on_item(results.len(), total, success);
        }

        let envelope = BatchEnvelope::from_results(results, started.elapsed());
        info!(
            "Batch finished: {}/{} successful in {:.2}s",
            envelope.successful, envelope.total_images, envelope.processing_time
        );
        progress.on_finish(envelope.successful, envelope.failed);
        envelope
    }
}
