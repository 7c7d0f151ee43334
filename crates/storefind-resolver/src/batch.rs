//! Sequential batch resolution.
//!
//! Stores are resolved one at a time with a configurable inter-request
//! delay — no bounded concurrency pool. The pacing keeps the maps provider
//! happy without a rate limiter; callers wanting more throughput can shard
//! batches themselves.

use std::time::Duration;

use storefind_core::GeocodeResult;

use crate::resolve::{ResolveRequest, StoreResolver};
use crate::ResolverError;

impl StoreResolver {
    /// Resolve every request in order.
    ///
    /// The returned vector is aligned with `requests`; a store that could
    /// not be resolved yields `None` and is simply omitted from whatever the
    /// caller builds out of the batch — one bad store never fails the run.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Maps`] when the provider quota is exhausted
    /// mid-batch; results for already-processed stores are discarded with it.
    pub async fn resolve_batch(
        &self,
        requests: &[ResolveRequest],
    ) -> Result<Vec<Option<GeocodeResult>>, ResolverError> {
        let mut results = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            if index > 0 && self.config.batch_inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(
                    self.config.batch_inter_request_delay_ms,
                ))
                .await;
            }

            let resolved = self.resolve(request).await?;
            if resolved.is_none() {
                tracing::info!(name = %request.name, "store omitted from batch results");
            }
            results.push(resolved);
        }

        Ok(results)
    }
}
