// ABOUTME: Rate-limited batch validator - concurrent lookups per batch, paced batches.
// ABOUTME: Lookup failures become "Error: ..." strings in place; nothing propagates.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::lookup::LineTypeLookup;
use super::rate_limiter::RateLimiter;
use crate::config::{DEFAULT_LOOKUP_TIMEOUT_SECS, ValidatorConfig};
use crate::error::ValidatorError;

/// Prefix marking a failed lookup in the output.
pub const ERROR_PREFIX: &str = "Error: ";

/// How batches are spaced out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Each batch takes at least this long; the remainder is slept off.
    FixedWindow(Duration),
    /// Each lookup first takes a token from a bucket holding `burst` tokens
    /// and refilling at `per_second`. Waiting for a token counts against the
    /// lookup timeout.
    TokenBucket { burst: u32, per_second: f64 },
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::FixedWindow(Duration::from_secs(1))
    }
}

/// Validates phone numbers in fixed-size batches.
///
/// The lookups of one batch run concurrently on the calling task. Output
/// has one entry per input, in input order.
pub struct BatchValidator<L> {
    lookup: L,
    batch_size: usize,
    lookup_timeout: Duration,
    pacing: Pacing,
    limiter: Option<RateLimiter>,
}

impl<L: LineTypeLookup> BatchValidator<L> {
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn new(lookup: L, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");

        Self {
            lookup,
            batch_size,
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            pacing: Pacing::default(),
            limiter: None,
        }
    }

    /// Batch size and lookup timeout taken from `config`.
    pub fn from_config(lookup: L, config: &ValidatorConfig) -> Self {
        Self::new(lookup, config.batch_size).lookup_timeout(config.timeout())
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// # Panics
    ///
    /// Panics if a token bucket has a zero `burst` or a non-positive `per_second`.
    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.limiter = match pacing {
            Pacing::TokenBucket { burst, per_second } => Some(RateLimiter::new(burst, per_second)),
            Pacing::FixedWindow(_) => None,
        };
        self.pacing = pacing;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn timeout(&self) -> Duration {
        self.lookup_timeout
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Number of batches needed for `phones` inputs.
    pub fn batch_count(&self, phones: usize) -> usize {
        phones.div_ceil(self.batch_size)
    }

    /// Look up every phone and return one line type or error marker per input.
    pub async fn validate<S>(&self, phones: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        let mut results = Vec::with_capacity(phones.len());
        let batches = self.batch_count(phones.len());

        for (index, batch) in phones.chunks(self.batch_size).enumerate() {
            let started = Instant::now();
            let outcomes = join_all(batch.iter().map(|phone| self.lookup_one(phone.as_ref()))).await;
            results.extend(outcomes);

            let elapsed = started.elapsed();
            debug!(batch = index + 1, of = batches, size = batch.len(), ?elapsed, "batch complete");

            if let Pacing::FixedWindow(period) = self.pacing {
                let remaining = period.saturating_sub(elapsed);
                if !remaining.is_zero() {
                    tokio::time::sleep(remaining).await;
                }
            }
        }

        let failures = results.iter().filter(|r| r.starts_with(ERROR_PREFIX)).count();
        info!(phones = phones.len(), batches, failures, "phone validation finished");
        results
    }

    async fn lookup_one(&self, phone: &str) -> String {
        let paced = async {
            if let Some(limiter) = &self.limiter {
                limiter.acquire().await;
            }
            self.lookup.line_type(phone).await
        };

        let outcome = match tokio::time::timeout(self.lookup_timeout, paced).await {
            Ok(result) => result,
            Err(_) => Err(ValidatorError::Timeout(self.lookup_timeout)),
        };

        match outcome {
            Ok(line_type) => line_type,
            Err(e) => {
                warn!(phone, error = %e, "phone lookup failed");
                format!("{}{}", ERROR_PREFIX, e)
            }
        }
    }
}
