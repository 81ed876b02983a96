// src/api/retry.rs — Retrying decorator for Ads API calls
//
// Transient failures (429, 5xx, timeouts, dropped connections) are retried
// on a capped exponential schedule. Everything else is returned at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{AdsApi, EstimateRequest, IdeaPage, IdeaSelector, KeywordEstimate};
use crate::infra::config::RetryConfigToml;
use crate::infra::errors::KeywordOptimizerError;

/// Extra wait on top of a server-provided Retry-After.
const RETRY_AFTER_PADDING: Duration = Duration::from_millis(100);

/// Capped exponential wait schedule with a fixed spread per attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub factor: f64,
    pub cap: Duration,
    /// Relative spread around the nominal wait, 0.2 means ±20%.
    pub spread: f64,
}

impl Backoff {
    /// Wait before retry number `retry` (0 for the first retry).
    pub fn wait(&self, retry: u32) -> Duration {
        let nominal = self.base.as_secs_f64() * self.factor.powi(retry as i32);
        let capped = nominal.min(self.cap.as_secs_f64());
        let spread = 1.0 + self.spread * spread_position(retry);
        Duration::try_from_secs_f64((capped * spread).max(0.001)).unwrap_or(self.cap)
    }
}

/// Position in [-1, 1] derived from the retry number, stable across runs.
fn spread_position(retry: u32) -> f64 {
    let mixed = retry.wrapping_mul(0x9E37_79B1);
    2.0 * (mixed as f64 / u32::MAX as f64) - 1.0
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig::from(&RetryConfigToml::default())
    }
}

impl From<&RetryConfigToml> for RetryConfig {
    fn from(cfg: &RetryConfigToml) -> Self {
        Self {
            attempts: cfg.max_retries,
            backoff: Backoff {
                base: Duration::from_millis(cfg.initial_delay_ms),
                factor: cfg.backoff_factor,
                cap: Duration::from_millis(cfg.max_delay_ms),
                spread: 0.2,
            },
        }
    }
}

/// Wraps another [`AdsApi`] and replays calls that failed transiently.
pub struct RetryApi {
    inner: Arc<dyn AdsApi>,
    config: RetryConfig,
}

impl RetryApi {
    pub fn new(inner: Arc<dyn AdsApi>) -> Self {
        Self::with_config(inner, RetryConfig::default())
    }

    pub fn with_config(inner: Arc<dyn AdsApi>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    fn pause_after(&self, error: &KeywordOptimizerError, retry: u32) -> Duration {
        match server_requested_wait(error) {
            Some(wait) => wait + RETRY_AFTER_PADDING,
            None => self.config.backoff.wait(retry),
        }
    }

    async fn call_with_retries<T, F, Fut>(
        &self,
        operation: &'static str,
        mut call: F,
    ) -> Result<T, KeywordOptimizerError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, KeywordOptimizerError>> + Send,
        T: Send,
    {
        let mut retry = 0;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retriable() || retry >= self.config.attempts => return Err(e),
                Err(e) => e,
            };

            let pause = self.pause_after(&error, retry);
            retry += 1;
            tracing::warn!(
                api = self.inner.name(),
                operation,
                retry,
                of = self.config.attempts,
                pause_ms = pause.as_millis() as u64,
                error = %error,
                "Ads API call failed, retrying"
            );
            tokio::time::sleep(pause).await;
        }
    }
}

/// Wait announced by a 429 response, if it carried one.
fn server_requested_wait(error: &KeywordOptimizerError) -> Option<Duration> {
    match error {
        KeywordOptimizerError::RateLimited { retry_after_ms } if *retry_after_ms > 0 => {
            Some(Duration::from_millis(*retry_after_ms))
        }
        _ => None,
    }
}

#[async_trait]
impl AdsApi for RetryApi {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn keyword_ideas(
        &self,
        selector: &IdeaSelector,
        offset: usize,
        page_size: usize,
    ) -> Result<IdeaPage, KeywordOptimizerError> {
        self.call_with_retries("keyword_ideas", || {
            self.inner.keyword_ideas(selector, offset, page_size)
        })
        .await
    }

    async fn estimate_traffic(
        &self,
        request: &EstimateRequest,
    ) -> Result<Vec<KeywordEstimate>, KeywordOptimizerError> {
        self.call_with_retries("estimate_traffic", || self.inner.estimate_traffic(request))
            .await
    }
}
