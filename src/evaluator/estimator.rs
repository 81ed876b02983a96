// src/evaluator/estimator.rs — Traffic estimators

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};

use crate::api::{AdsApi, EstimateRequest, KeywordEstimate};
use crate::core::types::{AdditionalCriteria, Keyword, KeywordKey, Money, TrafficEstimate};
use crate::infra::errors::{KeywordOptimizerError, Result};

/// Produces traffic estimates for a batch of keywords.
///
/// A batch either succeeds as a whole or fails; there are no partial results.
#[async_trait]
pub trait TrafficEstimator: Send + Sync {
    fn name(&self) -> &str;

    async fn estimate(
        &self,
        keywords: &[Keyword],
        max_cpc: Money,
        criteria: &AdditionalCriteria,
    ) -> Result<HashMap<KeywordKey, TrafficEstimate>>;
}

/// Estimates through the remote traffic estimation service, splitting large batches
/// into chunks that are sent concurrently.
pub struct ApiTrafficEstimator {
    api: Arc<dyn AdsApi>,
    batch_size: usize,
    max_concurrent_batches: usize,
}

impl ApiTrafficEstimator {
    pub fn new(api: Arc<dyn AdsApi>, batch_size: usize, max_concurrent_batches: usize) -> Self {
        Self {
            api,
            batch_size: batch_size.max(1),
            max_concurrent_batches: max_concurrent_batches.max(1),
        }
    }
}

#[async_trait]
impl TrafficEstimator for ApiTrafficEstimator {
    fn name(&self) -> &str {
        "api-estimator"
    }

    async fn estimate(
        &self,
        keywords: &[Keyword],
        max_cpc: Money,
        criteria: &AdditionalCriteria,
    ) -> Result<HashMap<KeywordKey, TrafficEstimate>> {
        if keywords.is_empty() {
            return Ok(HashMap::new());
        }

        let requests: Vec<EstimateRequest> = keywords
            .chunks(self.batch_size)
            .map(|chunk| EstimateRequest {
                keywords: chunk.to_vec(),
                max_cpc,
                criteria: criteria.clone(),
            })
            .collect();

        tracing::debug!(
            keywords = keywords.len(),
            chunks = requests.len(),
            max_cpc = %max_cpc,
            "Requesting traffic estimates"
        );

        let responses: Vec<Vec<KeywordEstimate>> =
            futures::stream::iter(requests.into_iter().map(|request| {
                let api = Arc::clone(&self.api);
                async move { api.estimate_traffic(&request).await }
            }))
            .buffer_unordered(self.max_concurrent_batches)
            .try_collect()
            .await
            .map_err(|e| {
                KeywordOptimizerError::estimation(format!(
                    "Problem while estimating traffic for {} keywords",
                    keywords.len()
                ))
                .caused_by(e)
            })?;

        let estimates = responses
            .into_iter()
            .flatten()
            .map(|e| (e.keyword.key(), TrafficEstimate::from_min_max(e.min, e.max)))
            .collect();
        Ok(estimates)
    }
}
