// src/evaluator/mod.rs — Evaluators (attach estimates and scores to a collection)

pub mod cache;
pub mod estimator;
pub mod score;

use async_trait::async_trait;

use crate::core::collection::KeywordCollection;
use crate::infra::errors::{KeywordOptimizerError, Result};

pub use cache::CachedEstimator;
pub use estimator::{ApiTrafficEstimator, TrafficEstimator};
pub use score::{
    ClicksScoreCalculator, ImpressionsScoreCalculator, ScoreCalculator, WeightedScoreCalculator,
};

/// Produces an evaluated copy of a collection.
///
/// The result has exactly the input's keys in the input's order, each carrying an
/// estimate and a score. The input is left untouched.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, keywords: &KeywordCollection) -> Result<KeywordCollection>;
}

/// Estimates the whole collection in one batch, then scores each keyword.
pub struct EstimatorBasedEvaluator {
    estimator: Box<dyn TrafficEstimator>,
    score_calculator: Box<dyn ScoreCalculator>,
}

impl EstimatorBasedEvaluator {
    pub fn new(
        estimator: Box<dyn TrafficEstimator>,
        score_calculator: Box<dyn ScoreCalculator>,
    ) -> Self {
        Self {
            estimator,
            score_calculator,
        }
    }
}

#[async_trait]
impl Evaluator for EstimatorBasedEvaluator {
    async fn evaluate(&self, keywords: &KeywordCollection) -> Result<KeywordCollection> {
        let mut evaluated = KeywordCollection::empty_like(keywords);
        if keywords.is_empty() {
            return Ok(evaluated);
        }

        let estimates = self
            .estimator
            .estimate(&keywords.keywords(), keywords.max_cpc(), keywords.criteria())
            .await?;

        for info in keywords {
            let estimate = estimates.get(&info.key()).ok_or_else(|| {
                KeywordOptimizerError::estimation(format!(
                    "No traffic estimate returned for {}",
                    info.keyword
                ))
            })?;
            let score = self.score_calculator.score(estimate);
            evaluated.add(info.with_evaluation(estimate.clone(), score));
        }

        tracing::debug!(
            estimator = self.estimator.name(),
            score = self.score_calculator.name(),
            count = evaluated.len(),
            best = ?evaluated.best_score(),
            "Collection evaluated"
        );
        Ok(evaluated)
    }
}
