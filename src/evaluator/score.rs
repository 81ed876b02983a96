// src/evaluator/score.rs — Score calculators

use crate::core::types::TrafficEstimate;
use crate::infra::config::ScoreConfig;

/// Turns a traffic estimate into a single comparable number. Higher is better.
///
/// Must be a pure function of the estimate.
pub trait ScoreCalculator: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, estimate: &TrafficEstimate) -> f64;
}

/// Mean clicks per day.
#[derive(Debug, Default)]
pub struct ClicksScoreCalculator;

impl ScoreCalculator for ClicksScoreCalculator {
    fn name(&self) -> &str {
        "clicks"
    }

    fn score(&self, estimate: &TrafficEstimate) -> f64 {
        estimate.mean.clicks_per_day.unwrap_or(0.0)
    }
}

/// Mean impressions per day.
#[derive(Debug, Default)]
pub struct ImpressionsScoreCalculator;

impl ScoreCalculator for ImpressionsScoreCalculator {
    fn name(&self) -> &str {
        "impressions"
    }

    fn score(&self, estimate: &TrafficEstimate) -> f64 {
        estimate.mean.impressions_per_day.unwrap_or(0.0)
    }
}

/// Linear blend of mean clicks, impressions and cost; cost is subtracted.
#[derive(Debug, Clone)]
pub struct WeightedScoreCalculator {
    clicks_weight: f64,
    impressions_weight: f64,
    cost_weight: f64,
}

impl WeightedScoreCalculator {
    pub fn new(config: &ScoreConfig) -> Self {
        Self {
            clicks_weight: config.clicks_weight,
            impressions_weight: config.impressions_weight,
            cost_weight: config.cost_weight,
        }
    }
}

impl ScoreCalculator for WeightedScoreCalculator {
    fn name(&self) -> &str {
        "weighted"
    }

    fn score(&self, estimate: &TrafficEstimate) -> f64 {
        let mean = &estimate.mean;
        let clicks = mean.clicks_per_day.unwrap_or(0.0);
        let impressions = mean.impressions_per_day.unwrap_or(0.0);
        let cost = mean.total_cost.map(|c| c.units()).unwrap_or(0.0);
        self.clicks_weight * clicks + self.impressions_weight * impressions
            - self.cost_weight * cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Money, TrafficMetrics};

    fn estimate(
        clicks: Option<f64>,
        impressions: Option<f64>,
        cost: Option<i64>,
    ) -> TrafficEstimate {
        let metrics = TrafficMetrics {
            clicks_per_day: clicks,
            impressions_per_day: impressions,
            total_cost: cost.map(Money::from_micros),
            ..Default::default()
        };
        TrafficEstimate::from_min_max(metrics.clone(), metrics)
    }

    #[test]
    fn test_clicks_and_impressions() {
        let e = estimate(Some(12.5), Some(300.0), None);
        assert_eq!(ClicksScoreCalculator.score(&e), 12.5);
        assert_eq!(ImpressionsScoreCalculator.score(&e), 300.0);
    }

    #[test]
    fn test_missing_metrics_score_zero() {
        let e = estimate(None, None, None);
        assert_eq!(ClicksScoreCalculator.score(&e), 0.0);
        assert_eq!(ImpressionsScoreCalculator.score(&e), 0.0);
    }

    #[test]
    fn test_weighted_subtracts_cost() {
        let calc = WeightedScoreCalculator::new(&ScoreConfig {
            clicks_weight: 2.0,
            impressions_weight: 0.1,
            cost_weight: 1.0,
        });
        // 2*10 + 0.1*100 - 1*5.00
        let e = estimate(Some(10.0), Some(100.0), Some(5_000_000));
        assert!((calc.score(&e) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_estimate_same_score() {
        let calc = WeightedScoreCalculator::new(&ScoreConfig::default());
        let e = estimate(Some(3.0), Some(40.0), Some(1_230_000));
        assert_eq!(calc.score(&e), calc.score(&e.clone()));
    }
}
