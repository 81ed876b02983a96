// tests/optimizer_test.rs — Integration test: full optimization run against a fake Ads API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use keyword_optimizer::api::{
    AdsApi, EstimateRequest, IdeaPage, IdeaQuery, IdeaSelector, KeywordEstimate,
};
use keyword_optimizer::cli::run::build_optimizer;
use keyword_optimizer::core::context::OptimizationContext;
use keyword_optimizer::core::optimizer::{Optimizer, ProgressEvent};
use keyword_optimizer::core::registry;
use keyword_optimizer::core::types::{MatchType, Money, TrafficMetrics};
use keyword_optimizer::infra::config::Config;
use keyword_optimizer::infra::errors::KeywordOptimizerError;
use keyword_optimizer::seed::{SeedConfig, SeedGenerator, SeedSource};

/// Canned ideas per search term and clicks per keyword text. Records every keyword
/// sent for estimation.
struct FakeAdsApi {
    ideas: HashMap<String, Vec<String>>,
    clicks: HashMap<String, f64>,
    estimated: Mutex<Vec<String>>,
    fail_estimates: bool,
}

impl FakeAdsApi {
    fn shoes() -> Self {
        Self {
            ideas: HashMap::from([(
                "shoes".to_string(),
                vec!["running shoes".to_string(), "shoes sale".to_string()],
            )]),
            clicks: HashMap::from([
                ("shoes".to_string(), 10.0),
                ("running shoes".to_string(), 30.0),
                ("shoes sale".to_string(), 5.0),
            ]),
            estimated: Mutex::new(Vec::new()),
            fail_estimates: false,
        }
    }
}

#[async_trait]
impl AdsApi for FakeAdsApi {
    fn name(&self) -> &str {
        "fake"
    }

    async fn keyword_ideas(
        &self,
        selector: &IdeaSelector,
        _offset: usize,
        _page_size: usize,
    ) -> Result<IdeaPage, KeywordOptimizerError> {
        let entries = match selector.query {
            IdeaQuery::SearchTerms(ref terms) => terms
                .iter()
                .flat_map(|t| self.ideas.get(t).cloned().unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        };
        let total = entries.len();
        Ok(IdeaPage { entries, total })
    }

    async fn estimate_traffic(
        &self,
        request: &EstimateRequest,
    ) -> Result<Vec<KeywordEstimate>, KeywordOptimizerError> {
        if self.fail_estimates {
            return Err(KeywordOptimizerError::Api {
                message: "HTTP 400: quota exceeded".into(),
                retriable: false,
            });
        }
        let mut estimated = self.estimated.lock().unwrap();
        Ok(request
            .keywords
            .iter()
            .map(|k| {
                estimated.push(k.text.clone());
                let metrics = TrafficMetrics {
                    clicks_per_day: Some(self.clicks.get(&k.text).copied().unwrap_or(0.0)),
                    ..Default::default()
                };
                KeywordEstimate {
                    keyword: k.clone(),
                    min: metrics.clone(),
                    max: metrics,
                }
            })
            .collect())
    }
}

fn config(max_rounds: u32, keep_top: usize) -> Config {
    Config::parse(&format!(
        r#"
        [components]
        alternatives_finder = "idea-service"
        estimator = "api-estimator"
        score_calculator = "clicks"
        round_strategy = "fixed-rounds"

        [round_strategy]
        max_rounds = {max_rounds}
        keep_top = {keep_top}
        min_improvement = 0.0
        "#
    ))
    .unwrap()
}

fn shoes_seed() -> (SeedConfig, SeedSource) {
    (
        SeedConfig {
            max_cpc: Money::from_micros(1_000_000),
            match_types: vec![MatchType::Exact],
            criteria: Default::default(),
        },
        SeedSource::Keywords(vec!["shoes".into()]),
    )
}

#[tokio::test]
async fn test_end_to_end_keeps_top_two() {
    let api = Arc::new(FakeAdsApi::shoes());
    let ctx = OptimizationContext::new(config(1, 2), api.clone());
    let (seed_config, source) = shoes_seed();

    let optimizer = build_optimizer(&ctx, seed_config, source, true).unwrap();
    let result = optimizer.optimize().await.unwrap();

    let ranked: Vec<(String, Option<f64>)> = result
        .list_sorted_by_score()
        .iter()
        .map(|i| (i.keyword.text.clone(), i.score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("running shoes".to_string(), Some(30.0)),
            ("shoes".to_string(), Some(10.0)),
        ]
    );
    assert!(result
        .iter()
        .all(|i| i.keyword.match_type == MatchType::Exact));
}

#[tokio::test]
async fn test_repeated_keywords_estimated_once() {
    let api = Arc::new(FakeAdsApi::shoes());
    let ctx = OptimizationContext::new(config(3, 2), api.clone());
    let (seed_config, source) = shoes_seed();

    build_optimizer(&ctx, seed_config, source, true)
        .unwrap()
        .optimize()
        .await
        .unwrap();

    let mut estimated = api.estimated.lock().unwrap().clone();
    estimated.sort();
    assert_eq!(estimated, vec!["running shoes", "shoes", "shoes sale"]);
}

#[tokio::test]
async fn test_terminates_within_configured_rounds() {
    for max_rounds in 1..=4 {
        let api = Arc::new(FakeAdsApi::shoes());
        let ctx = OptimizationContext::new(config(max_rounds, 1), api);
        let (seed_config, source) = shoes_seed();

        let rounds = Arc::new(Mutex::new(0u32));
        let counter = rounds.clone();
        let optimizer = Optimizer::new(
            SeedGenerator::new(seed_config, source),
            registry::alternatives_finder(&ctx).unwrap(),
            registry::evaluator(&ctx).unwrap(),
            registry::round_strategy(&ctx).unwrap(),
        )
        .with_progress(move |event| {
            if let ProgressEvent::RoundEnd { .. } = event {
                *counter.lock().unwrap() += 1;
            }
        });

        let result = optimizer.optimize().await.unwrap();
        assert_eq!(*rounds.lock().unwrap(), max_rounds);
        assert_eq!(result.len(), 1);
    }
}

#[tokio::test]
async fn test_estimation_failure_aborts_run() {
    let api = Arc::new(FakeAdsApi {
        fail_estimates: true,
        ..FakeAdsApi::shoes()
    });
    let ctx = OptimizationContext::new(config(3, 2), api);
    let (seed_config, source) = shoes_seed();

    let err = build_optimizer(&ctx, seed_config, source, true)
        .unwrap()
        .optimize()
        .await
        .unwrap_err();

    assert!(matches!(err, KeywordOptimizerError::Estimation { .. }));
    assert!(format!("{err:#}").contains("estimating traffic"));
}
