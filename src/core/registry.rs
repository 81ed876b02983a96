// src/core/registry.rs — Component registry (configured name -> implementation)

use super::context::OptimizationContext;
use super::round::{FixedRoundStrategy, ImprovementRoundStrategy, RoundStrategy};
use crate::alternatives::{
    AlternativesFinder, CompositeAlternativesFinder, IdeaServiceAlternativesFinder,
    MatchTypeAlternativesFinder,
};
use crate::evaluator::{
    ApiTrafficEstimator, CachedEstimator, ClicksScoreCalculator, EstimatorBasedEvaluator,
    Evaluator, ImpressionsScoreCalculator, ScoreCalculator, TrafficEstimator,
    WeightedScoreCalculator,
};
use crate::infra::config::Component;
use crate::infra::errors::{KeywordOptimizerError, Result};

type Factory<T> = fn(&OptimizationContext) -> Result<Box<T>>;

fn idea_service_finder(ctx: &OptimizationContext) -> Result<Box<dyn AlternativesFinder>> {
    Ok(Box::new(IdeaServiceAlternativesFinder::new(
        ctx.api(),
        ctx.config().alternatives.ideas_per_keyword,
    )))
}

fn match_type_finder(_ctx: &OptimizationContext) -> Result<Box<dyn AlternativesFinder>> {
    Ok(Box::new(MatchTypeAlternativesFinder::new()))
}

fn api_estimator(ctx: &OptimizationContext) -> Result<Box<dyn TrafficEstimator>> {
    let config = &ctx.config().estimator;
    Ok(Box::new(ApiTrafficEstimator::new(
        ctx.api(),
        config.batch_size,
        config.max_concurrent_batches,
    )))
}

fn clicks_score(_ctx: &OptimizationContext) -> Result<Box<dyn ScoreCalculator>> {
    Ok(Box::new(ClicksScoreCalculator))
}

fn impressions_score(_ctx: &OptimizationContext) -> Result<Box<dyn ScoreCalculator>> {
    Ok(Box::new(ImpressionsScoreCalculator))
}

fn weighted_score(ctx: &OptimizationContext) -> Result<Box<dyn ScoreCalculator>> {
    Ok(Box::new(WeightedScoreCalculator::new(&ctx.config().score)))
}

fn fixed_rounds(ctx: &OptimizationContext) -> Result<Box<dyn RoundStrategy>> {
    let strategy = FixedRoundStrategy::from_config(&ctx.config().round_strategy)?;
    Ok(Box::new(strategy))
}

fn improvement_rounds(ctx: &OptimizationContext) -> Result<Box<dyn RoundStrategy>> {
    let strategy = ImprovementRoundStrategy::from_config(&ctx.config().round_strategy)?;
    Ok(Box::new(strategy))
}

const ALTERNATIVES_FINDERS: &[(&str, Factory<dyn AlternativesFinder>)] = &[
    ("idea-service", idea_service_finder),
    ("match-types", match_type_finder),
];

const ESTIMATORS: &[(&str, Factory<dyn TrafficEstimator>)] = &[("api-estimator", api_estimator)];

const SCORE_CALCULATORS: &[(&str, Factory<dyn ScoreCalculator>)] = &[
    ("clicks", clicks_score),
    ("impressions", impressions_score),
    ("weighted", weighted_score),
];

const ROUND_STRATEGIES: &[(&str, Factory<dyn RoundStrategy>)] = &[
    ("fixed-rounds", fixed_rounds),
    ("improvement", improvement_rounds),
];

fn lookup<T: ?Sized>(
    table: &[(&str, Factory<T>)],
    component: Component,
    name: &str,
) -> Result<Factory<T>> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| {
            let known: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
            KeywordOptimizerError::Configuration(format!(
                "Unknown {} '{}' (expected one of: {})",
                component.key(),
                name,
                known.join(", ")
            ))
        })
}

/// Registered names for a component, in registration order.
pub fn available(component: Component) -> Vec<&'static str> {
    fn names<T: ?Sized>(table: &[(&'static str, Factory<T>)]) -> Vec<&'static str> {
        table.iter().map(|(n, _)| *n).collect()
    }
    match component {
        Component::AlternativesFinder => names(ALTERNATIVES_FINDERS),
        Component::Estimator => names(ESTIMATORS),
        Component::ScoreCalculator => names(SCORE_CALCULATORS),
        Component::RoundStrategy => names(ROUND_STRATEGIES),
    }
}

/// The configured finder. A comma-separated list yields a composite that runs each
/// finder in the listed order.
pub fn alternatives_finder(ctx: &OptimizationContext) -> Result<Box<dyn AlternativesFinder>> {
    let component = Component::AlternativesFinder;
    let names: Vec<&str> = ctx
        .config()
        .components
        .require(component)?
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    let mut finders = names
        .iter()
        .map(|name| lookup(ALTERNATIVES_FINDERS, component, name).and_then(|f| f(ctx)))
        .collect::<Result<Vec<_>>>()?;

    match finders.len() {
        0 => Err(KeywordOptimizerError::Configuration(format!(
            "Mandatory property '{}' is missing",
            component.key()
        ))),
        1 => Ok(finders.remove(0)),
        _ => Ok(Box::new(CompositeAlternativesFinder::new(finders))),
    }
}

/// The configured estimator, wrapped in a run-long cache.
pub fn estimator(ctx: &OptimizationContext) -> Result<Box<dyn TrafficEstimator>> {
    let component = Component::Estimator;
    let name = ctx.config().components.require(component)?;
    let inner = lookup(ESTIMATORS, component, name)?(ctx)?;
    Ok(Box::new(CachedEstimator::new(inner)))
}

pub fn score_calculator(ctx: &OptimizationContext) -> Result<Box<dyn ScoreCalculator>> {
    let component = Component::ScoreCalculator;
    let name = ctx.config().components.require(component)?;
    lookup(SCORE_CALCULATORS, component, name)?(ctx)
}

pub fn round_strategy(ctx: &OptimizationContext) -> Result<Box<dyn RoundStrategy>> {
    let component = Component::RoundStrategy;
    let name = ctx.config().components.require(component)?;
    lookup(ROUND_STRATEGIES, component, name)?(ctx)
}

/// Cached estimator plus the configured score calculator.
pub fn evaluator(ctx: &OptimizationContext) -> Result<Box<dyn Evaluator>> {
    Ok(Box::new(EstimatorBasedEvaluator::new(
        estimator(ctx)?,
        score_calculator(ctx)?,
    )))
}
