// src/cli/run.rs — Default command: wire the components and run one optimization

use std::sync::Arc;

use super::output::{write_console, write_csv_file};
use super::progress::terminal_progress;
use super::{Cli, OutputMode};
use crate::api::http::HttpAdsApi;
use crate::api::retry::{RetryApi, RetryConfig};
use crate::api::AdsApi;
use crate::core::collection::KeywordCollection;
use crate::core::context::OptimizationContext;
use crate::core::optimizer::Optimizer;
use crate::core::registry;
use crate::core::types::{AdditionalCriteria, Money};
use crate::infra::config::{ApiConfig, Config};
use crate::infra::errors::{KeywordOptimizerError, Result};
use crate::seed::{load_lines, SeedConfig, SeedGenerator, SeedSource};

/// Run the optimizer as described by the command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    check_output(&cli)?;

    let config = match cli.keyword_properties {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load_default()?,
    };

    let api_config = ApiConfig::load_from(&cli.ads_properties)?;
    let http: Arc<dyn AdsApi> = Arc::new(HttpAdsApi::new(&api_config)?);
    let api: Arc<dyn AdsApi> = Arc::new(RetryApi::with_config(
        http,
        RetryConfig::from(&config.retry),
    ));
    tracing::info!(endpoint = %api_config.endpoint, "Using Ads API");

    let ctx = OptimizationContext::new(config, api);
    let optimizer = build_optimizer(&ctx, seed_config(&cli)?, seed_source(&cli)?, cli.quiet)?;

    let best = optimizer.optimize().await?;
    write_results(&cli, &best)?;
    Ok(())
}

fn check_output(cli: &Cli) -> Result<()> {
    if cli.output.contains(&OutputMode::Csv) && cli.output_file.is_none() {
        return Err(KeywordOptimizerError::Validation(
            "CSV output needs an output file (--output-file)".into(),
        ));
    }
    Ok(())
}

/// Max CPC, match types and targeting criteria from the command line.
pub fn seed_config(cli: &Cli) -> Result<SeedConfig> {
    let max_cpc = Money::from_units(cli.max_cpc)?;
    let criteria = AdditionalCriteria {
        locations: cli.locations.iter().copied().collect(),
        languages: cli.languages.iter().copied().collect(),
        parameters: cli.params.iter().cloned().collect(),
    };
    tracing::info!(
        max_cpc = %max_cpc,
        match_types = ?cli.match_types,
        locations = ?criteria.locations,
        languages = ?criteria.languages,
        parameters = ?criteria.parameters,
        "Seed settings"
    );
    Ok(SeedConfig {
        max_cpc,
        match_types: cli.match_types.clone(),
        criteria,
    })
}

/// The single `--seed-*` option given. Term and URL files are read here.
pub fn seed_source(cli: &Cli) -> Result<SeedSource> {
    let source = if !cli.seed_keywords.is_empty() {
        SeedSource::Keywords(cli.seed_keywords.clone())
    } else if let Some(ref path) = cli.seed_keywords_file {
        SeedSource::KeywordsFile(path.clone())
    } else if !cli.seed_terms.is_empty() {
        SeedSource::SearchTerms(cli.seed_terms.clone())
    } else if let Some(ref path) = cli.seed_terms_file {
        SeedSource::SearchTerms(load_lines(path)?)
    } else if !cli.seed_urls.is_empty() {
        SeedSource::Urls(cli.seed_urls.clone())
    } else if let Some(ref path) = cli.seed_urls_file {
        SeedSource::Urls(load_lines(path)?)
    } else if let Some(category) = cli.seed_category {
        SeedSource::Category(category)
    } else {
        return Err(KeywordOptimizerError::Validation(
            "You must specify a seed option".into(),
        ));
    };
    Ok(source)
}

/// Resolve the configured components and assemble the optimizer.
pub fn build_optimizer(
    ctx: &OptimizationContext,
    seed_config: SeedConfig,
    source: SeedSource,
    quiet: bool,
) -> Result<Optimizer> {
    let seed = SeedGenerator::new(seed_config, source).with_api(ctx.api());
    let finder = registry::alternatives_finder(ctx)?;
    let evaluator = registry::evaluator(ctx)?;
    let strategy = registry::round_strategy(ctx)?;
    tracing::info!(
        alternatives = finder.name(),
        round_strategy = strategy.name(),
        "Components resolved"
    );

    let optimizer = Optimizer::new(seed, finder, evaluator, strategy);
    Ok(if quiet {
        optimizer
    } else {
        optimizer.with_progress(terminal_progress())
    })
}

fn write_results(cli: &Cli, best: &KeywordCollection) -> Result<()> {
    for mode in &cli.output {
        match mode {
            OutputMode::Console => {
                let stdout = std::io::stdout();
                write_console(&mut stdout.lock(), best)?;
            }
            OutputMode::Csv => {
                if let Some(ref path) = cli.output_file {
                    write_csv_file(path, best)?;
                    eprintln!("Wrote {} keyword(s) to {}", best.len(), path.display());
                }
            }
        }
    }
    Ok(())
}
