// src/cli/mod.rs — CLI definition (clap derive)

pub mod output;
pub mod progress;
pub mod run;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::core::registry;
use crate::core::types::MatchType;
use crate::infra::config::Component;

#[derive(Parser, Debug)]
#[command(
    name = "keyword-optimizer",
    about = "Find well-performing keywords by round-based expansion and scoring",
    version,
    after_help = components_help()
)]
#[command(group(
    ArgGroup::new("seed")
        .required(true)
        .args([
            "seed_keywords",
            "seed_keywords_file",
            "seed_terms",
            "seed_terms_file",
            "seed_urls",
            "seed_urls_file",
            "seed_category",
        ])
))]
pub struct Cli {
    /// Optimizer configuration file (defaults to the built-in configuration)
    #[arg(long = "keyword-properties", visible_alias = "kp", value_name = "FILE")]
    pub keyword_properties: Option<PathBuf>,

    /// API credentials file
    #[arg(
        long = "ads-properties",
        visible_alias = "ap",
        value_name = "FILE",
        default_value = "ads.toml"
    )]
    pub ads_properties: PathBuf,

    /// Use the given keywords as seed
    #[arg(long, visible_alias = "sk", num_args = 1.., value_name = "KEYWORDS")]
    pub seed_keywords: Vec<String>,

    /// Load seed keywords from a file (one per line)
    #[arg(long, visible_alias = "skf", value_name = "FILE")]
    pub seed_keywords_file: Option<PathBuf>,

    /// Ask the idea service for keywords matching these search terms
    #[arg(long, visible_alias = "st", num_args = 1.., value_name = "TERMS")]
    pub seed_terms: Vec<String>,

    /// Load seed search terms from a file (one per line)
    #[arg(long, visible_alias = "stf", value_name = "FILE")]
    pub seed_terms_file: Option<PathBuf>,

    /// Ask the idea service for keywords extracted from these landing pages
    #[arg(long, visible_alias = "su", num_args = 1.., value_name = "URLS")]
    pub seed_urls: Vec<String>,

    /// Load seed URLs from a file (one per line)
    #[arg(long, visible_alias = "suf", value_name = "FILE")]
    pub seed_urls_file: Option<PathBuf>,

    /// Ask the idea service for keywords of a products-and-services category
    #[arg(long, visible_alias = "sc", value_name = "ID")]
    pub seed_category: Option<i32>,

    /// Keyword match types to use (EXACT, PHRASE, BROAD)
    #[arg(short, long, required = true, num_args = 1..=3, value_name = "TYPES")]
    pub match_types: Vec<MatchType>,

    /// Maximum cost per click in currency units (e.g. 5.0)
    #[arg(long, visible_alias = "cpc", value_name = "AMOUNT")]
    pub max_cpc: f64,

    /// Location criterion ids to target
    #[arg(long, visible_alias = "loc", num_args = 1.., value_name = "IDS")]
    pub locations: Vec<i64>,

    /// Language criterion ids to target
    #[arg(long, visible_alias = "lang", num_args = 1.., value_name = "IDS")]
    pub languages: Vec<i64>,

    /// Extra search parameter passed to the remote services (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<String>,

    /// How to report results
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..=2,
        default_value = "console",
        value_name = "MODE"
    )]
    pub output: Vec<OutputMode>,

    /// Target file for CSV output
    #[arg(long, visible_alias = "of", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Console,
    Csv,
}

/// Accepts `key=value` with a non-empty key; surrounding whitespace is dropped.
fn parse_param(raw: &str) -> Result<String, String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok(format!("{}={}", key.trim(), value.trim()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Registered component names, shown below the option list.
fn components_help() -> String {
    let mut help = String::from("Components (set in the optimizer configuration):");
    for component in [
        Component::AlternativesFinder,
        Component::Estimator,
        Component::ScoreCalculator,
        Component::RoundStrategy,
    ] {
        help.push_str(&format!(
            "\n  {}: {}",
            component.key(),
            registry::available(component).join(", ")
        ));
    }
    help
}
