// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::{KeywordOptimizerError, Result};

/// Configuration shipped with the binary, used when no file is given.
const DEFAULT_CONFIG: &str = include_str!("../../keyword-optimizer.toml");

/// Environment variable overriding `access_token` in the API credentials file.
pub const ACCESS_TOKEN_ENV: &str = "KEYWORD_OPTIMIZER_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub components: ComponentsConfig,

    #[serde(default)]
    pub round_strategy: RoundStrategyConfig,

    #[serde(default)]
    pub alternatives: AlternativesConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub score: ScoreConfig,

    #[serde(default)]
    pub retry: RetryConfigToml,
}

/// The pluggable components, selected by registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    AlternativesFinder,
    Estimator,
    ScoreCalculator,
    RoundStrategy,
}

impl Component {
    pub fn key(&self) -> &'static str {
        match self {
            Component::AlternativesFinder => "components.alternatives_finder",
            Component::Estimator => "components.estimator",
            Component::ScoreCalculator => "components.score_calculator",
            Component::RoundStrategy => "components.round_strategy",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentsConfig {
    pub alternatives_finder: Option<String>,
    pub estimator: Option<String>,
    pub score_calculator: Option<String>,
    pub round_strategy: Option<String>,
}

impl ComponentsConfig {
    /// Look up the implementation name for a component. Missing or blank is a startup error.
    pub fn require(&self, component: Component) -> Result<&str> {
        let value = match component {
            Component::AlternativesFinder => self.alternatives_finder.as_deref(),
            Component::Estimator => self.estimator.as_deref(),
            Component::ScoreCalculator => self.score_calculator.as_deref(),
            Component::RoundStrategy => self.round_strategy.as_deref(),
        };
        match value.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(KeywordOptimizerError::Configuration(format!(
                "Mandatory property '{}' is missing",
                component.key()
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStrategyConfig {
    pub max_rounds: u32,
    pub keep_top: usize,
    pub min_improvement: f64,
}

impl Default for RoundStrategyConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            keep_top: 20,
            min_improvement: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesConfig {
    pub ideas_per_keyword: usize,
}

impl Default for AlternativesConfig {
    fn default() -> Self {
        Self {
            ideas_per_keyword: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_concurrent_batches: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub clicks_weight: f64,
    pub impressions_weight: f64,
    pub cost_weight: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            clicks_weight: 1.0,
            impressions_weight: 0.0,
            cost_weight: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfigToml {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfigToml {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 1_000,
            backoff_factor: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl Config {
    /// Load the built-in default configuration.
    pub fn load_default() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeywordOptimizerError::Configuration(format!(
                "Error loading the configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            KeywordOptimizerError::Configuration(format!(
                "Error parsing the configuration file: {}",
                e
            ))
        })
    }
}

/// Credentials and endpoint for the Ads API (`ads.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub developer_token: String,
    pub client_customer_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl ApiConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeywordOptimizerError::Configuration(format!(
                "Error loading the ads properties file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: ApiConfig = toml::from_str(&content).map_err(|e| {
            KeywordOptimizerError::Configuration(format!(
                "Error parsing the ads properties file: {}",
                e
            ))
        })?;
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            config.access_token = Some(token);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint).map_err(|e| {
            KeywordOptimizerError::Configuration(format!(
                "Invalid API endpoint '{}': {}",
                self.endpoint, e
            ))
        })?;
        if self.access_token.as_deref().unwrap_or("").is_empty() {
            return Err(KeywordOptimizerError::Configuration(format!(
                "Missing access token (set 'access_token' or {})",
                ACCESS_TOKEN_ENV
            )));
        }
        Ok(())
    }
}
