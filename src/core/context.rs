// src/core/context.rs — Shared, read-only state for one optimization run

use std::sync::Arc;

use crate::api::AdsApi;
use crate::infra::config::Config;

/// Configuration plus the remote API handle. Built once at startup and borrowed by
/// every component constructor; nothing mutates it during a run.
#[derive(Clone)]
pub struct OptimizationContext {
    config: Config,
    api: Arc<dyn AdsApi>,
}

impl OptimizationContext {
    pub fn new(config: Config, api: Arc<dyn AdsApi>) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> Arc<dyn AdsApi> {
        Arc::clone(&self.api)
    }
}

impl std::fmt::Debug for OptimizationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizationContext")
            .field("config", &self.config)
            .field("api", &self.api.name())
            .finish()
    }
}
