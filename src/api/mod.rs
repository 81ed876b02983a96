// src/api/mod.rs — Remote Ads API layer (keyword ideas + traffic estimates)

pub mod http;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::types::{AdditionalCriteria, Keyword, Money, TrafficMetrics};
use crate::infra::errors::KeywordOptimizerError;

/// Access to the remote keyword idea and traffic estimation services.
///
/// Implementations must be safe to call concurrently; the optimizer shares one
/// handle between every component.
#[async_trait]
pub trait AdsApi: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one page of keyword ideas starting at `offset`.
    async fn keyword_ideas(
        &self,
        selector: &IdeaSelector,
        offset: usize,
        page_size: usize,
    ) -> Result<IdeaPage, KeywordOptimizerError>;

    /// Estimate traffic for a batch of keywords. Fails as a whole.
    async fn estimate_traffic(
        &self,
        request: &EstimateRequest,
    ) -> Result<Vec<KeywordEstimate>, KeywordOptimizerError>;
}

/// What to ask the idea service for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum IdeaQuery {
    /// Ideas related to free-text search terms.
    SearchTerms(Vec<String>),
    /// Ideas extracted from landing pages.
    Urls(Vec<String>),
    /// Ideas from a products-and-services category id.
    Category(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSelector {
    pub query: IdeaQuery,
    pub criteria: AdditionalCriteria,
}

impl IdeaSelector {
    pub fn new(query: IdeaQuery, criteria: AdditionalCriteria) -> Self {
        Self { query, criteria }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeaPage {
    /// Keyword texts on this page.
    pub entries: Vec<String>,
    /// Total number of ideas the service reports for the selector.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub keywords: Vec<Keyword>,
    pub max_cpc: Money,
    pub criteria: AdditionalCriteria,
}

/// Raw estimate for one keyword as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEstimate {
    pub keyword: Keyword,
    pub min: TrafficMetrics,
    pub max: TrafficMetrics,
}
