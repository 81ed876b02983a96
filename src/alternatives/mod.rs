// src/alternatives/mod.rs — Alternatives finders (expand a keyword collection)

pub mod idea_service;
pub mod match_types;

use async_trait::async_trait;

use crate::core::collection::KeywordCollection;
use crate::infra::errors::Result;

pub use idea_service::IdeaServiceAlternativesFinder;
pub use match_types::MatchTypeAlternativesFinder;

/// Derives new candidate keywords from an existing collection.
///
/// Implementations never modify the input and only return keys that are not already
/// in it, unevaluated and carrying the input's max CPC and criteria. An empty result
/// is valid.
#[async_trait]
pub trait AlternativesFinder: Send + Sync {
    fn name(&self) -> &str;

    async fn find(&self, keywords: &KeywordCollection) -> Result<KeywordCollection>;
}

/// Runs several finders and unions their results in order.
pub struct CompositeAlternativesFinder {
    finders: Vec<Box<dyn AlternativesFinder>>,
}

impl CompositeAlternativesFinder {
    pub fn new(finders: Vec<Box<dyn AlternativesFinder>>) -> Self {
        Self { finders }
    }
}

#[async_trait]
impl AlternativesFinder for CompositeAlternativesFinder {
    fn name(&self) -> &str {
        "composite"
    }

    async fn find(&self, keywords: &KeywordCollection) -> Result<KeywordCollection> {
        let mut found = KeywordCollection::empty_like(keywords);
        for finder in &self.finders {
            let alternatives = finder.find(keywords).await?;
            tracing::debug!(
                finder = finder.name(),
                count = alternatives.len(),
                "Alternatives found"
            );
            found.add_all(&alternatives);
        }
        Ok(found)
    }
}
