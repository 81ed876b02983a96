// src/alternatives/match_types.rs — Broaden / narrow existing keywords

use async_trait::async_trait;

use super::AlternativesFinder;
use crate::core::collection::KeywordCollection;
use crate::core::types::{Keyword, KeywordInfo, MatchType};
use crate::infra::errors::Result;

/// Offers every keyword under each match type it is not yet used with.
#[derive(Debug, Default)]
pub struct MatchTypeAlternativesFinder;

impl MatchTypeAlternativesFinder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlternativesFinder for MatchTypeAlternativesFinder {
    fn name(&self) -> &str {
        "match-types"
    }

    async fn find(&self, keywords: &KeywordCollection) -> Result<KeywordCollection> {
        let mut alternatives = KeywordCollection::empty_like(keywords);
        for info in keywords {
            for match_type in MatchType::ALL {
                let candidate = Keyword::new(info.keyword.text.clone(), match_type);
                if !keywords.contains(&candidate.key()) {
                    alternatives.add(KeywordInfo::new(candidate));
                }
            }
        }
        Ok(alternatives)
    }
}
