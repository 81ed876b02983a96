// src/alternatives/idea_service.rs — Related keywords from the keyword idea service

use std::sync::Arc;

use async_trait::async_trait;

use super::AlternativesFinder;
use crate::api::{AdsApi, IdeaQuery, IdeaSelector};
use crate::core::collection::KeywordCollection;
use crate::core::types::{Keyword, KeywordInfo, MatchType};
use crate::infra::errors::{KeywordOptimizerError, Result};

/// Asks the idea service for keywords related to each distinct keyword text and
/// offers them under the match types the source keyword was using.
pub struct IdeaServiceAlternativesFinder {
    api: Arc<dyn AdsApi>,
    ideas_per_keyword: usize,
}

impl IdeaServiceAlternativesFinder {
    pub fn new(api: Arc<dyn AdsApi>, ideas_per_keyword: usize) -> Self {
        Self {
            api,
            ideas_per_keyword,
        }
    }
}

/// Distinct texts in insertion order, each with the match types it appears with.
fn texts_with_match_types(keywords: &KeywordCollection) -> Vec<(String, Vec<MatchType>)> {
    let mut grouped: Vec<(String, Vec<MatchType>)> = Vec::new();
    for info in keywords {
        let text = &info.keyword.text;
        match grouped.iter_mut().find(|(t, _)| t == text) {
            Some((_, types)) => {
                if !types.contains(&info.keyword.match_type) {
                    types.push(info.keyword.match_type);
                }
            }
            None => grouped.push((text.clone(), vec![info.keyword.match_type])),
        }
    }
    grouped
}

#[async_trait]
impl AlternativesFinder for IdeaServiceAlternativesFinder {
    fn name(&self) -> &str {
        "idea-service"
    }

    async fn find(&self, keywords: &KeywordCollection) -> Result<KeywordCollection> {
        let mut alternatives = KeywordCollection::empty_like(keywords);
        if self.ideas_per_keyword == 0 {
            return Ok(alternatives);
        }

        for (text, match_types) in texts_with_match_types(keywords) {
            let selector = IdeaSelector::new(
                IdeaQuery::SearchTerms(vec![text.clone()]),
                keywords.criteria().clone(),
            );
            let page = self
                .api
                .keyword_ideas(&selector, 0, self.ideas_per_keyword)
                .await
                .map_err(|e| {
                    KeywordOptimizerError::alternatives(format!(
                        "Problem while querying related keywords for '{}'",
                        text
                    ))
                    .caused_by(e)
                })?;

            for idea in page.entries.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
                for match_type in &match_types {
                    let candidate = Keyword::new(idea, *match_type);
                    if !keywords.contains(&candidate.key()) {
                        alternatives.add(KeywordInfo::new(candidate));
                    }
                }
            }
        }

        tracing::debug!(
            input = keywords.len(),
            found = alternatives.len(),
            "Idea service alternatives"
        );
        Ok(alternatives)
    }
}
