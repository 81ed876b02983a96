// src/seed/paging.rs — Page through the keyword idea service

use crate::api::{AdsApi, IdeaSelector};
use crate::infra::errors::{KeywordOptimizerError, Result};

/// Page size for idea requests. Every page is fetched, so this only trades request
/// count against response size.
pub const PAGE_SIZE: usize = 100;

/// Upper bound on pages for one selector. Reaching it means the reported total kept
/// moving ahead of the offset.
pub const MAX_IDEA_PAGES: usize = 1000;

/// Collect the keyword texts of every idea for `selector`.
///
/// Requests start at offset 0 and advance by [`PAGE_SIZE`] until the offset reaches
/// the total reported by the latest page. Empty pages do not end the loop.
pub async fn fetch_keyword_ideas(
    api: &dyn AdsApi,
    selector: &IdeaSelector,
) -> Result<Vec<String>> {
    let mut keywords = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        let page = api
            .keyword_ideas(selector, offset, PAGE_SIZE)
            .await
            .map_err(|e| {
                KeywordOptimizerError::generation("Problem while querying the keyword idea service")
                    .caused_by(e)
            })?;
        pages += 1;

        let total = page.total;
        keywords.extend(page.entries);
        offset += PAGE_SIZE;

        tracing::debug!(offset, total, fetched = keywords.len(), "Fetched keyword idea page");

        if offset >= total {
            break;
        }
        if pages >= MAX_IDEA_PAGES {
            return Err(KeywordOptimizerError::generation(format!(
                "Keyword idea service still reports {} ideas after {} pages",
                total, pages
            )));
        }
    }

    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EstimateRequest, IdeaPage, IdeaQuery, KeywordEstimate};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Reports a total that grows by one page on every request.
    struct RunawayIdeas {
        requests: Mutex<usize>,
    }

    #[async_trait]
    impl AdsApi for RunawayIdeas {
        fn name(&self) -> &str {
            "runaway"
        }

        async fn keyword_ideas(
            &self,
            _selector: &IdeaSelector,
            offset: usize,
            page_size: usize,
        ) -> std::result::Result<IdeaPage, KeywordOptimizerError> {
            *self.requests.lock().unwrap() += 1;
            Ok(IdeaPage {
                entries: vec![format!("idea {}", offset)],
                total: offset + 2 * page_size,
            })
        }

        async fn estimate_traffic(
            &self,
            _request: &EstimateRequest,
        ) -> std::result::Result<Vec<KeywordEstimate>, KeywordOptimizerError> {
            Ok(vec![])
        }
    }

    struct FailingIdeas;

    #[async_trait]
    impl AdsApi for FailingIdeas {
        fn name(&self) -> &str {
            "failing"
        }

        async fn keyword_ideas(
            &self,
            _selector: &IdeaSelector,
            _offset: usize,
            _page_size: usize,
        ) -> std::result::Result<IdeaPage, KeywordOptimizerError> {
            Err(KeywordOptimizerError::Api {
                message: "HTTP 400: bad selector".into(),
                retriable: false,
            })
        }

        async fn estimate_traffic(
            &self,
            _request: &EstimateRequest,
        ) -> std::result::Result<Vec<KeywordEstimate>, KeywordOptimizerError> {
            Ok(vec![])
        }
    }

    fn selector() -> IdeaSelector {
        IdeaSelector::new(IdeaQuery::SearchTerms(vec!["shoes".into()]), Default::default())
    }

    #[tokio::test]
    async fn test_growing_total_hits_page_ceiling() {
        let api = RunawayIdeas {
            requests: Mutex::new(0),
        };
        let err = fetch_keyword_ideas(&api, &selector()).await.unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Generation { .. }));
        assert_eq!(*api.requests.lock().unwrap(), MAX_IDEA_PAGES);
    }

    #[tokio::test]
    async fn test_service_error_becomes_generation_error() {
        let err = fetch_keyword_ideas(&FailingIdeas, &selector())
            .await
            .unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Generation { .. }));
        let source = std::error::Error::source(&err).expect("root cause");
        assert!(source.to_string().contains("bad selector"));
    }
}
