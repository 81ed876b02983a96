// src/seed/mod.rs — Seed keyword generation

pub mod paging;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{AdsApi, IdeaQuery, IdeaSelector};
use crate::core::collection::KeywordCollection;
use crate::core::types::{AdditionalCriteria, Keyword, KeywordInfo, MatchType, Money};
use crate::infra::errors::{KeywordOptimizerError, Result};

/// Settings copied into every generated collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedConfig {
    pub max_cpc: Money,
    pub match_types: Vec<MatchType>,
    pub criteria: AdditionalCriteria,
}

/// Where the seed keyword texts come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedSource {
    /// Literal keyword texts.
    Keywords(Vec<String>),
    /// A file with one keyword per line.
    KeywordsFile(PathBuf),
    /// Keyword ideas for free-text search terms.
    SearchTerms(Vec<String>),
    /// Keyword ideas extracted from landing pages.
    Urls(Vec<String>),
    /// Keyword ideas for a products-and-services category id.
    Category(i32),
}

impl SeedSource {
    fn describe(&self) -> &'static str {
        match self {
            SeedSource::Keywords(_) => "keywords",
            SeedSource::KeywordsFile(_) => "keywords file",
            SeedSource::SearchTerms(_) => "search terms",
            SeedSource::Urls(_) => "urls",
            SeedSource::Category(_) => "category",
        }
    }
}

/// Builds the round-0 collection: distinct seed texts × configured match types.
pub struct SeedGenerator {
    config: SeedConfig,
    source: SeedSource,
    api: Option<Arc<dyn AdsApi>>,
}

impl SeedGenerator {
    pub fn new(config: SeedConfig, source: SeedSource) -> Self {
        Self {
            config,
            source,
            api: None,
        }
    }

    /// Idea-service backed sources need an API handle.
    pub fn with_api(mut self, api: Arc<dyn AdsApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub async fn generate(&self) -> Result<KeywordCollection> {
        let mut match_types = self.config.match_types.clone();
        match_types.sort();
        match_types.dedup();
        if match_types.is_empty() {
            return Err(KeywordOptimizerError::generation(
                "No match type specified, please specify at least one match type for your keywords",
            ));
        }

        let texts = distinct_texts(self.keyword_texts().await?);
        if texts.is_empty() {
            return Err(KeywordOptimizerError::generation(format!(
                "The seed {} produced no keywords",
                self.source.describe()
            )));
        }

        let mut collection = KeywordCollection::new(self.config.max_cpc)
            .with_criteria(self.config.criteria.clone());
        for text in &texts {
            for match_type in &match_types {
                collection.add(KeywordInfo::new(Keyword::new(text.clone(), *match_type)));
            }
        }

        tracing::info!(
            source = self.source.describe(),
            texts = texts.len(),
            match_types = match_types.len(),
            keywords = collection.len(),
            "Generated seed keywords"
        );
        Ok(collection)
    }

    async fn keyword_texts(&self) -> Result<Vec<String>> {
        let query = match &self.source {
            SeedSource::Keywords(keywords) => return Ok(keywords.clone()),
            SeedSource::KeywordsFile(path) => return load_lines(path),
            SeedSource::SearchTerms(terms) => IdeaQuery::SearchTerms(terms.clone()),
            SeedSource::Urls(urls) => {
                for u in urls {
                    url::Url::parse(u).map_err(|e| {
                        KeywordOptimizerError::generation("Invalid seed url").caused_by(
                            KeywordOptimizerError::Validation(format!("'{}': {}", u, e)),
                        )
                    })?;
                }
                IdeaQuery::Urls(urls.clone())
            }
            SeedSource::Category(id) => IdeaQuery::Category(*id),
        };

        let api = self.api.as_ref().ok_or_else(|| {
            KeywordOptimizerError::Configuration(format!(
                "Seed source '{}' needs access to the keyword idea service",
                self.source.describe()
            ))
        })?;
        let selector = IdeaSelector::new(query, self.config.criteria.clone());
        paging::fetch_keyword_ideas(api.as_ref(), &selector).await
    }
}

/// Trimmed, non-blank texts in first-seen order without repeats.
fn distinct_texts(texts: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    texts
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Read one entry per line, skipping blank lines and `#` comments.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        KeywordOptimizerError::generation(format!("Error loading file '{}'", path.display()))
            .caused_by(KeywordOptimizerError::Io(e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(match_types: Vec<MatchType>) -> SeedConfig {
        SeedConfig {
            max_cpc: Money::from_micros(1_000_000),
            match_types,
            criteria: AdditionalCriteria::default(),
        }
    }

    #[tokio::test]
    async fn test_cross_product_of_texts_and_match_types() {
        let generator = SeedGenerator::new(
            config(vec![MatchType::Exact, MatchType::Broad]),
            SeedSource::Keywords(vec!["shoes".into(), "boots".into(), "shoes".into()]),
        );
        let collection = generator.generate().await.unwrap();
        assert_eq!(collection.len(), 4);
        assert!(collection.contains(&Keyword::new("boots", MatchType::Broad).key()));
        assert!(collection.iter().all(|i| !i.is_evaluated()));
        assert_eq!(collection.max_cpc(), Money::from_micros(1_000_000));
    }

    #[tokio::test]
    async fn test_no_match_types_is_error() {
        let generator = SeedGenerator::new(config(vec![]), SeedSource::Keywords(vec!["a".into()]));
        let err = generator.generate().await.unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_zero_keywords_is_error() {
        let generator = SeedGenerator::new(
            config(vec![MatchType::Exact]),
            SeedSource::Keywords(vec!["   ".into()]),
        );
        assert!(generator.generate().await.is_err());
    }

    #[tokio::test]
    async fn test_remote_source_without_api_is_configuration_error() {
        let generator =
            SeedGenerator::new(config(vec![MatchType::Exact]), SeedSource::Category(10021));
        let err = generator.generate().await.unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_any_request() {
        let generator = SeedGenerator::new(
            config(vec![MatchType::Exact]),
            SeedSource::Urls(vec!["not a url".into()]),
        );
        let err = generator.generate().await.unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Generation { .. }));
    }

    #[tokio::test]
    async fn test_keywords_file_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# seed list").unwrap();
        writeln!(file, "running shoes").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  trail shoes  ").unwrap();

        let generator = SeedGenerator::new(
            config(vec![MatchType::Phrase]),
            SeedSource::KeywordsFile(file.path().to_path_buf()),
        );
        let collection = generator.generate().await.unwrap();
        let texts: Vec<&str> = collection
            .iter()
            .map(|i| i.keyword.text.as_str())
            .collect();
        assert_eq!(texts, vec!["running shoes", "trail shoes"]);
    }

    #[test]
    fn test_load_lines_missing_file() {
        let err = load_lines(Path::new("/nonexistent/seeds.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/seeds.txt"));
    }
}
