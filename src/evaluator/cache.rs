// src/evaluator/cache.rs — Estimate caching for the lifetime of a run

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::estimator::TrafficEstimator;
use crate::core::types::{
    AdditionalCriteria, Keyword, KeywordKey, MatchType, Money, TrafficEstimate,
};
use crate::infra::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    match_type: MatchType,
    max_cpc_micros: i64,
}

impl CacheKey {
    fn new(keyword: &Keyword, max_cpc: Money) -> Self {
        Self {
            text: keyword.text.clone(),
            match_type: keyword.match_type,
            max_cpc_micros: max_cpc.micros(),
        }
    }
}

/// Wraps an estimator and remembers every estimate it returned.
///
/// Entries are keyed by (text, match type, max CPC) and never evicted; criteria are
/// fixed for a run and not part of the key. The map stays locked while misses are
/// fetched, so concurrent callers never request the same key twice.
pub struct CachedEstimator {
    inner: Box<dyn TrafficEstimator>,
    cache: Mutex<HashMap<CacheKey, TrafficEstimate>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CachedEstimator {
    pub fn new(inner: Box<dyn TrafficEstimator>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[async_trait]
impl TrafficEstimator for CachedEstimator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn estimate(
        &self,
        keywords: &[Keyword],
        max_cpc: Money,
        criteria: &AdditionalCriteria,
    ) -> Result<HashMap<KeywordKey, TrafficEstimate>> {
        let mut cache = self.cache.lock().await;

        let mut result = HashMap::with_capacity(keywords.len());
        let mut pending: HashSet<KeywordKey> = HashSet::new();
        let mut misses: Vec<Keyword> = Vec::new();

        for keyword in keywords {
            if let Some(estimate) = cache.get(&CacheKey::new(keyword, max_cpc)) {
                result.insert(keyword.key(), estimate.clone());
            } else if pending.insert(keyword.key()) {
                misses.push(keyword.clone());
            }
        }

        let hit_count = result.len();
        self.hits.fetch_add(hit_count, Ordering::Relaxed);
        self.misses.fetch_add(misses.len(), Ordering::Relaxed);

        if !misses.is_empty() {
            let fresh = self.inner.estimate(&misses, max_cpc, criteria).await?;
            for keyword in &misses {
                if let Some(estimate) = fresh.get(&keyword.key()) {
                    cache.insert(CacheKey::new(keyword, max_cpc), estimate.clone());
                }
            }
            result.extend(fresh);
        }

        tracing::debug!(
            hits = hit_count,
            misses = misses.len(),
            cached = cache.len(),
            "Estimate cache"
        );
        Ok(result)
    }
}
