// src/core/collection.rs — Keyword collection (deduplicated by text + match type)

use std::collections::HashMap;

use super::types::{AdditionalCriteria, Keyword, KeywordInfo, KeywordKey, Money};

/// A set of keywords keyed by (text, match type), sharing one max CPC and one set of
/// targeting criteria.
///
/// Members keep their first insertion position. Re-adding a key replaces the stored
/// entry in place (last write wins), so there is never a second entry for a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordCollection {
    entries: Vec<KeywordInfo>,
    index: HashMap<KeywordKey, usize>,
    max_cpc: Money,
    criteria: AdditionalCriteria,
}

impl KeywordCollection {
    pub fn new(max_cpc: Money) -> Self {
        Self {
            max_cpc,
            ..Default::default()
        }
    }

    pub fn with_criteria(mut self, criteria: AdditionalCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// An empty collection with the same max CPC and criteria as `other`.
    pub fn empty_like(other: &KeywordCollection) -> Self {
        Self::new(other.max_cpc).with_criteria(other.criteria.clone())
    }

    pub fn max_cpc(&self) -> Money {
        self.max_cpc
    }

    pub fn criteria(&self) -> &AdditionalCriteria {
        &self.criteria
    }

    pub fn add_additional_criteria(&mut self, criteria: &AdditionalCriteria) {
        self.criteria.union(criteria);
    }

    /// Insert `info`, replacing any entry with the same key.
    pub fn add(&mut self, info: KeywordInfo) {
        let key = info.key();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos] = info,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(info);
            }
        }
    }

    pub fn add_all(&mut self, other: &KeywordCollection) {
        for info in &other.entries {
            self.add(info.clone());
        }
    }

    pub fn get(&self, key: &KeywordKey) -> Option<&KeywordInfo> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, key: &KeywordKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All members in insertion order.
    pub fn get_all(&self) -> &[KeywordInfo] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordInfo> {
        self.entries.iter()
    }

    pub fn keywords(&self) -> Vec<Keyword> {
        self.entries.iter().map(|i| i.keyword.clone()).collect()
    }

    /// Members ordered by descending score. The sort is stable, so ties keep insertion
    /// order; unscored members come last.
    pub fn list_sorted_by_score(&self) -> Vec<&KeywordInfo> {
        let mut sorted: Vec<&KeywordInfo> = self.entries.iter().collect();
        sorted.sort_by(|a, b| match (a.score, b.score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        sorted
    }

    /// A new collection holding the `n` best members (same max CPC and criteria).
    pub fn top_n(&self, n: usize) -> KeywordCollection {
        let mut top = KeywordCollection::empty_like(self);
        for info in self.list_sorted_by_score().into_iter().take(n) {
            top.add(info.clone());
        }
        top
    }

    pub fn best_score(&self) -> Option<f64> {
        self.entries
            .iter()
            .filter_map(|i| i.score)
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.entries.iter().filter_map(|i| i.score).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

impl<'a> IntoIterator for &'a KeywordCollection {
    type Item = &'a KeywordInfo;
    type IntoIter = std::slice::Iter<'a, KeywordInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MatchType, TrafficEstimate};

    fn scored(text: &str, score: f64) -> KeywordInfo {
        KeywordInfo::new(Keyword::new(text, MatchType::Exact))
            .with_evaluation(TrafficEstimate::default(), score)
    }

    fn unscored(text: &str) -> KeywordInfo {
        KeywordInfo::new(Keyword::new(text, MatchType::Exact))
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let mut c = KeywordCollection::new(Money::from_micros(1_000_000));
        c.add(scored("shoes", 1.0));
        c.add(scored("boots", 2.0));
        c.add(scored("shoes", 7.0));

        assert_eq!(c.len(), 2);
        let key = Keyword::new("shoes", MatchType::Exact).key();
        assert_eq!(c.get(&key).unwrap().score, Some(7.0));
        // Position of the first insert is kept.
        assert_eq!(c.get_all()[0].keyword.text, "shoes");
    }

    #[test]
    fn test_same_text_different_match_types_are_distinct() {
        let mut c = KeywordCollection::default();
        c.add(KeywordInfo::new(Keyword::new("shoes", MatchType::Exact)));
        c.add(KeywordInfo::new(Keyword::new("shoes", MatchType::Broad)));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_sorted_by_score_descending_ties_keep_insertion_order() {
        let mut c = KeywordCollection::default();
        c.add(scored("a", 1.0));
        c.add(scored("b", 5.0));
        c.add(scored("c", 3.0));
        c.add(scored("d", 5.0));
        c.add(unscored("e"));
        c.add(scored("f", 3.0));

        let order: Vec<&str> = c
            .list_sorted_by_score()
            .iter()
            .map(|i| i.keyword.text.as_str())
            .collect();
        assert_eq!(order, vec!["b", "d", "c", "f", "a", "e"]);

        let scores: Vec<f64> = c
            .list_sorted_by_score()
            .iter()
            .filter_map(|i| i.score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_top_n_keeps_ceiling_and_criteria() {
        let mut criteria = AdditionalCriteria::default();
        criteria.languages.insert(1000);
        let mut c = KeywordCollection::new(Money::from_micros(2_000_000)).with_criteria(criteria);
        c.add(scored("a", 1.0));
        c.add(scored("b", 3.0));
        c.add(scored("c", 2.0));

        let top = c.top_n(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top.max_cpc(), Money::from_micros(2_000_000));
        assert!(top.criteria().languages.contains(&1000));
        let texts: Vec<&str> = top.iter().map(|i| i.keyword.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_top_n_larger_than_collection() {
        let mut c = KeywordCollection::default();
        c.add(scored("a", 1.0));
        assert_eq!(c.top_n(10).len(), 1);
        assert!(c.top_n(0).is_empty());
    }

    #[test]
    fn test_add_all_merges_without_duplicates() {
        let mut a = KeywordCollection::default();
        a.add(scored("a", 1.0));
        let mut b = KeywordCollection::default();
        b.add(unscored("a"));
        b.add(unscored("b"));
        a.add_all(&b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_score_summaries() {
        let mut c = KeywordCollection::default();
        assert_eq!(c.best_score(), None);
        assert_eq!(c.average_score(), None);
        c.add(scored("a", 2.0));
        c.add(scored("b", 4.0));
        c.add(unscored("c"));
        assert_eq!(c.best_score(), Some(4.0));
        assert_eq!(c.average_score(), Some(3.0));
    }
}
