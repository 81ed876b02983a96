// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::infra::errors::KeywordOptimizerError;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// How literally a keyword has to match a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::Exact, MatchType::Phrase, MatchType::Broad];
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Exact => write!(f, "EXACT"),
            MatchType::Phrase => write!(f, "PHRASE"),
            MatchType::Broad => write!(f, "BROAD"),
        }
    }
}

impl FromStr for MatchType {
    type Err = KeywordOptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXACT" => Ok(MatchType::Exact),
            "PHRASE" => Ok(MatchType::Phrase),
            "BROAD" => Ok(MatchType::Broad),
            other => Err(KeywordOptimizerError::Validation(format!(
                "Unknown match type '{}' (expected EXACT, PHRASE or BROAD)",
                other
            ))),
        }
    }
}

/// An amount of money in micros (1 unit = 1,000,000 micros).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_micros(micros: i64) -> Self {
        Money(micros)
    }

    /// Convert a decimal amount (e.g. a CPC of `5.0` for $5) into micros.
    pub fn from_units(amount: f64) -> Result<Self, KeywordOptimizerError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(KeywordOptimizerError::Validation(format!(
                "Invalid amount '{}': must be a non-negative number",
                amount
            )));
        }
        Ok(Money((amount * MICROS_PER_UNIT) as i64))
    }

    pub fn micros(&self) -> i64 {
        self.0
    }

    pub fn units(&self) -> f64 {
        self.0 as f64 / MICROS_PER_UNIT
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.units())
    }
}

impl FromStr for Money {
    type Err = KeywordOptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s.trim().parse().map_err(|_| {
            KeywordOptimizerError::Validation(format!("Invalid amount '{}'", s.trim()))
        })?;
        Money::from_units(amount)
    }
}

/// Identity of a collection entry: the same text under two match types is two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeywordKey {
    pub text: String,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub match_type: MatchType,
}

impl Keyword {
    pub fn new(text: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            text: text.into(),
            match_type,
        }
    }

    pub fn key(&self) -> KeywordKey {
        KeywordKey {
            text: self.text.clone(),
            match_type: self.match_type,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.text, self.match_type)
    }
}

/// Per-day traffic figures. The remote service may leave any of them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficMetrics {
    pub impressions_per_day: Option<f64>,
    pub clicks_per_day: Option<f64>,
    pub click_through_rate: Option<f64>,
    pub average_position: Option<f64>,
    pub average_cpc: Option<Money>,
    pub total_cost: Option<Money>,
}

fn mean_f64(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? + b?) / 2.0)
}

fn mean_money(a: Option<Money>, b: Option<Money>) -> Option<Money> {
    Some(Money::from_micros((a?.micros() + b?.micros()) / 2))
}

impl TrafficMetrics {
    /// Field-wise mean; a field is only present when both sides have it.
    pub fn mean_of(a: &TrafficMetrics, b: &TrafficMetrics) -> TrafficMetrics {
        TrafficMetrics {
            impressions_per_day: mean_f64(a.impressions_per_day, b.impressions_per_day),
            clicks_per_day: mean_f64(a.clicks_per_day, b.clicks_per_day),
            click_through_rate: mean_f64(a.click_through_rate, b.click_through_rate),
            average_position: mean_f64(a.average_position, b.average_position),
            average_cpc: mean_money(a.average_cpc, b.average_cpc),
            total_cost: mean_money(a.total_cost, b.total_cost),
        }
    }
}

/// Min / mean / max traffic of one keyword under a max CPC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficEstimate {
    pub min: TrafficMetrics,
    pub mean: TrafficMetrics,
    pub max: TrafficMetrics,
}

impl TrafficEstimate {
    pub fn from_min_max(min: TrafficMetrics, max: TrafficMetrics) -> Self {
        let mean = TrafficMetrics::mean_of(&min, &max);
        Self { min, mean, max }
    }
}

/// A candidate keyword with its (optional) evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordInfo {
    pub keyword: Keyword,
    pub estimate: Option<TrafficEstimate>,
    pub score: Option<f64>,
}

impl KeywordInfo {
    pub fn new(keyword: Keyword) -> Self {
        Self {
            keyword,
            estimate: None,
            score: None,
        }
    }

    /// A copy carrying the given estimate and score. Both are always replaced together.
    pub fn with_evaluation(&self, estimate: TrafficEstimate, score: f64) -> Self {
        Self {
            keyword: self.keyword.clone(),
            estimate: Some(estimate),
            score: Some(score),
        }
    }

    pub fn key(&self) -> KeywordKey {
        self.keyword.key()
    }

    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }
}

impl fmt::Display for KeywordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword)?;
        if let Some(score) = self.score {
            write!(f, " score={:.3}", score)?;
        }
        if let Some(ref estimate) = self.estimate {
            let m = &estimate.mean;
            if let Some(impressions) = m.impressions_per_day {
                write!(f, " impressions/day={:.1}", impressions)?;
            }
            if let Some(clicks) = m.clicks_per_day {
                write!(f, " clicks/day={:.1}", clicks)?;
            }
            if let Some(ctr) = m.click_through_rate {
                write!(f, " ctr={:.3}", ctr)?;
            }
            if let Some(cpc) = m.average_cpc {
                write!(f, " cpc={}", cpc)?;
            }
            if let Some(cost) = m.total_cost {
                write!(f, " cost/day={}", cost)?;
            }
        }
        Ok(())
    }
}

/// Targeting criteria shared by every keyword of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCriteria {
    pub locations: BTreeSet<i64>,
    pub languages: BTreeSet<i64>,
    /// Extra search parameters passed through to the remote services (`key=value`).
    pub parameters: BTreeSet<String>,
}

impl AdditionalCriteria {
    pub fn union(&mut self, other: &AdditionalCriteria) {
        self.locations.extend(other.locations.iter().copied());
        self.languages.extend(other.languages.iter().copied());
        self.parameters.extend(other.parameters.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.languages.is_empty() && self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_parse_case_insensitive() {
        assert_eq!("exact".parse::<MatchType>().unwrap(), MatchType::Exact);
        assert_eq!(" Phrase ".parse::<MatchType>().unwrap(), MatchType::Phrase);
        assert_eq!("BROAD".parse::<MatchType>().unwrap(), MatchType::Broad);
    }

    #[test]
    fn test_match_type_parse_rejects_unknown() {
        let err = "fuzzy".parse::<MatchType>().unwrap_err();
        assert!(matches!(err, KeywordOptimizerError::Validation(_)));
    }

    #[test]
    fn test_money_from_units() {
        assert_eq!(Money::from_units(5.0).unwrap().micros(), 5_000_000);
        assert_eq!("0.25".parse::<Money>().unwrap().micros(), 250_000);
        assert_eq!(Money::from_micros(1_500_000).to_string(), "1.50");
    }

    #[test]
    fn test_money_rejects_invalid() {
        assert!(Money::from_units(-1.0).is_err());
        assert!(Money::from_units(f64::NAN).is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_keys_differ_by_match_type() {
        let exact = Keyword::new("shoes", MatchType::Exact);
        let broad = Keyword::new("shoes", MatchType::Broad);
        assert_ne!(exact.key(), broad.key());
        assert_eq!(exact.key(), Keyword::new("shoes", MatchType::Exact).key());
    }

    #[test]
    fn test_estimate_mean_requires_both_sides() {
        let min = TrafficMetrics {
            clicks_per_day: Some(2.0),
            impressions_per_day: Some(100.0),
            total_cost: Some(Money::from_micros(1_000_000)),
            ..Default::default()
        };
        let max = TrafficMetrics {
            clicks_per_day: Some(4.0),
            total_cost: Some(Money::from_micros(3_000_000)),
            ..Default::default()
        };
        let estimate = TrafficEstimate::from_min_max(min, max);
        assert_eq!(estimate.mean.clicks_per_day, Some(3.0));
        assert_eq!(estimate.mean.total_cost, Some(Money::from_micros(2_000_000)));
        assert_eq!(estimate.mean.impressions_per_day, None);
    }

    #[test]
    fn test_with_evaluation_sets_both() {
        let info = KeywordInfo::new(Keyword::new("shoes", MatchType::Exact));
        assert!(!info.is_evaluated());
        let evaluated = info.with_evaluation(TrafficEstimate::default(), 4.5);
        assert_eq!(evaluated.score, Some(4.5));
        assert!(evaluated.estimate.is_some());
        assert_eq!(evaluated.keyword, info.keyword);
    }

    #[test]
    fn test_criteria_union() {
        let mut a = AdditionalCriteria::default();
        a.locations.insert(2840);
        let mut b = AdditionalCriteria::default();
        b.locations.insert(2840);
        b.languages.insert(1000);
        a.union(&b);
        assert_eq!(a.locations.len(), 1);
        assert_eq!(a.languages.len(), 1);
        assert!(!a.is_empty());
    }
}
