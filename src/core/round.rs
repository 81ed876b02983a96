// src/core/round.rs — Round strategies (reduce the evaluated set, decide when to stop)

use std::fmt;
use std::sync::Mutex;

use super::collection::KeywordCollection;
use crate::infra::config::RoundStrategyConfig;
use crate::infra::errors::{KeywordOptimizerError, Result};

/// What a strategy decided at the end of a round. Both variants carry the reduced set.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundDecision {
    Continue(KeywordCollection),
    Done(KeywordCollection),
}

impl RoundDecision {
    pub fn keywords(&self) -> &KeywordCollection {
        match self {
            RoundDecision::Continue(k) | RoundDecision::Done(k) => k,
        }
    }

    pub fn into_keywords(self) -> KeywordCollection {
        match self {
            RoundDecision::Continue(k) | RoundDecision::Done(k) => k,
        }
    }

    pub fn outcome(&self) -> RoundOutcome {
        match self {
            RoundDecision::Continue(_) => RoundOutcome::Continue,
            RoundDecision::Done(_) => RoundOutcome::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue,
    Done,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOutcome::Continue => write!(f, "continue"),
            RoundOutcome::Done => write!(f, "done"),
        }
    }
}

/// Decides how many of the best keywords survive a round and whether to go on.
///
/// `round` is zero-based. Implementations must be deterministic and must eventually
/// answer `Done`.
pub trait RoundStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn next_round(&self, keywords: &KeywordCollection, round: u32) -> RoundDecision;
}

/// Keeps the top `keep_top` keywords for exactly `max_rounds` rounds.
#[derive(Debug, Clone)]
pub struct FixedRoundStrategy {
    max_rounds: u32,
    keep_top: usize,
}

impl FixedRoundStrategy {
    pub fn new(max_rounds: u32, keep_top: usize) -> Result<Self> {
        if max_rounds == 0 {
            return Err(KeywordOptimizerError::Configuration(
                "round_strategy.max_rounds must be at least 1".into(),
            ));
        }
        if keep_top == 0 {
            return Err(KeywordOptimizerError::Configuration(
                "round_strategy.keep_top must be at least 1".into(),
            ));
        }
        Ok(Self {
            max_rounds,
            keep_top,
        })
    }

    pub fn from_config(config: &RoundStrategyConfig) -> Result<Self> {
        Self::new(config.max_rounds, config.keep_top)
    }

    fn is_last_round(&self, round: u32) -> bool {
        round.saturating_add(1) >= self.max_rounds
    }
}

impl RoundStrategy for FixedRoundStrategy {
    fn name(&self) -> &str {
        "fixed-rounds"
    }

    fn next_round(&self, keywords: &KeywordCollection, round: u32) -> RoundDecision {
        let reduced = keywords.top_n(self.keep_top);
        if self.is_last_round(round) {
            RoundDecision::Done(reduced)
        } else {
            RoundDecision::Continue(reduced)
        }
    }
}

/// Like [`FixedRoundStrategy`], but also stops as soon as the average score of the
/// surviving keywords improves by less than `min_improvement` over the previous round.
#[derive(Debug)]
pub struct ImprovementRoundStrategy {
    rounds: FixedRoundStrategy,
    min_improvement: f64,
    previous_average: Mutex<Option<f64>>,
}

impl ImprovementRoundStrategy {
    pub fn new(max_rounds: u32, keep_top: usize, min_improvement: f64) -> Result<Self> {
        if !min_improvement.is_finite() {
            return Err(KeywordOptimizerError::Configuration(
                "round_strategy.min_improvement must be a finite number".into(),
            ));
        }
        Ok(Self {
            rounds: FixedRoundStrategy::new(max_rounds, keep_top)?,
            min_improvement,
            previous_average: Mutex::new(None),
        })
    }

    pub fn from_config(config: &RoundStrategyConfig) -> Result<Self> {
        Self::new(config.max_rounds, config.keep_top, config.min_improvement)
    }
}

impl RoundStrategy for ImprovementRoundStrategy {
    fn name(&self) -> &str {
        "improvement"
    }

    fn next_round(&self, keywords: &KeywordCollection, round: u32) -> RoundDecision {
        let reduced = keywords.top_n(self.rounds.keep_top);
        let average = reduced.average_score();

        let previous = {
            let mut slot = self
                .previous_average
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if round == 0 {
                *slot = None;
            }
            std::mem::replace(&mut *slot, average)
        };

        let stalled = match (previous, average) {
            (Some(before), Some(now)) => now - before < self.min_improvement,
            _ => false,
        };

        if stalled {
            tracing::info!(
                round,
                previous = ?previous,
                average = ?average,
                "Average score stopped improving"
            );
        }

        if stalled || self.rounds.is_last_round(round) {
            RoundDecision::Done(reduced)
        } else {
            RoundDecision::Continue(reduced)
        }
    }
}
