// src/core/optimizer.rs — Round loop: seed, then expand / evaluate / reduce until done

use std::time::Instant;

use super::collection::KeywordCollection;
use super::round::{RoundDecision, RoundOutcome, RoundStrategy};
use crate::alternatives::AlternativesFinder;
use crate::evaluator::Evaluator;
use crate::infra::errors::Result;
use crate::seed::SeedGenerator;

/// Upper bound on rounds regardless of what the strategy answers.
pub const HARD_ROUND_LIMIT: u32 = 1000;

/// Lifecycle notifications for a running optimization. Rounds are 1-based here.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    SeedReady {
        keywords: usize,
        best_score: Option<f64>,
    },
    RoundStart {
        round: u32,
        keywords: usize,
    },
    AlternativesFound {
        round: u32,
        alternatives: usize,
    },
    RoundEnd {
        round: u32,
        candidates: usize,
        kept: usize,
        best_score: Option<f64>,
        decision: RoundOutcome,
    },
    Complete {
        rounds: u32,
        keywords: usize,
        best_score: Option<f64>,
    },
}

/// Drives one optimization run. Rounds run strictly one after another, and any error
/// from a collaborator aborts the run.
pub struct Optimizer {
    seed: SeedGenerator,
    finder: Box<dyn AlternativesFinder>,
    evaluator: Box<dyn Evaluator>,
    strategy: Box<dyn RoundStrategy>,
    on_progress: Option<Box<dyn Fn(ProgressEvent) + Send + Sync>>,
}

impl Optimizer {
    pub fn new(
        seed: SeedGenerator,
        finder: Box<dyn AlternativesFinder>,
        evaluator: Box<dyn Evaluator>,
        strategy: Box<dyn RoundStrategy>,
    ) -> Self {
        Self {
            seed,
            finder,
            evaluator,
            strategy,
            on_progress: None,
        }
    }

    /// Set a callback for progress events.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Run the full loop and return the final, evaluated keyword set.
    pub async fn optimize(&self) -> Result<KeywordCollection> {
        let start = Instant::now();

        // 1. Seed
        let seed = self.seed.generate().await?;
        let mut current = self.evaluator.evaluate(&seed).await?;
        tracing::info!(
            keywords = current.len(),
            best = ?current.best_score(),
            "Seed keywords evaluated"
        );
        self.emit(ProgressEvent::SeedReady {
            keywords: current.len(),
            best_score: current.best_score(),
        });

        // 2. Rounds
        let mut round: u32 = 0;
        let result = loop {
            self.emit(ProgressEvent::RoundStart {
                round: round + 1,
                keywords: current.len(),
            });

            let alternatives = self.finder.find(&current).await?;
            self.emit(ProgressEvent::AlternativesFound {
                round: round + 1,
                alternatives: alternatives.len(),
            });

            let mut merged = current;
            for info in &alternatives {
                if !merged.contains(&info.key()) {
                    merged.add(info.clone());
                }
            }

            let evaluated = self.evaluator.evaluate(&merged).await?;
            let decision = self.strategy.next_round(&evaluated, round);

            tracing::info!(
                round = round + 1,
                strategy = self.strategy.name(),
                candidates = evaluated.len(),
                kept = decision.keywords().len(),
                decision = %decision.outcome(),
                "Round finished"
            );
            self.emit(ProgressEvent::RoundEnd {
                round: round + 1,
                candidates: evaluated.len(),
                kept: decision.keywords().len(),
                best_score: decision.keywords().best_score(),
                decision: decision.outcome(),
            });

            round += 1;
            match decision {
                RoundDecision::Done(keywords) => break keywords,
                RoundDecision::Continue(keywords) if round >= HARD_ROUND_LIMIT => {
                    tracing::warn!(
                        rounds = round,
                        strategy = self.strategy.name(),
                        "Round limit reached before the strategy finished"
                    );
                    break keywords;
                }
                RoundDecision::Continue(keywords) => current = keywords,
            }
        };

        tracing::info!(
            rounds = round,
            keywords = result.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Optimization complete"
        );
        self.emit(ProgressEvent::Complete {
            rounds: round,
            keywords: result.len(),
            best_score: result.best_score(),
        });

        Ok(result)
    }
}
