// src/cli/progress.rs — Terminal progress renderer for a running optimization

use crate::core::optimizer::ProgressEvent;

fn score(best: Option<f64>) -> String {
    best.map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "-".to_string())
}

/// One line of progress text per event.
pub fn format_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::SeedReady {
            keywords,
            best_score,
        } => format!(
            "[seed] {} keyword(s), best score {}",
            keywords,
            score(*best_score)
        ),
        ProgressEvent::RoundStart { round, keywords } => {
            format!("[round {}] expanding {} keyword(s)...", round, keywords)
        }
        ProgressEvent::AlternativesFound {
            round,
            alternatives,
        } => format!("[round {}]   {} alternative(s) found", round, alternatives),
        ProgressEvent::RoundEnd {
            round,
            candidates,
            kept,
            best_score,
            decision,
        } => format!(
            "[round {}] kept {}/{} best={} -> {}",
            round,
            kept,
            candidates,
            score(*best_score),
            decision
        ),
        ProgressEvent::Complete {
            rounds,
            keywords,
            best_score,
        } => format!(
            "[done] {} keyword(s) after {} round(s), best score {}",
            keywords,
            rounds,
            score(*best_score)
        ),
    }
}

/// Build a progress callback that writes to stderr, keeping stdout for results.
pub fn terminal_progress() -> impl Fn(ProgressEvent) + Send + Sync + 'static {
    move |event| eprintln!("{}", format_event(&event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round::RoundOutcome;
    use std::sync::{Arc, Mutex};

    fn capturing_progress() -> (
        impl Fn(ProgressEvent) + Send + Sync + 'static,
        Arc<Mutex<Vec<String>>>,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let cb = move |event: ProgressEvent| {
            log_clone.lock().unwrap().push(format_event(&event));
        };
        (cb, log)
    }

    #[test]
    fn test_seed_ready_format() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::SeedReady {
            keywords: 4,
            best_score: Some(12.5),
        });
        assert_eq!(log.lock().unwrap()[0], "[seed] 4 keyword(s), best score 12.50");
    }

    #[test]
    fn test_round_end_format() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::RoundEnd {
            round: 2,
            candidates: 40,
            kept: 20,
            best_score: Some(3.0),
            decision: RoundOutcome::Continue,
        });
        assert_eq!(log.lock().unwrap()[0], "[round 2] kept 20/40 best=3.00 -> continue");
    }

    #[test]
    fn test_unscored_shows_dash() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::Complete {
            rounds: 1,
            keywords: 0,
            best_score: None,
        });
        assert_eq!(
            log.lock().unwrap()[0],
            "[done] 0 keyword(s) after 1 round(s), best score -"
        );
    }

    #[test]
    fn test_full_lifecycle_sequence() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::SeedReady {
            keywords: 1,
            best_score: Some(10.0),
        });
        cb(ProgressEvent::RoundStart {
            round: 1,
            keywords: 1,
        });
        cb(ProgressEvent::AlternativesFound {
            round: 1,
            alternatives: 2,
        });
        cb(ProgressEvent::RoundEnd {
            round: 1,
            candidates: 3,
            kept: 2,
            best_score: Some(30.0),
            decision: RoundOutcome::Done,
        });
        cb(ProgressEvent::Complete {
            rounds: 1,
            keywords: 2,
            best_score: Some(30.0),
        });

        let msgs = log.lock().unwrap();
        assert_eq!(msgs.len(), 5);
        assert!(msgs[0].starts_with("[seed]"));
        assert!(msgs[1].starts_with("[round 1]"));
        assert!(msgs[2].contains("2 alternative(s)"));
        assert!(msgs[3].ends_with("-> done"));
        assert!(msgs[4].starts_with("[done]"));
    }
}
