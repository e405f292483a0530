//! Post-session summary and reflective insight
//!
//! When a session ends the core emits a [`SessionSummary`]. The host hands it
//! to an [`InsightProvider`] (a remote text model on the web build, or the
//! local [`ReflectiveInsight`]) and shows whatever comes back. Any failure
//! degrades to [`FALLBACK_INSIGHT`].

use serde::{Deserialize, Serialize};

use crate::sim::GameType;

/// Shown whenever the provider fails or returns nothing useful
pub const FALLBACK_INSIGHT: &str =
    "Failed to retrieve a neurocasual insight. Perhaps the system itself is pondering its own existence...";

/// Shown when the provider answers with an empty text
pub const EMPTY_INSIGHT: &str = "No insight generated. The system remains silent, observing...";

/// Instruction given to text-model providers alongside the prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a contemplative AI that provides philosophical observations on \
player interaction within a dynamic game system. Your insights are brief, thought-provoking, and reflect the \
adaptive nature of reality.";

/// Final statistics of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub game: GameType,
    pub score: f64,
    /// Percent, 0..=100
    pub accuracy: f64,
    pub average_click_ms: Option<f64>,
    pub rule_shifts_applied: u32,
    pub hit_count: u32,
    pub total_clicks: u32,
    pub elapsed_seconds: u32,
    /// Accuracy reached the rule set's threshold
    pub passed_threshold: bool,
}

/// Why no insight text was produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsightError {
    #[error("Insight provider unavailable")]
    Unavailable,
    #[error("Insight provider failed: {0}")]
    Provider(String),
    #[error("Insight provider returned no text")]
    Empty,
}

/// Asynchronous insight source. `on_done` is called exactly once.
pub trait InsightProvider {
    fn request(&self, summary: SessionSummary, on_done: Box<dyn FnOnce(Result<String, InsightError>)>);
}

/// Prompt sent to text-model providers
pub fn build_prompt(summary: &SessionSummary) -> String {
    let speed = summary
        .average_click_ms
        .map(|ms| format!("{:.2} ms", ms))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Analyze the following player performance from a neurocasual game ({game}) and provide a concise, \
philosophical insight or reflection (2-3 sentences max).\n\
Player Stats:\n\
- Score: {score:.0}\n\
- Accuracy: {accuracy:.2}%\n\
- Average Click Speed: {speed}\n\
- Rule Shifts Encountered: {shifts}\n\n\
Focus on the interplay between their actions, the game's adaptation, and the transient nature of rules.",
        game = summary.game.as_str(),
        score = summary.score,
        accuracy = summary.accuracy,
        speed = speed,
        shifts = summary.rule_shifts_applied,
    )
}

/// Text to show for a provider result
pub fn resolve(result: Result<String, InsightError>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_INSIGHT.to_string(),
        Err(e) => {
            log::warn!("Insight request failed: {}", e);
            FALLBACK_INSIGHT.to_string()
        }
    }
}

/// Offline provider: a short reflection picked from the stats
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectiveInsight;

impl ReflectiveInsight {
    pub fn reflect(summary: &SessionSummary) -> String {
        let adaptation = match summary.rule_shifts_applied {
            0 => "The rules held still, and so did the question of who was adapting to whom.",
            1..=3 => "The rules moved beneath you a few times; some of your answers moved with them.",
            _ => "The rules kept dissolving, and you kept finding the edges of new ones.",
        };
        let precision = if summary.total_clicks == 0 {
            "Stillness is also a choice."
        } else if summary.passed_threshold {
            "Your precision suggests attention that did not cling to the old pattern."
        } else {
            "Each miss was the system showing you a rule you had not yet noticed."
        };
        format!("{} {}", adaptation, precision)
    }
}

impl InsightProvider for ReflectiveInsight {
    fn request(&self, summary: SessionSummary, on_done: Box<dyn FnOnce(Result<String, InsightError>)>) {
        on_done(Ok(Self::reflect(&summary)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn summary() -> SessionSummary {
        SessionSummary {
            game: GameType::Flux,
            score: 120.0,
            accuracy: 87.5,
            average_click_ms: Some(412.5),
            rule_shifts_applied: 5,
            hit_count: 7,
            total_clicks: 8,
            elapsed_seconds: 90,
            passed_threshold: true,
        }
    }

    #[test]
    fn test_prompt_contains_stats() {
        let prompt = build_prompt(&summary());
        assert!(prompt.contains("Score: 120"));
        assert!(prompt.contains("Accuracy: 87.50%"));
        assert!(prompt.contains("Average Click Speed: 412.50 ms"));
        assert!(prompt.contains("Rule Shifts Encountered: 5"));
    }

    #[test]
    fn test_prompt_without_clicks() {
        let s = SessionSummary {
            average_click_ms: None,
            ..summary()
        };
        assert!(build_prompt(&s).contains("Average Click Speed: N/A"));
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(resolve(Err(InsightError::Unavailable)), FALLBACK_INSIGHT);
        assert_eq!(resolve(Err(InsightError::Provider("timeout".into()))), FALLBACK_INSIGHT);
        assert_eq!(resolve(Ok("   ".into())), EMPTY_INSIGHT);
        assert_eq!(resolve(Ok(" Be still. ".into())), "Be still.");
    }

    #[test]
    fn test_local_provider_completes_once() {
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&out);
        ReflectiveInsight.request(
            summary(),
            Box::new(move |result| sink.borrow_mut().push(resolve(result))),
        );
        let out = out.borrow();
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_empty());
        assert_ne!(out[0], FALLBACK_INSIGHT);
    }
}
