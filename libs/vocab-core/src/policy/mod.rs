//! Question type selection policies.

pub mod adaptive;
pub mod classic;

use crate::config::{PolicyKind, QuizSettings};
use crate::types::{PerformanceCounters, QuestionType, WordMasteryState};
use rand::{Rng, RngCore};

/// Chooses the question type for the next word and tracks per-type accuracy.
pub trait QuestionTypePolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Pick a question type for a word in the given state.
    fn choose(&self, state: WordMasteryState, rng: &mut dyn RngCore) -> QuestionType;

    /// Record an answered question, correct or not.
    fn update_performance(&mut self, question_type: QuestionType, correct: bool);

    /// Current counters, for persisting and display.
    fn counters(&self) -> &PerformanceCounters;

    /// Clear all counters.
    fn reset(&mut self);
}

/// Build the policy selected in settings, seeded with persisted counters.
pub fn get_policy(
    settings: &QuizSettings,
    counters: PerformanceCounters,
) -> Box<dyn QuestionTypePolicy> {
    match settings.policy {
        PolicyKind::Adaptive => Box::new(adaptive::AdaptiveDifficulty::with_counters(
            adaptive::AdaptiveParams::from(settings),
            counters,
        )),
        PolicyKind::Classic => Box::new(classic::Classic::with_counters(counters)),
    }
}

/// Partially seen words must be asked the type they have not passed yet.
fn forced_type(state: WordMasteryState) -> Option<QuestionType> {
    match state {
        WordMasteryState::SeenViaMultipleChoice => Some(QuestionType::FillInBlank),
        WordMasteryState::SeenViaFillIn => Some(QuestionType::MultipleChoice),
        WordMasteryState::Unseen | WordMasteryState::Mastered => None,
    }
}

/// Return `favoured` with probability `p`, otherwise the other type.
fn lean_towards(favoured: QuestionType, p: f64, rng: &mut dyn RngCore) -> QuestionType {
    if rng.gen_bool(p) {
        favoured
    } else {
        other(favoured)
    }
}

fn coin_flip(rng: &mut dyn RngCore) -> QuestionType {
    lean_towards(QuestionType::MultipleChoice, 0.5, rng)
}

fn other(question_type: QuestionType) -> QuestionType {
    match question_type {
        QuestionType::MultipleChoice => QuestionType::FillInBlank,
        QuestionType::FillInBlank => QuestionType::MultipleChoice,
    }
}
