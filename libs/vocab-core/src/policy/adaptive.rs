//! Accuracy-driven question type selection.
//!
//! Until both question types have enough attempts the choice is a coin flip.
//! Afterwards, a learner who excels at multiple choice is pushed towards
//! fill-in-blank, and one who struggles with fill-in-blank is eased back to
//! multiple choice. This is a heuristic, not a bandit.

use super::{coin_flip, forced_type, lean_towards, QuestionTypePolicy};
use crate::config::QuizSettings;
use crate::types::{PerformanceCounters, QuestionType, WordMasteryState};
use rand::RngCore;
use tracing::trace;

/// Thresholds for the adaptive policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveParams {
    pub min_attempts: u32,
    pub high_accuracy: f64,
    pub low_accuracy: f64,
    pub bias_probability: f64,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self::from(&QuizSettings::default())
    }
}

impl From<&QuizSettings> for AdaptiveParams {
    fn from(settings: &QuizSettings) -> Self {
        Self {
            min_attempts: settings.min_attempts,
            high_accuracy: settings.high_accuracy_threshold,
            low_accuracy: settings.low_accuracy_threshold,
            bias_probability: settings.bias_probability,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdaptiveDifficulty {
    params: AdaptiveParams,
    counters: PerformanceCounters,
}

impl AdaptiveDifficulty {
    pub fn new(params: AdaptiveParams) -> Self {
        Self::with_counters(params, PerformanceCounters::default())
    }

    pub fn with_counters(params: AdaptiveParams, counters: PerformanceCounters) -> Self {
        Self { params, counters }
    }

    fn has_enough_data(&self) -> bool {
        self.counters.multiple_choice.attempts >= self.params.min_attempts
            && self.counters.fill_in_blank.attempts >= self.params.min_attempts
    }
}

impl QuestionTypePolicy for AdaptiveDifficulty {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn choose(&self, state: WordMasteryState, rng: &mut dyn RngCore) -> QuestionType {
        if let Some(question_type) = forced_type(state) {
            return question_type;
        }

        if !self.has_enough_data() {
            return coin_flip(rng);
        }

        let mc_accuracy = self.counters.multiple_choice.accuracy();
        let fill_accuracy = self.counters.fill_in_blank.accuracy();
        trace!(mc_accuracy, fill_accuracy, "adaptive choice");

        if mc_accuracy > self.params.high_accuracy {
            lean_towards(QuestionType::FillInBlank, self.params.bias_probability, rng)
        } else if fill_accuracy < self.params.low_accuracy {
            lean_towards(QuestionType::MultipleChoice, self.params.bias_probability, rng)
        } else {
            coin_flip(rng)
        }
    }

    fn update_performance(&mut self, question_type: QuestionType, correct: bool) {
        self.counters.record(question_type, correct);
    }

    fn counters(&self) -> &PerformanceCounters {
        &self.counters
    }

    fn reset(&mut self) {
        self.counters = PerformanceCounters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn policy_with(mc: (u32, u32), fill: (u32, u32)) -> AdaptiveDifficulty {
        let mut policy = AdaptiveDifficulty::new(AdaptiveParams::default());
        for i in 0..mc.0 {
            policy.update_performance(QuestionType::MultipleChoice, i < mc.1);
        }
        for i in 0..fill.0 {
            policy.update_performance(QuestionType::FillInBlank, i < fill.1);
        }
        policy
    }

    fn count_fill_in(policy: &AdaptiveDifficulty, state: WordMasteryState, trials: usize) -> usize {
        let mut rng = StdRng::seed_from_u64(2024);
        (0..trials)
            .filter(|_| policy.choose(state, &mut rng) == QuestionType::FillInBlank)
            .count()
    }

    #[test]
    fn seen_via_multiple_choice_always_gets_fill_in() {
        let policy = policy_with((10, 10), (10, 10));
        assert_eq!(count_fill_in(&policy, WordMasteryState::SeenViaMultipleChoice, 100), 100);
    }

    #[test]
    fn seen_via_fill_in_always_gets_multiple_choice() {
        let policy = policy_with((10, 0), (10, 0));
        assert_eq!(count_fill_in(&policy, WordMasteryState::SeenViaFillIn, 100), 0);
    }

    #[test]
    fn coin_flip_below_threshold() {
        // Multiple choice is perfect but fill-in has too few attempts
        let policy = policy_with((10, 10), (4, 0));
        let fill = count_fill_in(&policy, WordMasteryState::Unseen, 2000);
        assert!((900..=1100).contains(&fill), "fill-in picks: {fill}");
    }

    #[test]
    fn excelling_at_multiple_choice_favours_fill_in() {
        let policy = policy_with((10, 10), (5, 5));
        let fill = count_fill_in(&policy, WordMasteryState::Unseen, 100);
        assert!(fill > 100 - fill, "fill-in picks: {fill}");

        let fill = count_fill_in(&policy, WordMasteryState::Unseen, 2000);
        assert!((1300..=1500).contains(&fill), "fill-in picks: {fill}");
    }

    #[test]
    fn struggling_with_fill_in_favours_multiple_choice() {
        let policy = policy_with((10, 6), (10, 2));
        let fill = count_fill_in(&policy, WordMasteryState::Mastered, 2000);
        assert!((500..=700).contains(&fill), "fill-in picks: {fill}");
    }

    #[test]
    fn balanced_performance_is_even() {
        let policy = policy_with((10, 7), (10, 7));
        let fill = count_fill_in(&policy, WordMasteryState::Unseen, 2000);
        assert!((900..=1100).contains(&fill), "fill-in picks: {fill}");
    }

    #[test]
    fn update_performance_tracks_accuracy() {
        let mut policy = policy_with((0, 0), (0, 0));
        policy.update_performance(QuestionType::MultipleChoice, true);
        policy.update_performance(QuestionType::MultipleChoice, false);
        policy.update_performance(QuestionType::FillInBlank, false);

        let counters = policy.counters();
        assert_eq!(counters.multiple_choice.attempts, 2);
        assert_eq!(counters.multiple_choice.accuracy(), 0.5);
        assert_eq!(counters.fill_in_blank.accuracy(), 0.0);

        policy.reset();
        assert_eq!(*policy.counters(), PerformanceCounters::default());
    }
}
