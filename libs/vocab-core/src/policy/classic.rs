//! Fixed question type selection: forced types for partially seen words,
//! a coin flip otherwise. Counters are recorded but never consulted.

use super::{coin_flip, forced_type, QuestionTypePolicy};
use crate::types::{PerformanceCounters, QuestionType, WordMasteryState};
use rand::RngCore;

#[derive(Debug, Clone, Default)]
pub struct Classic {
    counters: PerformanceCounters,
}

impl Classic {
    pub fn with_counters(counters: PerformanceCounters) -> Self {
        Self { counters }
    }
}

impl QuestionTypePolicy for Classic {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn choose(&self, state: WordMasteryState, rng: &mut dyn RngCore) -> QuestionType {
        forced_type(state).unwrap_or_else(|| coin_flip(rng))
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

    #[test]
    fn ignores_accuracy() {
        let mut policy = Classic::default();
        for _ in 0..20 {
            policy.update_performance(QuestionType::MultipleChoice, true);
            policy.update_performance(QuestionType::FillInBlank, true);
        }

        let mut rng = StdRng::seed_from_u64(5);
        let fill = (0..2000)
            .filter(|_| policy.choose(WordMasteryState::Unseen, &mut rng) == QuestionType::FillInBlank)
            .count();
        assert!((900..=1100).contains(&fill));
    }

    #[test]
    fn forced_types() {
        let policy = Classic::default();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            policy.choose(WordMasteryState::SeenViaMultipleChoice, &mut rng),
            QuestionType::FillInBlank
        );
        assert_eq!(
            policy.choose(WordMasteryState::SeenViaFillIn, &mut rng),
            QuestionType::MultipleChoice
        );
    }
}
