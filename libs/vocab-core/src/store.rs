//! Boundaries to word data and durable progress, plus an in-memory store.

use crate::error::StoreError;
use crate::types::{
    BestScore, GlobalStats, ListLevelProgress, PerformanceCounters, ScoreCard, UserProgress,
    VocabularyWord, WordMasteryState, WordProgress,
};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only source of level word pools.
pub trait WordPoolProvider {
    /// Words of a level in their stored order; empty when the list or level
    /// is unknown.
    fn get_words(&self, list_id: &str, level_id: &str) -> Vec<VocabularyWord>;
}

/// One answered question, as written to the store.
#[derive(Debug, Clone, Copy)]
pub struct WordAttempt<'a> {
    pub word_id: &'a str,
    pub list_id: &'a str,
    pub level_id: &'a str,
    /// State after the answer; unchanged on wrong answers.
    pub new_state: WordMasteryState,
    pub was_correct: bool,
    pub hint_used: bool,
}

/// Durable progress the quiz engine reads and writes.
pub trait ProgressStore {
    /// Stored mastery for a word, `Unseen` if never recorded.
    fn word_mastery_state(&self, word_id: &str) -> StoreResult<WordMasteryState>;

    /// Upsert the word's state and record the attempt, even when the state
    /// did not change.
    fn set_word_mastery_state(&mut self, attempt: &WordAttempt<'_>) -> StoreResult<()>;

    fn best_score(&self, list_id: &str, level_id: &str) -> StoreResult<Option<BestScore>>;

    /// Replace the best score if `score` beats it. Returns whether it did.
    fn set_best_score_if_better(
        &mut self,
        list_id: &str,
        level_id: &str,
        score: ScoreCard,
    ) -> StoreResult<bool>;

    fn increment_all_time_stats(&mut self, hints: u32, wrong: u32, correct: u32) -> StoreResult<()>;

    /// Persisted question type counters.
    fn performance_counters(&self) -> StoreResult<PerformanceCounters>;

    fn set_performance_counters(&mut self, counters: &PerformanceCounters) -> StoreResult<()>;

    /// Record how many words a level holds, so completion is judged against
    /// the whole pool rather than the words answered so far.
    fn set_level_word_count(
        &mut self,
        list_id: &str,
        level_id: &str,
        word_count: usize,
    ) -> StoreResult<()>;
}

fn level_key(list_id: &str, level_id: &str) -> String {
    format!("{list_id}-{level_id}")
}

/// Progress store backed by a [`UserProgress`] snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    progress: UserProgress,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a previously taken snapshot.
    pub fn from_snapshot(progress: UserProgress) -> Self {
        Self { progress }
    }

    pub fn snapshot(&self) -> &UserProgress {
        &self.progress
    }

    pub fn into_snapshot(self) -> UserProgress {
        self.progress
    }

    pub fn global_stats(&self) -> &GlobalStats {
        &self.progress.global
    }

    /// First record found for the word across all levels.
    pub fn word_progress(&self, word_id: &str) -> Option<&WordProgress> {
        self.progress
            .levels
            .values()
            .find_map(|level| level.words.get(word_id))
    }

    pub fn level_progress(&self, list_id: &str, level_id: &str) -> Option<&ListLevelProgress> {
        self.progress.levels.get(&level_key(list_id, level_id))
    }

    /// Percentage of the level's words that are mastered.
    pub fn level_completion_percent(&self, list_id: &str, level_id: &str) -> f64 {
        match self.level_progress(list_id, level_id) {
            Some(level) if level.total_words() > 0 => {
                level.mastered_count() as f64 / level.total_words() as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    /// Percentage of mastered words across the list's tracked levels.
    pub fn list_completion_percent(&self, list_id: &str) -> f64 {
        let (total, mastered) = self
            .levels_of(list_id)
            .fold((0, 0), |(total, mastered), level| {
                (total + level.total_words(), mastered + level.mastered_count())
            });

        if total == 0 {
            0.0
        } else {
            mastered as f64 / total as f64 * 100.0
        }
    }

    pub fn is_level_completed(&self, list_id: &str, level_id: &str) -> bool {
        self.level_progress(list_id, level_id)
            .is_some_and(ListLevelProgress::is_fully_mastered)
    }

    pub fn is_list_completed(&self, list_id: &str) -> bool {
        let mut levels = self.levels_of(list_id).peekable();
        levels.peek().is_some() && levels.all(ListLevelProgress::is_fully_mastered)
    }

    pub fn total_words_learned(&self) -> usize {
        self.progress.total_words_learned()
    }

    pub fn word_states_for_level(
        &self,
        list_id: &str,
        level_id: &str,
    ) -> BTreeMap<String, WordMasteryState> {
        self.level_progress(list_id, level_id)
            .map(|level| {
                level
                    .words
                    .iter()
                    .map(|(id, progress)| (id.clone(), progress.state))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Forget all word progress and the best score of one level.
    pub fn reset_level(&mut self, list_id: &str, level_id: &str) {
        self.progress.levels.remove(&level_key(list_id, level_id));
        self.progress.global.lists_completed.retain(|id| id != list_id);
    }

    /// Forget everything, including performance counters.
    pub fn reset_all(&mut self) {
        self.progress = UserProgress::default();
    }

    fn levels_of<'a>(&'a self, list_id: &'a str) -> impl Iterator<Item = &'a ListLevelProgress> {
        self.progress
            .levels
            .values()
            .filter(move |level| level.list_id == list_id)
    }
}

impl ProgressStore for MemoryProgressStore {
    fn word_mastery_state(&self, word_id: &str) -> StoreResult<WordMasteryState> {
        Ok(self
            .word_progress(word_id)
            .map(|p| p.state)
            .unwrap_or_default())
    }

    fn set_word_mastery_state(&mut self, attempt: &WordAttempt<'_>) -> StoreResult<()> {
        let now = Utc::now();
        let level = self
            .progress
            .levels
            .entry(level_key(attempt.list_id, attempt.level_id))
            .or_insert_with(|| ListLevelProgress::new(attempt.list_id, attempt.level_id));

        let word = level
            .words
            .entry(attempt.word_id.to_string())
            .or_insert_with(|| WordProgress::new(now));

        let newly_mastered = attempt.new_state.is_mastered() && !word.state.is_mastered();

        word.state = attempt.new_state;
        word.hints_used += u32::from(attempt.hint_used);
        if attempt.was_correct {
            word.correct_attempts += 1;
        } else {
            word.wrong_attempts += 1;
        }
        word.last_attempt_at = now;

        if newly_mastered {
            word.mastered_at = Some(now);
            *self
                .progress
                .daily_learned
                .entry(now.format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }

        if !self
            .progress
            .global
            .lists_completed
            .iter()
            .any(|id| id == attempt.list_id)
            && self.is_list_completed(attempt.list_id)
        {
            debug!(list_id = attempt.list_id, "list completed");
            self.progress
                .global
                .lists_completed
                .push(attempt.list_id.to_string());
        }

        Ok(())
    }

    fn best_score(&self, list_id: &str, level_id: &str) -> StoreResult<Option<BestScore>> {
        Ok(self
            .level_progress(list_id, level_id)
            .and_then(|level| level.best_score.clone()))
    }

    fn set_best_score_if_better(
        &mut self,
        list_id: &str,
        level_id: &str,
        score: ScoreCard,
    ) -> StoreResult<bool> {
        let level = self
            .progress
            .levels
            .entry(level_key(list_id, level_id))
            .or_insert_with(|| ListLevelProgress::new(list_id, level_id));

        let is_better = level
            .best_score
            .as_ref()
            .map_or(true, |best| score.beats(&best.score()));

        if is_better {
            level.best_score = Some(BestScore {
                hints: score.hints,
                wrong: score.wrong,
                completed_at: Utc::now(),
            });
        }

        Ok(is_better)
    }

    fn increment_all_time_stats(&mut self, hints: u32, wrong: u32, correct: u32) -> StoreResult<()> {
        let global = &mut self.progress.global;
        global.all_time_hints += u64::from(hints);
        global.all_time_wrong += u64::from(wrong);
        global.all_time_correct += u64::from(correct);
        Ok(())
    }

    fn performance_counters(&self) -> StoreResult<PerformanceCounters> {
        Ok(self.progress.performance)
    }

    fn set_performance_counters(&mut self, counters: &PerformanceCounters) -> StoreResult<()> {
        self.progress.performance = *counters;
        Ok(())
    }

    fn set_level_word_count(
        &mut self,
        list_id: &str,
        level_id: &str,
        word_count: usize,
    ) -> StoreResult<()> {
        self.progress
            .levels
            .entry(level_key(list_id, level_id))
            .or_insert_with(|| ListLevelProgress::new(list_id, level_id))
            .word_count = word_count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attempt<'a>(
        word_id: &'a str,
        level_id: &'a str,
        new_state: WordMasteryState,
        was_correct: bool,
    ) -> WordAttempt<'a> {
        WordAttempt {
            word_id,
            list_id: "list-a",
            level_id,
            new_state,
            was_correct,
            hint_used: false,
        }
    }

    #[test]
    fn unknown_word_is_unseen() {
        let store = MemoryProgressStore::new();
        assert_eq!(store.word_mastery_state("nope").unwrap(), WordMasteryState::Unseen);
    }

    #[test]
    fn records_attempts_even_without_state_change() {
        let mut store = MemoryProgressStore::new();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Unseen, false))
            .unwrap();
        store
            .set_word_mastery_state(&WordAttempt {
                hint_used: true,
                ..attempt("a1", "basic", WordMasteryState::SeenViaFillIn, true)
            })
            .unwrap();

        let progress = store.word_progress("a1").unwrap();
        assert_eq!(progress.state, WordMasteryState::SeenViaFillIn);
        assert_eq!(progress.wrong_attempts, 1);
        assert_eq!(progress.correct_attempts, 1);
        assert_eq!(progress.hints_used, 1);
        assert!(progress.mastered_at.is_none());
    }

    #[test]
    fn mastering_stamps_date_and_daily_count() {
        let mut store = MemoryProgressStore::new();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Mastered, true))
            .unwrap();

        assert!(store.word_progress("a1").unwrap().mastered_at.is_some());
        assert_eq!(store.snapshot().daily_learned.values().sum::<u32>(), 1);
        assert_eq!(store.total_words_learned(), 1);
    }

    #[test]
    fn best_score_requires_strict_improvement() {
        let mut store = MemoryProgressStore::new();
        assert!(store.best_score("list-a", "basic").unwrap().is_none());

        assert!(store
            .set_best_score_if_better("list-a", "basic", ScoreCard { hints: 2, wrong: 2 })
            .unwrap());
        assert!(!store
            .set_best_score_if_better("list-a", "basic", ScoreCard { hints: 2, wrong: 2 })
            .unwrap());
        assert!(!store
            .set_best_score_if_better("list-a", "basic", ScoreCard { hints: 3, wrong: 0 })
            .unwrap());
        assert!(store
            .set_best_score_if_better("list-a", "basic", ScoreCard { hints: 2, wrong: 1 })
            .unwrap());
        assert!(store
            .set_best_score_if_better("list-a", "basic", ScoreCard { hints: 0, wrong: 5 })
            .unwrap());

        let best = store.best_score("list-a", "basic").unwrap().unwrap();
        assert_eq!(best.score(), ScoreCard { hints: 0, wrong: 5 });
    }

    #[test]
    fn all_time_stats_accumulate() {
        let mut store = MemoryProgressStore::new();
        store.increment_all_time_stats(1, 2, 3).unwrap();
        store.increment_all_time_stats(1, 0, 4).unwrap();

        let global = store.global_stats();
        assert_eq!(global.all_time_hints, 2);
        assert_eq!(global.all_time_wrong, 2);
        assert_eq!(global.all_time_correct, 7);
    }

    #[test]
    fn completion_percentages() {
        let mut store = MemoryProgressStore::new();
        store.set_level_word_count("list-a", "basic", 2).unwrap();
        store.set_level_word_count("list-a", "advanced", 1).unwrap();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        store
            .set_word_mastery_state(&attempt("a2", "basic", WordMasteryState::SeenViaFillIn, true))
            .unwrap();
        store
            .set_word_mastery_state(&attempt("b1", "advanced", WordMasteryState::Mastered, true))
            .unwrap();

        assert_eq!(store.level_completion_percent("list-a", "basic"), 50.0);
        assert_eq!(store.level_completion_percent("list-a", "advanced"), 100.0);
        assert_eq!(store.level_completion_percent("list-a", "expert"), 0.0);
        assert!((store.list_completion_percent("list-a") - 200.0 / 3.0).abs() < 1e-9);
        assert!(store.is_level_completed("list-a", "advanced"));
        assert!(!store.is_list_completed("list-a"));
        assert!(store.global_stats().lists_completed.is_empty());

        store
            .set_word_mastery_state(&attempt("a2", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        assert!(store.is_list_completed("list-a"));
        assert_eq!(store.global_stats().lists_completed, vec!["list-a".to_string()]);
    }

    #[test]
    fn first_mastered_word_does_not_complete_level() {
        let mut store = MemoryProgressStore::new();
        store.set_level_word_count("list-a", "basic", 2).unwrap();
        assert!(!store.is_list_completed("list-a"));

        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        assert_eq!(store.level_completion_percent("list-a", "basic"), 50.0);
        assert!(!store.is_level_completed("list-a", "basic"));
        assert!(store.global_stats().lists_completed.is_empty());

        store
            .set_word_mastery_state(&attempt("a2", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        assert_eq!(store.global_stats().lists_completed, vec!["list-a".to_string()]);
    }

    #[test]
    fn registering_word_count_keeps_progress() {
        let mut store = MemoryProgressStore::new();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        store.set_level_word_count("list-a", "basic", 3).unwrap();

        let level = store.level_progress("list-a", "basic").unwrap();
        assert_eq!(level.word_count, 3);
        assert_eq!(level.mastered_count(), 1);
    }

    #[test]
    fn word_states_and_reset() {
        let mut store = MemoryProgressStore::new();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::SeenViaMultipleChoice, true))
            .unwrap();

        let states = store.word_states_for_level("list-a", "basic");
        assert_eq!(states.get("a1"), Some(&WordMasteryState::SeenViaMultipleChoice));

        store.reset_level("list-a", "basic");
        assert!(store.word_states_for_level("list-a", "basic").is_empty());
        assert_eq!(store.word_mastery_state("a1").unwrap(), WordMasteryState::Unseen);

        store.increment_all_time_stats(1, 1, 1).unwrap();
        store.reset_all();
        assert_eq!(*store.global_stats(), GlobalStats::default());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut store = MemoryProgressStore::new();
        store
            .set_word_mastery_state(&attempt("a1", "basic", WordMasteryState::Mastered, true))
            .unwrap();
        let json = serde_json::to_string(store.snapshot()).unwrap();

        let restored = MemoryProgressStore::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(
            restored.word_mastery_state("a1").unwrap(),
            WordMasteryState::Mastered
        );
    }
}
