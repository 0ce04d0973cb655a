//! Core types for the vocabulary quiz.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vocabulary entry. Loaded from static data and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: String,
    pub word: String,
    pub definition: String,
    /// Sentence with a blank placeholder where the headword belongs.
    pub fill_in_blank: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl VocabularyWord {
    /// Create a word with no examples or synonyms.
    pub fn new(
        id: impl Into<String>,
        word: impl Into<String>,
        definition: impl Into<String>,
        fill_in_blank: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            definition: definition.into(),
            fill_in_blank: fill_in_blank.into(),
            examples: Vec::new(),
            synonyms: Vec::new(),
        }
    }
}

/// One difficulty level of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyLevel {
    pub id: String,
    pub name: String,
    pub words: Vec<VocabularyWord>,
}

/// A named word list split into levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyList {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub levels: Vec<VocabularyLevel>,
}

/// Per-word mastery progression.
///
/// Ordered: `Unseen < SeenViaMultipleChoice < SeenViaFillIn < Mastered`.
/// Serialized as its ordinal (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordMasteryState {
    Unseen,
    SeenViaMultipleChoice,
    SeenViaFillIn,
    Mastered,
}

impl Default for WordMasteryState {
    fn default() -> Self {
        Self::Unseen
    }
}

impl WordMasteryState {
    /// Ordinal value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Unseen => 0,
            Self::SeenViaMultipleChoice => 1,
            Self::SeenViaFillIn => 2,
            Self::Mastered => 3,
        }
    }

    /// Create from ordinal value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unseen),
            1 => Some(Self::SeenViaMultipleChoice),
            2 => Some(Self::SeenViaFillIn),
            3 => Some(Self::Mastered),
            _ => None,
        }
    }

    pub fn is_mastered(self) -> bool {
        self == Self::Mastered
    }

    /// State after a correct answer of the given type.
    ///
    /// A word must be answered correctly once by each question type to be
    /// mastered. Any other combination leaves the state as is.
    pub fn advance(self, question_type: QuestionType) -> Self {
        match (self, question_type) {
            (Self::Unseen, QuestionType::MultipleChoice) => Self::SeenViaMultipleChoice,
            (Self::Unseen, QuestionType::FillInBlank) => Self::SeenViaFillIn,
            (Self::SeenViaFillIn, QuestionType::MultipleChoice) => Self::Mastered,
            (Self::SeenViaMultipleChoice, QuestionType::FillInBlank) => Self::Mastered,
            (state, _) => state,
        }
    }
}

impl From<WordMasteryState> for u8 {
    fn from(state: WordMasteryState) -> Self {
        state.to_value()
    }
}

impl TryFrom<u8> for WordMasteryState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("invalid mastery state: {value}"))
    }
}

/// Question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FillInBlank,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::FillInBlank => "fill_in_blank",
        }
    }
}

/// A question handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub word: VocabularyWord,
    pub question_type: QuestionType,
    /// Present only for multiple choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Counters accumulated during one quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub hints_used: u32,
    pub wrong_answers: u32,
    pub correct_answers: u32,
}

/// Hints and wrong answers of a finished level, as compared for best scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub hints: u32,
    pub wrong: u32,
}

impl ScoreCard {
    /// Fewer hints wins; on equal hints, fewer wrong answers wins.
    pub fn beats(&self, other: &ScoreCard) -> bool {
        self.hints < other.hints || (self.hints == other.hints && self.wrong < other.wrong)
    }
}

/// Best score recorded for a list level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub hints: u32,
    pub wrong: u32,
    pub completed_at: DateTime<Utc>,
}

impl BestScore {
    pub fn score(&self) -> ScoreCard {
        ScoreCard {
            hints: self.hints,
            wrong: self.wrong,
        }
    }
}

/// Durable per-word record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProgress {
    pub state: WordMasteryState,
    pub hints_used: u32,
    pub wrong_attempts: u32,
    pub correct_attempts: u32,
    pub first_attempt_at: DateTime<Utc>,
    pub last_attempt_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastered_at: Option<DateTime<Utc>>,
}

impl WordProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: WordMasteryState::Unseen,
            hints_used: 0,
            wrong_attempts: 0,
            correct_attempts: 0,
            first_attempt_at: now,
            last_attempt_at: now,
            mastered_at: None,
        }
    }
}

/// Progress for one (list, level) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLevelProgress {
    pub list_id: String,
    pub level_id: String,
    pub words: BTreeMap<String, WordProgress>,
    /// Size of the level's word pool, 0 until a session registers it.
    #[serde(default)]
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<BestScore>,
}

impl ListLevelProgress {
    pub fn new(list_id: &str, level_id: &str) -> Self {
        Self {
            list_id: list_id.to_string(),
            level_id: level_id.to_string(),
            words: BTreeMap::new(),
            word_count: 0,
            best_score: None,
        }
    }

    pub fn mastered_count(&self) -> usize {
        self.words.values().filter(|w| w.state.is_mastered()).count()
    }

    /// Words the level is known to hold: the registered pool size, or the
    /// tracked words when no pool size was registered.
    pub fn total_words(&self) -> usize {
        self.word_count.max(self.words.len())
    }

    /// True when the level holds at least one word and all of them are mastered.
    pub fn is_fully_mastered(&self) -> bool {
        let total = self.total_words();
        total > 0 && self.mastered_count() == total
    }
}

/// All-time totals across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub all_time_hints: u64,
    pub all_time_wrong: u64,
    pub all_time_correct: u64,
    pub lists_completed: Vec<String>,
}

/// Attempts and correct answers for a single question type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounters {
    pub attempts: u32,
    pub correct: u32,
}

impl TypeCounters {
    /// Fraction answered correctly, 0 before any attempt.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    pub fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// Rolling accuracy per question type. Persisted for the life of the install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    pub multiple_choice: TypeCounters,
    pub fill_in_blank: TypeCounters,
}

impl PerformanceCounters {
    pub fn get(&self, question_type: QuestionType) -> &TypeCounters {
        match question_type {
            QuestionType::MultipleChoice => &self.multiple_choice,
            QuestionType::FillInBlank => &self.fill_in_blank,
        }
    }

    pub fn record(&mut self, question_type: QuestionType, correct: bool) {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice.record(correct),
            QuestionType::FillInBlank => self.fill_in_blank.record(correct),
        }
    }
}

/// Snapshot of everything a progress store keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProgress {
    /// Keyed by `"{list_id}-{level_id}"`.
    pub levels: BTreeMap<String, ListLevelProgress>,
    pub global: GlobalStats,
    pub performance: PerformanceCounters,
    /// Words mastered per day, keyed by `YYYY-MM-DD`.
    pub daily_learned: BTreeMap<String, u32>,
}

impl UserProgress {
    pub fn total_words_learned(&self) -> usize {
        self.levels.values().map(|l| l.mastered_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WordMasteryState::*;

    #[test]
    fn multiple_choice_transitions() {
        assert_eq!(Unseen.advance(QuestionType::MultipleChoice), SeenViaMultipleChoice);
        assert_eq!(SeenViaFillIn.advance(QuestionType::MultipleChoice), Mastered);
        assert_eq!(
            SeenViaMultipleChoice.advance(QuestionType::MultipleChoice),
            SeenViaMultipleChoice
        );
        assert_eq!(Mastered.advance(QuestionType::MultipleChoice), Mastered);
    }

    #[test]
    fn fill_in_transitions() {
        assert_eq!(Unseen.advance(QuestionType::FillInBlank), SeenViaFillIn);
        assert_eq!(SeenViaMultipleChoice.advance(QuestionType::FillInBlank), Mastered);
        assert_eq!(SeenViaFillIn.advance(QuestionType::FillInBlank), SeenViaFillIn);
        assert_eq!(Mastered.advance(QuestionType::FillInBlank), Mastered);
    }

    #[test]
    fn advance_never_decreases() {
        for value in 0..=3 {
            let state = WordMasteryState::from_value(value).unwrap();
            for qt in [QuestionType::MultipleChoice, QuestionType::FillInBlank] {
                assert!(state.advance(qt) >= state);
            }
        }
    }

    #[test]
    fn state_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&SeenViaFillIn).unwrap(), "2");
        let parsed: WordMasteryState = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Mastered);
        assert!(serde_json::from_str::<WordMasteryState>("4").is_err());
    }

    #[test]
    fn accuracy_is_zero_without_attempts() {
        let counters = TypeCounters::default();
        assert_eq!(counters.accuracy(), 0.0);
    }

    #[test]
    fn counters_record_attempts() {
        let mut counters = PerformanceCounters::default();
        counters.record(QuestionType::FillInBlank, true);
        counters.record(QuestionType::FillInBlank, false);
        assert_eq!(counters.fill_in_blank.attempts, 2);
        assert_eq!(counters.fill_in_blank.correct, 1);
        assert_eq!(counters.get(QuestionType::FillInBlank).accuracy(), 0.5);
        assert_eq!(counters.multiple_choice.attempts, 0);
    }

    #[test]
    fn score_card_ordering() {
        let best = ScoreCard { hints: 2, wrong: 3 };
        assert!(ScoreCard { hints: 1, wrong: 9 }.beats(&best));
        assert!(ScoreCard { hints: 2, wrong: 2 }.beats(&best));
        assert!(!ScoreCard { hints: 2, wrong: 3 }.beats(&best));
        assert!(!ScoreCard { hints: 3, wrong: 0 }.beats(&best));
    }

    #[test]
    fn level_needs_whole_pool_mastered() {
        let now = Utc::now();
        let mut level = ListLevelProgress::new("list-a", "basic");
        let mut word = WordProgress::new(now);
        word.state = Mastered;
        level.words.insert("a".to_string(), word);
        assert!(level.is_fully_mastered());

        level.word_count = 2;
        assert_eq!(level.total_words(), 2);
        assert!(!level.is_fully_mastered());
    }

    #[test]
    fn word_deserializes_from_camel_case() {
        let json = r#"{"id":"a1","word":"abject","definition":"wretched","fillInBlank":"He lived in ____ poverty."}"#;
        let word: VocabularyWord = serde_json::from_str(json).unwrap();
        assert_eq!(word.fill_in_blank, "He lived in ____ poverty.");
        assert!(word.synonyms.is_empty());
    }
}
