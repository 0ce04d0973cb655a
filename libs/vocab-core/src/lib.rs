//! Vocabulary quiz progression engine.
//!
//! Provides:
//! - Quiz sessions over a list level with per-word mastery tracking
//! - Question type policies (adaptive difficulty, classic 50/50)
//! - Multiple choice option generation
//! - Typed answer matching with typo and inflection tolerance
//! - Progress store traits with an in-memory implementation
//! - JSON vocabulary catalog and achievements

pub mod achievements;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod options;
pub mod policy;
pub mod session;
pub mod store;
pub mod types;

pub use achievements::{AchievementCheck, AchievementId, SessionFacts, UnlockedAchievement};
pub use catalog::VocabularyCatalog;
pub use config::{PolicyKind, QuizSettings};
pub use error::{CatalogError, ConfigError, QuizError, Result, StoreError};
pub use matching::{check_typed_answer, levenshtein_distance, validate_exact, validate_typed_answer, MatchResult};
pub use options::generate_options;
pub use policy::{get_policy, QuestionTypePolicy};
pub use session::{AnswerOutcome, QuizEngine, QuizSession, SessionSummary};
pub use store::{MemoryProgressStore, ProgressStore, WordAttempt, WordPoolProvider};
pub use types::{
    BestScore, PerformanceCounters, QuestionType, QuizQuestion, ScoreCard, SessionStats,
    UserProgress, VocabularyLevel, VocabularyList, VocabularyWord, WordMasteryState,
};
