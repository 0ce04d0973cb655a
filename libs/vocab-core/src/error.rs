//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors reported by the quiz engine and question generator.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no words found for list {list_id}, level {level_id}")]
    EmptyWordPool { list_id: String, level_id: String },

    #[error("no active quiz session")]
    NoActiveSession,

    #[error("no active question")]
    NoActiveQuestion,

    #[error("not enough distinct words for multiple choice: need {required} distractors, found {available}")]
    InsufficientDistractorPool { required: usize, available: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors reported by a progress store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt progress record for {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Errors that can occur while loading a vocabulary catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate list id {0}")]
    DuplicateListId(String),

    #[error("duplicate level id {level_id} in list {list_id}")]
    DuplicateLevelId { list_id: String, level_id: String },

    #[error("duplicate word id {word_id} in {list_id}/{level_id}")]
    DuplicateWordId {
        list_id: String,
        level_id: String,
        word_id: String,
    },

    #[error("empty headword for word id {0}")]
    EmptyWord(String),
}

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
