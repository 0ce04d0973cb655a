//! Quiz engine settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Question type selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Adaptive,
    Classic,
}

impl Default for PolicyKind {
    fn default() -> Self {
        Self::Adaptive
    }
}

impl PolicyKind {
    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Classic => "classic",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "adaptive" => Some(Self::Adaptive),
            "classic" => Some(Self::Classic),
            _ => None,
        }
    }
}

/// Tunables for the quiz engine. Missing JSON fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub policy: PolicyKind,
    /// Attempts required on both question types before accuracy is trusted.
    pub min_attempts: u32,
    pub high_accuracy_threshold: f64,
    pub low_accuracy_threshold: f64,
    /// Probability of the favoured type once the policy leans one way.
    pub bias_probability: f64,
    /// Maximum edit distance accepted for typed answers.
    pub typo_tolerance: usize,
    /// Random picks allowed per pool entry before falling back to a scan.
    pub selection_retry_factor: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            min_attempts: 5,
            high_accuracy_threshold: 0.8,
            low_accuracy_threshold: 0.5,
            bias_probability: 0.7,
            typo_tolerance: 1,
            selection_retry_factor: 2,
        }
    }
}

impl QuizSettings {
    /// Parse and validate settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("high_accuracy_threshold", self.high_accuracy_threshold),
            ("low_accuracy_threshold", self.low_accuracy_threshold),
            ("bias_probability", self.bias_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.selection_retry_factor == 0 {
            return Err(ConfigError::Zero("selection_retry_factor"));
        }
        Ok(())
    }
}
