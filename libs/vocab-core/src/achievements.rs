//! Achievement rules evaluated against stored progress.

use crate::session::SessionSummary;
use crate::types::UserProgress;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const QUICK_LEARNER_MINUTES: f64 = 5.0;
const STREAK_DAYS: usize = 7;
const LEVELS_PER_LIST: usize = 5;
const LISTS_FOR_FIVE_STARS: usize = 5;
const NO_HINT_LEVELS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstSteps,
    QuickLearner,
    PerfectScore,
    ConsistentLearner,
    #[serde(rename = "word-master-50")]
    WordMaster50,
    #[serde(rename = "word-master-100")]
    WordMaster100,
    #[serde(rename = "word-master-200")]
    WordMaster200,
    ListCompletionist,
    FiveStarStudent,
    NoHintsMaster,
    AchievementHunter,
}

impl AchievementId {
    pub const ALL: [AchievementId; 11] = [
        Self::FirstSteps,
        Self::QuickLearner,
        Self::PerfectScore,
        Self::ConsistentLearner,
        Self::WordMaster50,
        Self::WordMaster100,
        Self::WordMaster200,
        Self::ListCompletionist,
        Self::FiveStarStudent,
        Self::NoHintsMaster,
        Self::AchievementHunter,
    ];

    pub fn as_str(&self) -> &'static str {
        self.definition().key
    }

    pub fn definition(&self) -> &'static Achievement {
        let idx = Self::ALL
            .iter()
            .position(|id| id == self)
            .unwrap_or_default();
        &DEFINITIONS[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Milestone,
    Performance,
    Consistency,
    Completion,
}

/// Static description of an achievement.
#[derive(Debug, Serialize)]
pub struct Achievement {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// Ordered like [`AchievementId::ALL`].
static DEFINITIONS: [Achievement; 11] = [
    Achievement {
        key: "first-steps",
        name: "First Steps",
        description: "Complete your first quiz",
        category: Category::Milestone,
        target: None,
    },
    Achievement {
        key: "quick-learner",
        name: "Quick Learner",
        description: "Complete a level in under 5 minutes",
        category: Category::Performance,
        target: None,
    },
    Achievement {
        key: "perfect-score",
        name: "Perfect Score",
        description: "Complete a level with 0 hints and 0 wrong answers",
        category: Category::Performance,
        target: None,
    },
    Achievement {
        key: "consistent-learner",
        name: "Consistent Learner",
        description: "Learn for 7 days in a row",
        category: Category::Consistency,
        target: Some(7),
    },
    Achievement {
        key: "word-master-50",
        name: "Word Master",
        description: "Learn 50 words",
        category: Category::Milestone,
        target: Some(50),
    },
    Achievement {
        key: "word-master-100",
        name: "Vocabulary Expert",
        description: "Learn 100 words",
        category: Category::Milestone,
        target: Some(100),
    },
    Achievement {
        key: "word-master-200",
        name: "Language Master",
        description: "Learn 200 words",
        category: Category::Milestone,
        target: Some(200),
    },
    Achievement {
        key: "list-completionist",
        name: "List Completionist",
        description: "Complete all 5 levels in one list",
        category: Category::Completion,
        target: None,
    },
    Achievement {
        key: "five-star-student",
        name: "Five Star Student",
        description: "Complete 5 different lists",
        category: Category::Completion,
        target: Some(5),
    },
    Achievement {
        key: "no-hints-master",
        name: "No Hints Master",
        description: "Complete 10 levels without using any hints",
        category: Category::Performance,
        target: Some(10),
    },
    Achievement {
        key: "achievement-hunter",
        name: "Achievement Hunter",
        description: "Unlock all other achievements",
        category: Category::Completion,
        target: None,
    },
];

/// Session facts some achievements depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionFacts {
    pub hints: u32,
    pub wrong: u32,
    pub completed: bool,
    pub duration_minutes: f64,
}

impl From<&SessionSummary> for SessionFacts {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            hints: summary.hints,
            wrong: summary.wrong,
            completed: summary.completed,
            duration_minutes: summary.duration_minutes(),
        }
    }
}

/// Outcome of checking a single achievement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementCheck {
    pub should_unlock: bool,
    /// 0-100 for progressive achievements.
    pub progress_percent: Option<f64>,
}

impl AchievementCheck {
    fn flag(should_unlock: bool) -> Self {
        Self {
            should_unlock,
            progress_percent: None,
        }
    }

    fn progressive(current: usize, target: usize) -> Self {
        Self {
            should_unlock: current >= target,
            progress_percent: Some((current as f64 * 100.0 / target as f64).min(100.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: AchievementId,
    pub unlocked_at: DateTime<Utc>,
}

/// An achievement with its current standing, for listing.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub definition: &'static Achievement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
}

impl AchievementStatus {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Evaluate one achievement. `AchievementHunter` is decided by [`check_all`].
pub fn check(
    id: AchievementId,
    progress: &UserProgress,
    session: Option<&SessionFacts>,
) -> AchievementCheck {
    match id {
        AchievementId::FirstSteps => AchievementCheck::flag(
            progress.levels.values().any(|level| level.best_score.is_some()),
        ),
        AchievementId::QuickLearner => AchievementCheck::flag(session.is_some_and(|s| {
            s.completed && s.duration_minutes < QUICK_LEARNER_MINUTES
        })),
        AchievementId::PerfectScore => AchievementCheck::flag(
            session.is_some_and(|s| s.completed && s.hints == 0 && s.wrong == 0),
        ),
        AchievementId::ConsistentLearner => {
            AchievementCheck::progressive(longest_streak(progress), STREAK_DAYS)
        }
        AchievementId::WordMaster50 => AchievementCheck::progressive(progress.total_words_learned(), 50),
        AchievementId::WordMaster100 => {
            AchievementCheck::progressive(progress.total_words_learned(), 100)
        }
        AchievementId::WordMaster200 => {
            AchievementCheck::progressive(progress.total_words_learned(), 200)
        }
        AchievementId::ListCompletionist => {
            let mut completed_levels: HashMap<&str, usize> = HashMap::new();
            for level in progress.levels.values().filter(|l| l.is_fully_mastered()) {
                *completed_levels.entry(level.list_id.as_str()).or_default() += 1;
            }
            AchievementCheck::flag(completed_levels.values().any(|n| *n >= LEVELS_PER_LIST))
        }
        AchievementId::FiveStarStudent => AchievementCheck::progressive(
            progress.global.lists_completed.len(),
            LISTS_FOR_FIVE_STARS,
        ),
        AchievementId::NoHintsMaster => {
            let levels = progress
                .levels
                .values()
                .filter(|level| level.best_score.as_ref().is_some_and(|b| b.hints == 0))
                .count();
            AchievementCheck::progressive(levels, NO_HINT_LEVELS)
        }
        AchievementId::AchievementHunter => AchievementCheck::flag(false),
    }
}

/// Achievements newly unlocked given what is already unlocked.
///
/// `AchievementHunter` unlocks once every other achievement is unlocked,
/// counting those unlocked in this call.
pub fn check_all(
    progress: &UserProgress,
    unlocked: &[UnlockedAchievement],
    session: Option<&SessionFacts>,
    now: DateTime<Utc>,
) -> Vec<UnlockedAchievement> {
    let is_unlocked = |id: AchievementId| unlocked.iter().any(|u| u.id == id);

    let mut newly: Vec<UnlockedAchievement> = AchievementId::ALL
        .iter()
        .copied()
        .filter(|id| *id != AchievementId::AchievementHunter && !is_unlocked(*id))
        .filter(|id| check(*id, progress, session).should_unlock)
        .map(|id| UnlockedAchievement {
            id,
            unlocked_at: now,
        })
        .collect();

    let others_unlocked = AchievementId::ALL
        .iter()
        .filter(|id| **id != AchievementId::AchievementHunter)
        .all(|id| is_unlocked(*id) || newly.iter().any(|u| u.id == *id));

    if others_unlocked && !is_unlocked(AchievementId::AchievementHunter) {
        newly.push(UnlockedAchievement {
            id: AchievementId::AchievementHunter,
            unlocked_at: now,
        });
    }

    newly
}

/// Every achievement with its unlock time or current progress.
pub fn all_achievements(
    progress: &UserProgress,
    unlocked: &[UnlockedAchievement],
) -> Vec<AchievementStatus> {
    AchievementId::ALL
        .iter()
        .map(|id| {
            let unlocked_at = unlocked
                .iter()
                .find(|u| u.id == *id)
                .map(|u| u.unlocked_at);
            let progress_percent = match unlocked_at {
                Some(_) => Some(100.0),
                None => check(*id, progress, None).progress_percent,
            };
            AchievementStatus {
                id: *id,
                definition: id.definition(),
                unlocked_at,
                progress_percent,
            }
        })
        .collect()
}

/// Share of achievements unlocked, 0-100.
pub fn completion_percent(statuses: &[AchievementStatus]) -> f64 {
    if statuses.is_empty() {
        return 0.0;
    }
    let unlocked = statuses.iter().filter(|s| s.is_unlocked()).count();
    unlocked as f64 / statuses.len() as f64 * 100.0
}

/// Longest run of consecutive days with at least one word learned.
fn longest_streak(progress: &UserProgress) -> usize {
    let mut days: Vec<NaiveDate> = progress
        .daily_learned
        .iter()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(day, _)| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .collect();
    days.sort();

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        current = match previous {
            Some(prev) if day.signed_duration_since(prev).num_days() == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }
    longest
}
