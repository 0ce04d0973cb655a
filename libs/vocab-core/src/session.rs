//! Quiz session engine.
//!
//! Drives one level at a time: picks the next non-mastered word, asks the
//! policy for a question type, validates answers, and advances per-word
//! mastery. Word mastery is written to the store on every answer; session
//! totals are committed only by [`QuizEngine::end_quiz`].

use crate::config::QuizSettings;
use crate::error::{QuizError, Result};
use crate::matching::{check_typed_answer, validate_exact};
use crate::options::{all_options, generate_options};
use crate::policy::{get_policy, QuestionTypePolicy};
use crate::store::{ProgressStore, WordAttempt, WordPoolProvider};
use crate::types::{
    BestScore, QuestionType, QuizQuestion, ScoreCard, SessionStats, VocabularyWord,
    WordMasteryState,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Question currently awaiting an answer.
#[derive(Debug, Clone)]
struct ActiveQuestion {
    word_index: usize,
    question: QuizQuestion,
    hint_used: bool,
}

/// Transient state of one quiz run over a level.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    list_id: String,
    level_id: String,
    started_at: DateTime<Utc>,
    words: Vec<VocabularyWord>,
    answered: Vec<WordMasteryState>,
    current: Option<ActiveQuestion>,
    last_word_index: Option<usize>,
    question_number: u32,
    stats: SessionStats,
}

impl QuizSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn words(&self) -> &[VocabularyWord] {
        &self.words
    }

    /// Mastery of each word, aligned with [`QuizSession::words`].
    pub fn word_states(&self) -> &[WordMasteryState] {
        &self.answered
    }

    pub fn state_of(&self, word_id: &str) -> Option<WordMasteryState> {
        self.words
            .iter()
            .position(|w| w.id == word_id)
            .map(|idx| self.answered[idx])
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current.as_ref().map(|active| &active.question)
    }

    /// Number of questions asked so far.
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn mastered_count(&self) -> usize {
        self.answered.iter().filter(|s| s.is_mastered()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered.iter().all(|s| s.is_mastered())
    }
}

/// What happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub question_type: QuestionType,
    pub previous_state: WordMasteryState,
    pub new_state: WordMasteryState,
    /// Canonical headword.
    pub correct_answer: String,
    /// Accepted form the typed answer matched, for fill-in-blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_form: Option<String>,
}

/// Final totals of an ended session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub list_id: String,
    pub level_id: String,
    pub hints: u32,
    pub wrong: u32,
    pub correct: u32,
    /// This session mastered the level's last remaining words.
    pub completed: bool,
    pub new_best: bool,
    pub best_score: Option<BestScore>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 60_000.0
    }
}

/// Quiz engine with injected word pool, progress store and randomness.
pub struct QuizEngine<P, S, R = StdRng> {
    words: P,
    store: S,
    settings: QuizSettings,
    policy: Box<dyn QuestionTypePolicy>,
    rng: R,
    session: Option<QuizSession>,
}

impl<P, S> QuizEngine<P, S, StdRng>
where
    P: WordPoolProvider,
    S: ProgressStore,
{
    /// Engine with an OS-seeded random source.
    pub fn from_entropy(words: P, store: S, settings: QuizSettings) -> Result<Self> {
        Self::new(words, store, settings, StdRng::from_entropy())
    }
}

impl<P, S, R> QuizEngine<P, S, R>
where
    P: WordPoolProvider,
    S: ProgressStore,
    R: Rng,
{
    /// Validate settings and restore the policy's persisted counters.
    pub fn new(words: P, store: S, settings: QuizSettings, rng: R) -> Result<Self> {
        settings.validate()?;
        let counters = store.performance_counters()?;
        let policy = get_policy(&settings, counters);

        Ok(Self {
            words,
            store,
            settings,
            policy,
            rng,
            session: None,
        })
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn policy(&self) -> &dyn QuestionTypePolicy {
        self.policy.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.session.as_ref().and_then(QuizSession::current_question)
    }

    /// Give back the word provider and store.
    pub fn into_parts(self) -> (P, S) {
        (self.words, self.store)
    }

    /// Start a session over a level and return its first question.
    ///
    /// Returns `Ok(None)` when every word of the level is already mastered.
    #[instrument(level = "debug", skip(self))]
    pub fn start_quiz(&mut self, list_id: &str, level_id: &str) -> Result<Option<QuizQuestion>> {
        let words = self.words.get_words(list_id, level_id);
        if words.is_empty() {
            warn!(list_id, level_id, "no words for level");
            return Err(QuizError::EmptyWordPool {
                list_id: list_id.to_string(),
                level_id: level_id.to_string(),
            });
        }

        let answered = words
            .iter()
            .map(|w| self.store.word_mastery_state(&w.id))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.store.set_level_word_count(list_id, level_id, words.len())?;

        if let Some(previous) = &self.session {
            warn!(session_id = %previous.id, "replacing active session");
        }

        let session = QuizSession {
            id: Uuid::new_v4(),
            list_id: list_id.to_string(),
            level_id: level_id.to_string(),
            started_at: Utc::now(),
            words,
            answered,
            current: None,
            last_word_index: None,
            question_number: 0,
            stats: SessionStats::default(),
        };
        info!(
            session_id = %session.id,
            list_id,
            level_id,
            words = session.words.len(),
            mastered = session.mastered_count(),
            "quiz started"
        );
        self.session = Some(session);

        self.next_question()
    }

    /// Pick the next word and build a question for it.
    ///
    /// Returns `Ok(None)` once every word is mastered.
    pub fn next_question(&mut self) -> Result<Option<QuizQuestion>> {
        let session = self.session.as_mut().ok_or(QuizError::NoActiveSession)?;

        let Some(word_index) = pick_word(
            &session.answered,
            session.last_word_index,
            self.settings.selection_retry_factor,
            &mut self.rng,
        ) else {
            debug!(session_id = %session.id, "all words mastered");
            session.current = None;
            return Ok(None);
        };

        let word = &session.words[word_index];
        let state = session.answered[word_index];
        let question_type = self.policy.choose(state, &mut self.rng);

        let options = match question_type {
            QuestionType::FillInBlank => None,
            QuestionType::MultipleChoice => Some(
                match generate_options(
                    word,
                    &session.words,
                    self.settings.selection_retry_factor,
                    &mut self.rng,
                ) {
                    Ok(options) => options,
                    Err(QuizError::InsufficientDistractorPool { available, .. }) => {
                        warn!(word_id = %word.id, available, "distractor pool too small");
                        all_options(word, &session.words, &mut self.rng)
                    }
                    Err(e) => return Err(e),
                },
            ),
        };

        let question = QuizQuestion {
            word: word.clone(),
            question_type,
            options,
        };
        debug!(
            word_id = %word.id,
            question_type = question_type.as_str(),
            state = state.to_value(),
            "next question"
        );

        session.question_number += 1;
        session.last_word_index = Some(word_index);
        session.current = Some(ActiveQuestion {
            word_index,
            question: question.clone(),
            hint_used: false,
        });

        Ok(Some(question))
    }

    /// Validate an answer to the current question.
    ///
    /// A correct answer advances the word's mastery and retires the question;
    /// a wrong answer leaves both in place. Either way the attempt is
    /// recorded in the store and in the policy's counters.
    ///
    /// Nothing changes if the attempt cannot be stored. Counters are
    /// persisted last and in full; a failure there is logged and the next
    /// answer writes them again.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome> {
        let session = self.session.as_mut().ok_or(QuizError::NoActiveSession)?;
        let active = session.current.as_ref().ok_or(QuizError::NoActiveQuestion)?;

        let question_type = active.question.question_type;
        let word = &active.question.word;
        let (is_correct, matched_form) = match question_type {
            QuestionType::MultipleChoice => (validate_exact(answer, &word.word), None),
            QuestionType::FillInBlank => {
                let result = check_typed_answer(answer, &word.word, self.settings.typo_tolerance);
                (result.is_correct, result.matched_form)
            }
        };

        let previous_state = session.answered[active.word_index];
        let new_state = if is_correct {
            previous_state.advance(question_type)
        } else {
            previous_state
        };

        self.store.set_word_mastery_state(&WordAttempt {
            word_id: &word.id,
            list_id: &session.list_id,
            level_id: &session.level_id,
            new_state,
            was_correct: is_correct,
            hint_used: active.hint_used,
        })?;

        debug!(
            word_id = %word.id,
            question_type = question_type.as_str(),
            is_correct,
            from = previous_state.to_value(),
            to = new_state.to_value(),
            "answer submitted"
        );

        let outcome = AnswerOutcome {
            is_correct,
            question_type,
            previous_state,
            new_state,
            correct_answer: word.word.clone(),
            matched_form,
        };

        let word_index = active.word_index;
        session.answered[word_index] = new_state;
        if is_correct {
            session.stats.correct_answers += 1;
            session.current = None;
        } else {
            session.stats.wrong_answers += 1;
            // A hint is recorded with one attempt only.
            if let Some(active) = session.current.as_mut() {
                active.hint_used = false;
            }
        }

        self.policy.update_performance(question_type, is_correct);
        if let Err(e) = self.store.set_performance_counters(self.policy.counters()) {
            warn!(error = %e, "failed to persist performance counters");
        }

        Ok(outcome)
    }

    /// Count a hint and return the current word's definition.
    pub fn use_hint(&mut self) -> Result<String> {
        let session = self.session.as_mut().ok_or(QuizError::NoActiveSession)?;
        let active = session.current.as_mut().ok_or(QuizError::NoActiveQuestion)?;

        active.hint_used = true;
        session.stats.hints_used += 1;
        Ok(active.question.word.definition.clone())
    }

    /// True iff a session is active and every word in it is mastered.
    pub fn is_quiz_complete(&self) -> bool {
        self.session.as_ref().is_some_and(QuizSession::is_complete)
    }

    /// Commit session totals to the store and close the session.
    ///
    /// The best score is only offered when this session finished the level.
    /// All-time stats are written last, so a failed end can be retried
    /// without counting them twice.
    pub fn end_quiz(&mut self) -> Result<SessionSummary> {
        let session = self.session.as_ref().ok_or(QuizError::NoActiveSession)?;
        let stats = session.stats;
        let completed = session.is_complete() && stats.correct_answers > 0;

        let new_best = if completed {
            self.store.set_best_score_if_better(
                &session.list_id,
                &session.level_id,
                ScoreCard {
                    hints: stats.hints_used,
                    wrong: stats.wrong_answers,
                },
            )?
        } else {
            false
        };
        let best_score = self.store.best_score(&session.list_id, &session.level_id)?;
        self.store.increment_all_time_stats(
            stats.hints_used,
            stats.wrong_answers,
            stats.correct_answers,
        )?;

        let summary = SessionSummary {
            session_id: session.id,
            list_id: session.list_id.clone(),
            level_id: session.level_id.clone(),
            hints: stats.hints_used,
            wrong: stats.wrong_answers,
            correct: stats.correct_answers,
            completed,
            new_best,
            best_score,
            started_at: session.started_at,
            ended_at: Utc::now(),
        };
        info!(
            session_id = %summary.session_id,
            hints = summary.hints,
            wrong = summary.wrong,
            correct = summary.correct,
            completed = summary.completed,
            new_best,
            "quiz ended"
        );

        self.session = None;
        Ok(summary)
    }

    /// Drop the session without committing its totals. Mastery already
    /// written by earlier answers stays.
    pub fn abandon_quiz(&mut self) -> Result<SessionStats> {
        let session = self.session.take().ok_or(QuizError::NoActiveSession)?;
        info!(session_id = %session.id, "quiz abandoned");
        Ok(session.stats)
    }

    /// Clear the policy's counters, in memory and in the store.
    pub fn reset_performance(&mut self) -> Result<()> {
        self.policy.reset();
        self.store.set_performance_counters(self.policy.counters())?;
        Ok(())
    }
}

/// Random non-mastered word other than `last`. Once the random draws run out,
/// the first non-mastered word other than `last`, else `last` itself.
fn pick_word<R: Rng + ?Sized>(
    states: &[WordMasteryState],
    last: Option<usize>,
    retry_factor: usize,
    rng: &mut R,
) -> Option<usize> {
    let total = states.len();
    if total == 0 {
        return None;
    }

    for _ in 0..total * retry_factor {
        let idx = rng.gen_range(0..total);
        if !states[idx].is_mastered() && Some(idx) != last {
            return Some(idx);
        }
    }

    let open = |idx: &usize| !states[*idx].is_mastered();
    (0..total)
        .filter(open)
        .find(|idx| Some(*idx) != last)
        .or_else(|| (0..total).find(open))
}
