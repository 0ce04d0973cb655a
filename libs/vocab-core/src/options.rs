//! Multiple choice option generation.

use crate::error::{QuizError, Result};
use crate::types::VocabularyWord;
use rand::Rng;
use std::collections::HashSet;

/// Options shown for a multiple choice question.
pub const OPTION_COUNT: usize = 4;

/// Distractors needed alongside the correct word.
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// Build exactly four distinct options with the correct word at a uniformly
/// random position.
///
/// Distractors are drawn uniformly from `pool`, skipping the correct word and
/// any headword already chosen. Random draws are bounded by
/// `retry_factor * pool.len()` per slot, after which the first unused
/// candidate is taken. Fails when the pool holds fewer than three headwords
/// distinct from the correct one.
pub fn generate_options<R: Rng + ?Sized>(
    correct: &VocabularyWord,
    pool: &[VocabularyWord],
    retry_factor: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let available = distinct_distractors(correct, pool);
    if available < DISTRACTOR_COUNT {
        return Err(QuizError::InsufficientDistractorPool {
            required: DISTRACTOR_COUNT,
            available,
        });
    }

    let correct_position = rng.gen_range(0..OPTION_COUNT);
    let mut used: HashSet<&str> = HashSet::with_capacity(OPTION_COUNT);
    used.insert(correct.word.as_str());

    let mut options = Vec::with_capacity(OPTION_COUNT);
    for slot in 0..OPTION_COUNT {
        if slot == correct_position {
            options.push(correct.word.clone());
            continue;
        }

        let distractor = pick_distractor(pool, &used, retry_factor, rng)
            .ok_or(QuizError::InsufficientDistractorPool {
                required: DISTRACTOR_COUNT,
                available,
            })?;
        used.insert(distractor);
        options.push(distractor.to_string());
    }

    Ok(options)
}

/// Every distinct headword in the pool, shuffled, correct word included.
///
/// Used when the pool is too small for [`generate_options`].
pub fn all_options<R: Rng + ?Sized>(
    correct: &VocabularyWord,
    pool: &[VocabularyWord],
    rng: &mut R,
) -> Vec<String> {
    use rand::seq::SliceRandom;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut options: Vec<String> = std::iter::once(correct)
        .chain(pool.iter())
        .filter(|w| seen.insert(w.word.as_str()))
        .map(|w| w.word.clone())
        .collect();
    options.shuffle(rng);
    options
}

fn distinct_distractors(correct: &VocabularyWord, pool: &[VocabularyWord]) -> usize {
    pool.iter()
        .map(|w| w.word.as_str())
        .filter(|w| *w != correct.word)
        .collect::<HashSet<_>>()
        .len()
}

fn pick_distractor<'a, R: Rng + ?Sized>(
    pool: &'a [VocabularyWord],
    used: &HashSet<&str>,
    retry_factor: usize,
    rng: &mut R,
) -> Option<&'a str> {
    let attempts = pool.len() * retry_factor.max(1);
    for _ in 0..attempts {
        let candidate = pool[rng.gen_range(0..pool.len())].word.as_str();
        if !used.contains(candidate) {
            return Some(candidate);
        }
    }

    pool.iter()
        .map(|w| w.word.as_str())
        .find(|w| !used.contains(w))
}
