//! Answer validation for multiple choice and fill-in-blank questions.

use serde::{Deserialize, Serialize};

/// Default typo tolerance for fill-in-blank answers.
pub const DEFAULT_TYPO_TOLERANCE: usize = 1;

/// Suffixes appended to the headword to accept common inflections.
const SUFFIXES: [&str; 6] = ["s", "es", "d", "ed", "ing", "ly"];

/// Suffixes that replace the headword's last character (`abate` -> `abating`).
const REPLACING_SUFFIXES: [&str; 2] = ["es", "ing"];

/// Result of checking a typed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is accepted.
    pub is_correct: bool,
    /// Trimmed, lowercased typed answer.
    pub typed_normalized: String,
    /// Accepted form closest to the typed answer, if any was within tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_form: Option<String>,
    /// Edit distance to `matched_form`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

/// Multiple choice check: the selected option must equal the word exactly.
pub fn validate_exact(user_answer: &str, correct_answer: &str) -> bool {
    user_answer == correct_answer
}

/// Fill-in-blank check with the default tolerance.
pub fn validate_typed_answer(user_answer: &str, correct_answer: &str) -> bool {
    check_typed_answer(user_answer, correct_answer, DEFAULT_TYPO_TOLERANCE).is_correct
}

/// Compare a typed answer against the headword and its inflections.
///
/// Both sides are trimmed and lowercased. An empty answer is always wrong.
/// The tolerance applies uniformly, so very short words match loosely.
pub fn check_typed_answer(user_answer: &str, correct_answer: &str, tolerance: usize) -> MatchResult {
    let typed_normalized = normalize(user_answer);

    if typed_normalized.is_empty() {
        return MatchResult {
            is_correct: false,
            typed_normalized,
            matched_form: None,
            distance: None,
        };
    }

    let mut best: Option<(String, usize)> = None;
    for form in word_variations(&normalize(correct_answer)) {
        let distance = if form == typed_normalized {
            0
        } else {
            levenshtein_distance(&typed_normalized, &form)
        };
        if best.as_ref().map_or(true, |(_, d)| distance < *d) {
            best = Some((form, distance));
        }
        if distance == 0 {
            break;
        }
    }

    match best {
        Some((form, distance)) if distance <= tolerance => MatchResult {
            is_correct: true,
            typed_normalized,
            matched_form: Some(form),
            distance: Some(distance),
        },
        _ => MatchResult {
            is_correct: false,
            typed_normalized,
            matched_form: None,
            distance: None,
        },
    }
}

/// Accepted forms of a word: itself, suffixed forms, and (for words longer
/// than one character) last-character replacements.
pub fn word_variations(word: &str) -> Vec<String> {
    let mut forms = Vec::with_capacity(1 + SUFFIXES.len() + REPLACING_SUFFIXES.len());
    forms.push(word.to_string());
    forms.extend(SUFFIXES.iter().map(|suffix| format!("{word}{suffix}")));

    if word.chars().count() > 1 {
        let stem = match word.char_indices().last() {
            Some((idx, _)) => &word[..idx],
            None => word,
        };
        forms.extend(REPLACING_SUFFIXES.iter().map(|suffix| format!("{stem}{suffix}")));
    }

    forms
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows of the (m+1) x (n+1) table
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
