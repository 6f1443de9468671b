//! Quiz grading and reward attribution.
//!
//! Grading is deterministic over the stored answer key: each question has
//! exactly one correct option (enforced at authoring time by
//! [`validate_options`]), an attempt's score is the rounded percentage of
//! correctly answered questions, and points are awarded from the quiz's
//! per-attempt reward tiers only when the attempt passes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum score (0-100) for a passing attempt.
pub const PASSING_SCORE: i32 = 70;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS_PER_QUESTION: usize = 2;

/// One submitted answer: the question and the option the learner picked.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: DbId,
    pub option_id: DbId,
}

/// An answer-key entry: a question paired with its single correct option.
#[derive(Debug, Clone, Copy)]
pub struct AnswerKeyEntry {
    pub question_id: DbId,
    pub correct_option_id: DbId,
}

/// Grading outcome for one attempt, before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradedAttempt {
    pub correct_count: i32,
    pub total_questions: i32,
    pub score: i32,
}

impl GradedAttempt {
    pub fn passed(&self) -> bool {
        self.score >= PASSING_SCORE
    }
}

/// Rounded percentage in [0, 100]; zero gradable questions scores 0.
pub fn score_percentage(correct_count: usize, total_questions: usize) -> i32 {
    if total_questions == 0 {
        return 0;
    }
    ((correct_count as f64 / total_questions as f64) * 100.0).round() as i32
}

/// Grade a submission against the answer key.
///
/// Answers referencing unknown questions are ignored; questions with no
/// submitted answer count as incorrect. Only the first answer for a given
/// question is considered.
pub fn grade_answers(key: &[AnswerKeyEntry], answers: &[SubmittedAnswer]) -> GradedAttempt {
    let mut correct_count = 0usize;
    for entry in key {
        let submitted = answers
            .iter()
            .find(|a| a.question_id == entry.question_id);
        if let Some(answer) = submitted {
            if answer.option_id == entry.correct_option_id {
                correct_count += 1;
            }
        }
    }

    GradedAttempt {
        correct_count: correct_count as i32,
        total_questions: key.len() as i32,
        score: score_percentage(correct_count, key.len()),
    }
}

// ---------------------------------------------------------------------------
// Reward tiers
// ---------------------------------------------------------------------------

/// Per-attempt-ordinal point values for a quiz.
///
/// A quiz without a rewards row behaves as all-zero tiers (the `Default`).
/// All four values are always written together; there is no partial update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTiers {
    pub attempt_1_points: i32,
    pub attempt_2_points: i32,
    pub attempt_3_points: i32,
    pub attempt_4_plus_points: i32,
}

/// Points for an attempt: the tier matching the 1-based ordinal (4th and
/// beyond share one tier), and always 0 for a failing attempt.
pub fn points_for_attempt(tiers: RewardTiers, attempt_number: i32, passed: bool) -> i32 {
    if !passed {
        return 0;
    }
    match attempt_number {
        1 => tiers.attempt_1_points,
        2 => tiers.attempt_2_points,
        3 => tiers.attempt_3_points,
        _ => tiers.attempt_4_plus_points,
    }
}

// ---------------------------------------------------------------------------
// Authoring-time validation
// ---------------------------------------------------------------------------

/// Option payload used when creating or replacing a question's option set.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Reject malformed option sets at write time: a question must offer at
/// least two options with exactly one flagged correct, so the grading
/// engine's single-correct assumption holds by construction.
pub fn validate_options(options: &[OptionInput]) -> Result<(), CoreError> {
    if options.len() < MIN_OPTIONS_PER_QUESTION {
        return Err(CoreError::Validation(
            "A question must have at least 2 options".into(),
        ));
    }
    if options.iter().any(|o| o.text.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Option text must not be empty".into(),
        ));
    }
    let correct = options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(CoreError::Validation(
            "A question must have exactly one correct option".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn key(pairs: &[(DbId, DbId)]) -> Vec<AnswerKeyEntry> {
        pairs
            .iter()
            .map(|&(question_id, correct_option_id)| AnswerKeyEntry {
                question_id,
                correct_option_id,
            })
            .collect()
    }

    fn answer(question_id: DbId, option_id: DbId) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            option_id,
        }
    }

    // -----------------------------------------------------------------------
    // Score formula
    // -----------------------------------------------------------------------

    #[test]
    fn score_is_rounded_percentage() {
        assert_eq!(score_percentage(0, 1), 0);
        assert_eq!(score_percentage(1, 1), 100);
        assert_eq!(score_percentage(1, 2), 50);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(5, 7), 71);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(score_percentage(0, 0), 0);
        let graded = grade_answers(&[], &[answer(1, 1)]);
        assert_eq!(graded.score, 0);
        assert_eq!(graded.total_questions, 0);
        assert!(!graded.passed());
    }

    #[test]
    fn score_stays_in_bounds() {
        for correct in 0..=10 {
            for total in 1..=10 {
                let s = score_percentage(correct.min(total), total);
                assert!((0..=100).contains(&s));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Grading
    // -----------------------------------------------------------------------

    #[test]
    fn all_correct_scores_hundred() {
        let key = key(&[(1, 10), (2, 20)]);
        let graded = grade_answers(&key, &[answer(1, 10), answer(2, 20)]);
        assert_eq!(graded.correct_count, 2);
        assert_eq!(graded.total_questions, 2);
        assert_eq!(graded.score, 100);
        assert!(graded.passed());
    }

    #[test]
    fn one_wrong_answer_halves_two_question_quiz() {
        let key = key(&[(1, 10), (2, 20)]);
        let graded = grade_answers(&key, &[answer(1, 10), answer(2, 99)]);
        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.score, 50);
        assert!(!graded.passed(), "50 is below the passing threshold");
    }

    #[test]
    fn unanswered_questions_count_as_incorrect() {
        let key = key(&[(1, 10), (2, 20), (3, 30)]);
        let graded = grade_answers(&key, &[answer(1, 10)]);
        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.total_questions, 3);
        assert_eq!(graded.score, 33);
    }

    #[test]
    fn answers_to_unknown_questions_are_ignored() {
        let key = key(&[(1, 10)]);
        let graded = grade_answers(&key, &[answer(999, 10), answer(1, 10)]);
        assert_eq!(graded.correct_count, 1);
        assert_eq!(graded.score, 100);
    }

    #[test]
    fn passing_threshold_is_seventy() {
        let at = GradedAttempt {
            correct_count: 7,
            total_questions: 10,
            score: 70,
        };
        assert!(at.passed());
        let below = GradedAttempt {
            correct_count: 6,
            total_questions: 10,
            score: 69,
        };
        assert!(!below.passed());
    }

    // -----------------------------------------------------------------------
    // Reward tiers
    // -----------------------------------------------------------------------

    fn tiers() -> RewardTiers {
        RewardTiers {
            attempt_1_points: 50,
            attempt_2_points: 20,
            attempt_3_points: 10,
            attempt_4_plus_points: 5,
        }
    }

    #[test]
    fn tier_matches_attempt_ordinal() {
        assert_eq!(points_for_attempt(tiers(), 1, true), 50);
        assert_eq!(points_for_attempt(tiers(), 2, true), 20);
        assert_eq!(points_for_attempt(tiers(), 3, true), 10);
    }

    #[test]
    fn fourth_and_later_attempts_share_a_tier() {
        for ordinal in [4, 5, 17] {
            assert_eq!(points_for_attempt(tiers(), ordinal, true), 5);
        }
    }

    #[test]
    fn failing_attempts_earn_nothing_at_any_ordinal() {
        for ordinal in 1..=6 {
            assert_eq!(points_for_attempt(tiers(), ordinal, false), 0);
        }
    }

    #[test]
    fn unset_rewards_default_to_zero() {
        assert_eq!(points_for_attempt(RewardTiers::default(), 1, true), 0);
    }

    // -----------------------------------------------------------------------
    // Option validation
    // -----------------------------------------------------------------------

    fn opt(text: &str, is_correct: bool) -> OptionInput {
        OptionInput {
            text: text.into(),
            is_correct,
        }
    }

    #[test]
    fn well_formed_options_pass() {
        let options = vec![opt("Paris", true), opt("Lyon", false), opt("Nice", false)];
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn too_few_options_rejected() {
        let options = vec![opt("Only one", true)];
        assert_matches!(validate_options(&options), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_or_multiple_correct_options_rejected() {
        let none_correct = vec![opt("A", false), opt("B", false)];
        assert_matches!(validate_options(&none_correct), Err(CoreError::Validation(_)));

        let two_correct = vec![opt("A", true), opt("B", true)];
        assert_matches!(validate_options(&two_correct), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_option_text_rejected() {
        let options = vec![opt("  ", true), opt("B", false)];
        assert_matches!(validate_options(&options), Err(CoreError::Validation(_)));
    }
}
