//! Quiz, question, option, reward, and attempt models.

use learnhub_core::quiz::RewardTiers;
use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quizzes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `quiz_questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub quiz_id: DbId,
    pub question_text: String,
    pub order_index: i32,
}

/// A row from the `quiz_options` table.
///
/// `is_correct` is serialized; the quiz handler strips it for learners by
/// projecting into [`OptionPublic`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionOption {
    pub id: DbId,
    pub question_id: DbId,
    pub option_text: String,
    pub is_correct: bool,
    pub order_index: i32,
}

/// Option as exposed to a learner taking the quiz (no correctness flag).
#[derive(Debug, Clone, Serialize)]
pub struct OptionPublic {
    pub id: DbId,
    pub option_text: String,
    pub order_index: i32,
}

impl From<QuestionOption> for OptionPublic {
    fn from(option: QuestionOption) -> Self {
        Self {
            id: option.id,
            option_text: option.option_text,
            order_index: option.order_index,
        }
    }
}

/// A question with its full option rows (authoring view).
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

/// A row from the `quiz_rewards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizRewards {
    pub id: DbId,
    pub quiz_id: DbId,
    pub attempt_1_points: i32,
    pub attempt_2_points: i32,
    pub attempt_3_points: i32,
    pub attempt_4_plus_points: i32,
}

impl QuizRewards {
    pub fn tiers(&self) -> RewardTiers {
        RewardTiers {
            attempt_1_points: self.attempt_1_points,
            attempt_2_points: self.attempt_2_points,
            attempt_3_points: self.attempt_3_points,
            attempt_4_plus_points: self.attempt_4_plus_points,
        }
    }
}

/// An immutable row from the `quiz_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAttempt {
    pub id: DbId,
    pub quiz_id: DbId,
    pub user_id: DbId,
    pub score: i32,
    pub attempt_number: i32,
    pub points_earned: i32,
    pub status: String,
    pub completed_at: Timestamp,
}

/// Everything needed to render a quiz: the quiz, its ordered questions with
/// options, and its reward tiers (if configured).
#[derive(Debug, Serialize)]
pub struct QuizFull {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithOptions>,
    pub rewards: Option<QuizRewards>,
}

/// The result of a graded submission, returned to the caller so the results
/// screen needs no recomputation.
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub attempt: QuizAttempt,
    pub correct_count: i32,
    pub total_questions: i32,
    pub score: i32,
}

/// DTO for creating a quiz.
#[derive(Debug, Deserialize)]
pub struct CreateQuiz {
    pub course_id: DbId,
    pub title: String,
}

/// DTO for setting reward tiers; all four values are replaced together.
#[derive(Debug, Deserialize)]
pub struct SetRewards {
    #[serde(default)]
    pub attempt_1_points: i32,
    #[serde(default)]
    pub attempt_2_points: i32,
    #[serde(default)]
    pub attempt_3_points: i32,
    #[serde(default)]
    pub attempt_4_plus_points: i32,
}
