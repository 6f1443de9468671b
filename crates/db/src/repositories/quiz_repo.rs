//! Repository for quizzes, questions, options, rewards, and attempts.
//!
//! The two multi-statement writes in this module -- option replacement and
//! attempt submission -- each run inside a single transaction, so a failure
//! at any step leaves no partial option set and no half-recorded attempt.

use learnhub_core::quiz::{
    grade_answers, points_for_attempt, AnswerKeyEntry, OptionInput, RewardTiers, SubmittedAnswer,
};
use learnhub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::quiz::{
    CreateQuiz, Question, QuestionOption, QuestionWithOptions, Quiz, QuizAttempt, QuizFull,
    QuizRewards, SetRewards, SubmissionResult,
};

const QUIZ_COLUMNS: &str = "id, course_id, title, created_by, created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, quiz_id, question_text, order_index";

const OPTION_COLUMNS: &str = "id, question_id, option_text, is_correct, order_index";

const REWARD_COLUMNS: &str = "id, quiz_id, attempt_1_points, attempt_2_points, \
                              attempt_3_points, attempt_4_plus_points";

const ATTEMPT_COLUMNS: &str =
    "id, quiz_id, user_id, score, attempt_number, points_earned, status, completed_at";

pub struct QuizRepo;

impl QuizRepo {
    /// Insert a new quiz for a course.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuiz,
        created_by: DbId,
    ) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (course_id, title, created_by)
             VALUES ($1, $2, $3)
             RETURNING {QUIZ_COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a quiz by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the quiz owning a question, for authorization checks.
    pub async fn find_by_question(
        pool: &PgPool,
        question_id: DbId,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        sqlx::query_as::<_, Quiz>(
            "SELECT q.id, q.course_id, q.title, q.created_by, q.created_at, q.updated_at
             FROM quizzes q
             JOIN quiz_questions qq ON qq.quiz_id = q.id
             WHERE qq.id = $1",
        )
        .bind(question_id)
        .fetch_optional(pool)
        .await
    }

    /// Add a question with its option set, atomically.
    pub async fn add_question(
        pool: &PgPool,
        quiz_id: DbId,
        question_text: &str,
        order_index: i32,
        options: &[OptionInput],
    ) -> Result<Question, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO quiz_questions (quiz_id, question_text, order_index)
             VALUES ($1, $2, $3)
             RETURNING {QUESTION_COLUMNS}"
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .bind(question_text)
            .bind(order_index)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_options(&mut tx, question.id, options).await?;

        tx.commit().await?;
        Ok(question)
    }

    /// Replace a question's text and its entire option set.
    ///
    /// Options are deleted and reinserted rather than diffed: option
    /// identity is not preserved across edits, but the set can never be
    /// half-updated.
    pub async fn update_question(
        pool: &PgPool,
        question_id: DbId,
        question_text: &str,
        options: &[OptionInput],
    ) -> Result<Option<Question>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE quiz_questions SET question_text = $2
             WHERE id = $1
             RETURNING {QUESTION_COLUMNS}"
        );
        let Some(question) = sqlx::query_as::<_, Question>(&query)
            .bind(question_id)
            .bind(question_text)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM quiz_options WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        Self::insert_options(&mut tx, question_id, options).await?;

        tx.commit().await?;
        Ok(Some(question))
    }

    async fn insert_options(
        tx: &mut Transaction<'_, Postgres>,
        question_id: DbId,
        options: &[OptionInput],
    ) -> Result<(), sqlx::Error> {
        for (index, option) in options.iter().enumerate() {
            sqlx::query(
                "INSERT INTO quiz_options (question_id, option_text, is_correct, order_index)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(question_id)
            .bind(&option.text)
            .bind(option.is_correct)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Delete a question; its options cascade. Returns `true` on deletion.
    pub async fn delete_question(pool: &PgPool, question_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quiz_questions WHERE id = $1")
            .bind(question_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Upsert the reward tiers for a quiz. All four values are replaced
    /// together; there is no partial-tier update.
    pub async fn set_rewards(
        pool: &PgPool,
        quiz_id: DbId,
        input: &SetRewards,
    ) -> Result<QuizRewards, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_rewards (quiz_id, attempt_1_points, attempt_2_points,
                                       attempt_3_points, attempt_4_plus_points)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (quiz_id) DO UPDATE SET
                 attempt_1_points = EXCLUDED.attempt_1_points,
                 attempt_2_points = EXCLUDED.attempt_2_points,
                 attempt_3_points = EXCLUDED.attempt_3_points,
                 attempt_4_plus_points = EXCLUDED.attempt_4_plus_points
             RETURNING {REWARD_COLUMNS}"
        );
        sqlx::query_as::<_, QuizRewards>(&query)
            .bind(quiz_id)
            .bind(input.attempt_1_points)
            .bind(input.attempt_2_points)
            .bind(input.attempt_3_points)
            .bind(input.attempt_4_plus_points)
            .fetch_one(pool)
            .await
    }

    /// Fetch a quiz with ordered questions, their options, and rewards.
    pub async fn find_full(pool: &PgPool, quiz_id: DbId) -> Result<Option<QuizFull>, sqlx::Error> {
        let Some(quiz) = Self::find_by_id(pool, quiz_id).await? else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM quiz_questions
             WHERE quiz_id = $1
             ORDER BY order_index ASC, id ASC"
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

        let query = format!(
            "SELECT {OPTION_COLUMNS} FROM quiz_options
             WHERE question_id IN (SELECT id FROM quiz_questions WHERE quiz_id = $1)
             ORDER BY order_index ASC, id ASC"
        );
        let options = sqlx::query_as::<_, QuestionOption>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

        let mut questions: Vec<QuestionWithOptions> = questions
            .into_iter()
            .map(|question| QuestionWithOptions {
                question,
                options: Vec::new(),
            })
            .collect();
        for option in options {
            if let Some(entry) = questions
                .iter_mut()
                .find(|entry| entry.question.id == option.question_id)
            {
                entry.options.push(option);
            }
        }

        let rewards = Self::rewards_for(pool, quiz_id).await?;

        Ok(Some(QuizFull {
            quiz,
            questions,
            rewards,
        }))
    }

    /// Fetch the reward tiers for a quiz, if configured.
    pub async fn rewards_for(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Option<QuizRewards>, sqlx::Error> {
        let query = format!("SELECT {REWARD_COLUMNS} FROM quiz_rewards WHERE quiz_id = $1");
        sqlx::query_as::<_, QuizRewards>(&query)
            .bind(quiz_id)
            .fetch_optional(pool)
            .await
    }

    /// Grade and persist one attempt, all-or-nothing.
    ///
    /// A single transaction covers the answer-key read, the attempt-ordinal
    /// count, the attempt insert, and (on a pass) the auto-completion of the
    /// course's QUIZ lesson. Counting the ordinal inside the transaction
    /// keeps concurrent submissions from the same user from sharing an
    /// ordinal under stricter isolation.
    pub async fn submit_attempt(
        pool: &PgPool,
        quiz: &Quiz,
        user_id: DbId,
        answers: &[SubmittedAnswer],
    ) -> Result<SubmissionResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Answer key: the single correct option per question.
        let key: Vec<(DbId, DbId)> = sqlx::query_as(
            "SELECT q.id, o.id
             FROM quiz_questions q
             JOIN quiz_options o ON o.question_id = q.id
             WHERE q.quiz_id = $1 AND o.is_correct = TRUE",
        )
        .bind(quiz.id)
        .fetch_all(&mut *tx)
        .await?;
        let key: Vec<AnswerKeyEntry> = key
            .into_iter()
            .map(|(question_id, correct_option_id)| AnswerKeyEntry {
                question_id,
                correct_option_id,
            })
            .collect();

        let graded = grade_answers(&key, answers);

        let prior_attempts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1 AND quiz_id = $2",
        )
        .bind(user_id)
        .bind(quiz.id)
        .fetch_one(&mut *tx)
        .await?;
        let attempt_number = prior_attempts as i32 + 1;

        let query = format!("SELECT {REWARD_COLUMNS} FROM quiz_rewards WHERE quiz_id = $1");
        let tiers = sqlx::query_as::<_, QuizRewards>(&query)
            .bind(quiz.id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|rewards| rewards.tiers())
            .unwrap_or(RewardTiers::default());

        let points_earned = points_for_attempt(tiers, attempt_number, graded.passed());

        let query = format!(
            "INSERT INTO quiz_attempts (quiz_id, user_id, score, attempt_number,
                                        status, points_earned, completed_at)
             VALUES ($1, $2, $3, $4, 'GRADED', $5, now())
             RETURNING {ATTEMPT_COLUMNS}"
        );
        let attempt = sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz.id)
            .bind(user_id)
            .bind(graded.score)
            .bind(attempt_number)
            .bind(points_earned)
            .fetch_one(&mut *tx)
            .await?;

        // A passing attempt completes the course's QUIZ lesson, which is how
        // quiz results feed into the completion percentage.
        if graded.passed() {
            let quiz_lesson: Option<DbId> = sqlx::query_scalar(
                "SELECT id FROM lessons
                 WHERE course_id = $1 AND lesson_type = 'QUIZ'
                 ORDER BY order_index ASC, id ASC
                 LIMIT 1",
            )
            .bind(quiz.course_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(lesson_id) = quiz_lesson {
                sqlx::query(
                    "INSERT INTO lesson_progress (user_id, lesson_id, course_id,
                                                  completed, completed_at)
                     VALUES ($1, $2, $3, TRUE, now())
                     ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                         completed = TRUE,
                         completed_at = COALESCE(lesson_progress.completed_at, now())",
                )
                .bind(user_id)
                .bind(lesson_id)
                .bind(quiz.course_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(SubmissionResult {
            attempt,
            correct_count: graded.correct_count,
            total_questions: graded.total_questions,
            score: graded.score,
        })
    }
}
