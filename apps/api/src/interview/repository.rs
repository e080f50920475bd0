//! Persistence for users, interviews, questions, and responses.
//!
//! `InterviewRepository` is carried in `AppState` as `Arc<dyn InterviewRepository>`.
//! `PgRepository` is the production backend. Every insert reads its row back
//! with `RETURNING`, so timestamps always come from the database.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::interview::{
    Interview, InterviewResult, NewQuestion, Question, Response, STATUS_COMPLETED,
    STATUS_IN_PROGRESS,
};
use crate::models::user::User;

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// Get-or-create by email. An existing user is returned unchanged, whatever `name` says.
    async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Writes an interview and its question batch atomically.
    async fn create_interview_with_questions(
        &self,
        user_id: i64,
        position: &str,
        difficulty: &str,
        questions: &[NewQuestion],
    ) -> Result<(Interview, Vec<Question>), AppError>;

    async fn get_interview(&self, id: i64) -> Result<Interview, AppError>;

    /// Moves an in-progress interview to completed. Returns `None` when the
    /// interview was no longer in progress.
    async fn complete_interview(
        &self,
        id: i64,
        score: f64,
        final_feedback: Option<&str>,
    ) -> Result<Option<Interview>, AppError>;

    /// Most recent first.
    async fn get_user_interviews(&self, user_id: i64) -> Result<Vec<Interview>, AppError>;

    async fn get_question(&self, id: i64) -> Result<Question, AppError>;

    /// Ordered by `order` ascending.
    async fn get_interview_questions(&self, interview_id: i64) -> Result<Vec<Question>, AppError>;

    async fn create_response(
        &self,
        question_id: i64,
        response_text: &str,
        feedback: &str,
        score: Option<f64>,
    ) -> Result<Response, AppError>;

    /// Earliest first; index 0 is the "first-found" response.
    async fn get_question_responses(&self, question_id: i64) -> Result<Vec<Response>, AppError>;

    /// Interview, its ordered questions, and every response across them.
    async fn get_interview_result(&self, interview_id: i64) -> Result<InterviewResult, AppError> {
        let interview = self.get_interview(interview_id).await?;
        let questions = self.get_interview_questions(interview_id).await?;
        let mut responses = Vec::new();
        for question in &questions {
            responses.extend(self.get_question_responses(question.id).await?);
        }
        Ok(InterviewResult {
            interview,
            questions,
            responses,
        })
    }
}

fn interview_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}

/// Postgres-backed repository.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an in-progress interview. Runs on the pool or inside a transaction.
    pub async fn create_interview<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        position: &str,
        difficulty: &str,
    ) -> Result<Interview, AppError> {
        let interview = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (user_id, position, difficulty, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(position)
        .bind(difficulty)
        .bind(STATUS_IN_PROGRESS)
        .fetch_one(executor)
        .await?;
        Ok(interview)
    }

    pub async fn create_question<'e, E: PgExecutor<'e>>(
        executor: E,
        interview_id: i64,
        question: &NewQuestion,
    ) -> Result<Question, AppError> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (interview_id, question_text, question_type, order_num)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(interview_id)
        .bind(&question.question_text)
        .bind(question.question_type.as_str())
        .bind(question.order)
        .fetch_one(executor)
        .await?;
        Ok(question)
    }
}

#[async_trait]
impl InterviewRepository for PgRepository {
    async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError> {
        if let Some(existing) = self.get_user_by_email(email).await? {
            return Ok(existing);
        }

        // A concurrent insert of the same email wins the conflict; read it back.
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(user) => {
                info!("Created user {} ({})", user.id, user.email);
                Ok(user)
            }
            None => self
                .get_user_by_email(email)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {email} not found"))),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_interview_with_questions(
        &self,
        user_id: i64,
        position: &str,
        difficulty: &str,
        questions: &[NewQuestion],
    ) -> Result<(Interview, Vec<Question>), AppError> {
        let mut tx = self.pool.begin().await?;

        let interview = Self::create_interview(&mut *tx, user_id, position, difficulty).await?;
        let mut stored = Vec::with_capacity(questions.len());
        for question in questions {
            stored.push(Self::create_question(&mut *tx, interview.id, question).await?);
        }

        tx.commit().await?;
        info!(
            "Created interview {} with {} questions for user {user_id}",
            interview.id,
            stored.len()
        );
        Ok((interview, stored))
    }

    async fn get_interview(&self, id: i64) -> Result<Interview, AppError> {
        sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| interview_not_found(id))
    }

    async fn complete_interview(
        &self,
        id: i64,
        score: f64,
        final_feedback: Option<&str>,
    ) -> Result<Option<Interview>, AppError> {
        let completed = sqlx::query_as::<_, Interview>(
            r#"
            UPDATE interviews
            SET status = $2, score = $3, final_feedback = $4, completed_at = NOW()
            WHERE id = $1 AND status = $5
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(STATUS_COMPLETED)
        .bind(score)
        .bind(final_feedback)
        .bind(STATUS_IN_PROGRESS)
        .fetch_optional(&self.pool)
        .await?;
        Ok(completed)
    }

    async fn get_user_interviews(&self, user_id: i64) -> Result<Vec<Interview>, AppError> {
        let interviews = sqlx::query_as::<_, Interview>(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY started_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    async fn get_question(&self, id: i64) -> Result<Question, AppError> {
        sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))
    }

    async fn get_interview_questions(&self, interview_id: i64) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE interview_id = $1 ORDER BY order_num",
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn create_response(
        &self,
        question_id: i64,
        response_text: &str,
        feedback: &str,
        score: Option<f64>,
    ) -> Result<Response, AppError> {
        let response = sqlx::query_as::<_, Response>(
            r#"
            INSERT INTO responses (question_id, response_text, feedback, score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(question_id)
        .bind(response_text)
        .bind(feedback)
        .bind(score)
        .fetch_one(&self.pool)
        .await?;
        Ok(response)
    }

    async fn get_question_responses(&self, question_id: i64) -> Result<Vec<Response>, AppError> {
        let responses = sqlx::query_as::<_, Response>(
            "SELECT * FROM responses WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(responses)
    }

    async fn get_interview_result(&self, interview_id: i64) -> Result<InterviewResult, AppError> {
        let interview = self.get_interview(interview_id).await?;
        let questions = self.get_interview_questions(interview_id).await?;
        let responses = sqlx::query_as::<_, Response>(
            r#"
            SELECT r.*
            FROM responses r
            JOIN questions q ON q.id = r.question_id
            WHERE q.interview_id = $1
            ORDER BY q.order_num, r.id
            "#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(InterviewResult {
            interview,
            questions,
            responses,
        })
    }
}
