//! Interview lifecycle: start → answer loop → completion.
//!
//! Flow for start: validate → generate questions → get-or-create user →
//! write interview + questions in one transaction → return the first question.
//! Nothing is written when question generation fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::gateway::InterviewGateway;
use crate::interview::repository::InterviewRepository;
use crate::models::interview::{Interview, InterviewResult, NewQuestion, Question, QuestionType};

/// Questions requested per interview.
pub const QUESTIONS_PER_INTERVIEW: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewResponse {
    pub interview_id: i64,
    pub question: Question,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: i64,
    #[serde(default)]
    pub response_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub feedback: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
}

/// Where a submitted question sits in its interview.
#[derive(Debug, PartialEq)]
pub enum Progress<'a> {
    Next(&'a Question),
    Last,
    /// The question is not in its own interview's list.
    Missing,
}

/// Finds the question after `question_id` in an order-sorted list.
pub fn progress_after(questions: &[Question], question_id: i64) -> Progress<'_> {
    match questions.iter().position(|q| q.id == question_id) {
        Some(i) => questions.get(i + 1).map_or(Progress::Last, Progress::Next),
        None => Progress::Missing,
    }
}

/// Mean of the given scores; 0.0 when there are none.
pub fn average_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

fn question_batch(texts: Vec<String>) -> Vec<NewQuestion> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, question_text)| NewQuestion {
            question_text,
            question_type: QuestionType::for_index(i),
            order: i as i32 + 1,
        })
        .collect()
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {field} cannot be empty"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct InterviewOrchestrator {
    repo: Arc<dyn InterviewRepository>,
    gateway: InterviewGateway,
}

impl InterviewOrchestrator {
    pub fn new(repo: Arc<dyn InterviewRepository>, gateway: InterviewGateway) -> Self {
        Self { repo, gateway }
    }

    pub async fn start(
        &self,
        request: StartInterviewRequest,
    ) -> Result<StartInterviewResponse, AppError> {
        require("user_name", &request.user_name)?;
        require("email", &request.email)?;
        require("position", &request.position)?;
        require("difficulty", &request.difficulty)?;

        let texts = self
            .gateway
            .generate_questions(&request.position, &request.difficulty, QUESTIONS_PER_INTERVIEW)
            .await?;

        let user = self
            .repo
            .create_user(&request.user_name, &request.email)
            .await?;

        let (interview, questions) = self
            .repo
            .create_interview_with_questions(
                user.id,
                &request.position,
                &request.difficulty,
                &question_batch(texts),
            )
            .await?;

        info!(
            "Started interview {} for user {} ({} questions)",
            interview.id,
            user.id,
            questions.len()
        );

        let question = questions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::EmptyResult("no questions generated".to_string()))?;

        Ok(StartInterviewResponse {
            interview_id: interview.id,
            question,
        })
    }

    pub async fn submit_answer(
        &self,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, AppError> {
        require("response_text", &request.response_text)?;

        let question = self.repo.get_question(request.question_id).await?;

        let evaluation = self
            .gateway
            .evaluate_answer(&question.question_text, &request.response_text)
            .await?;

        self.repo
            .create_response(
                question.id,
                &request.response_text,
                &evaluation.feedback,
                Some(evaluation.score),
            )
            .await?;

        let questions = self.repo.get_interview_questions(question.interview_id).await?;

        let (next_question, final_feedback) = match progress_after(&questions, question.id) {
            Progress::Next(next) => (Some(next.clone()), None),
            Progress::Last => {
                let interview = self.complete(question.interview_id, &questions).await?;
                (None, interview.final_feedback)
            }
            Progress::Missing => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "question {} is not part of interview {}",
                    question.id,
                    question.interview_id
                )))
            }
        };

        Ok(SubmitAnswerResponse {
            feedback: evaluation.feedback,
            score: evaluation.score,
            completed: next_question.is_none(),
            next_question,
            final_feedback,
        })
    }

    /// Averages the first-found score of each question, asks for a closing
    /// summary, then moves the interview to completed. A concurrent submit that
    /// already completed it wins; its stored state is returned.
    async fn complete(&self, interview_id: i64, questions: &[Question]) -> Result<Interview, AppError> {
        let mut scores = Vec::with_capacity(questions.len());
        for question in questions {
            let responses = self.repo.get_question_responses(question.id).await?;
            if let Some(score) = responses.first().and_then(|r| r.score) {
                scores.push(score);
            }
        }
        let average = average_score(&scores);

        let interview = self.repo.get_interview(interview_id).await?;
        if interview.is_completed() {
            return Ok(interview);
        }

        let summary = match self
            .gateway
            .generate_final_feedback(&interview.position, average, questions.len())
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Final feedback for interview {interview_id} unavailable: {e}");
                None
            }
        };

        match self
            .repo
            .complete_interview(interview_id, average, summary.as_deref())
            .await?
        {
            Some(completed) => {
                info!("Interview {interview_id} completed with average score {average:.2}");
                Ok(completed)
            }
            None => {
                warn!("Interview {interview_id} was completed by a concurrent submission");
                self.repo.get_interview(interview_id).await
            }
        }
    }

    pub async fn get_interview(&self, interview_id: i64) -> Result<InterviewResult, AppError> {
        self.repo.get_interview_result(interview_id).await
    }

    pub async fn get_user_interviews(&self, email: &str) -> Result<Vec<Interview>, AppError> {
        if email.is_empty() {
            return Err(AppError::Validation("Email parameter is required".to_string()));
        }
        let user = self
            .repo
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        self.repo.get_user_interviews(user.id).await
    }
}
