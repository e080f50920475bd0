//! Language-model gateway: prompt → model call → text extraction for each
//! interview operation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::parser::{parse_evaluation, parse_questions, Evaluation};
use crate::interview::prompts::{evaluation_prompt, final_feedback_prompt, questions_prompt};
use crate::llm_client::TextModel;

const FALLBACK_FINAL_FEEDBACK: &str = "Thank you for completing the interview.";

#[derive(Clone)]
pub struct InterviewGateway {
    model: Arc<dyn TextModel>,
}

impl InterviewGateway {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Requests `count` questions. The result may hold fewer than requested, never zero.
    pub async fn generate_questions(
        &self,
        position: &str,
        difficulty: &str,
        count: usize,
    ) -> Result<Vec<String>, AppError> {
        let prompt = questions_prompt(position, difficulty, count);
        let text = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Generation(format!("question generation failed: {e}")))?
            .ok_or_else(|| AppError::Generation("no response from model".to_string()))?;

        let questions = parse_questions(&text);
        if questions.is_empty() {
            return Err(AppError::EmptyResult("no questions generated".to_string()));
        }
        if questions.len() < count {
            warn!("Requested {count} questions, model produced {}", questions.len());
        }
        info!("Generated {} questions for {position} ({difficulty})", questions.len());
        Ok(questions)
    }

    /// Scores an answer. Empty model output degrades to a canned evaluation.
    pub async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<Evaluation, AppError> {
        let prompt = evaluation_prompt(question, answer);
        let reply = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Generation(format!("answer evaluation failed: {e}")))?;

        match reply {
            Some(text) => Ok(parse_evaluation(&text).into_evaluation()),
            None => {
                warn!("Model returned no evaluation content; using fallback evaluation");
                Ok(Evaluation::unavailable())
            }
        }
    }

    /// Closing assessment with a hire recommendation. Empty model output degrades
    /// to a canned thank-you.
    pub async fn generate_final_feedback(
        &self,
        position: &str,
        average_score: f64,
        total_questions: usize,
    ) -> Result<String, AppError> {
        let prompt = final_feedback_prompt(position, average_score, total_questions);
        let reply = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Generation(format!("final feedback failed: {e}")))?;

        Ok(match reply.map(|t| t.trim().to_string()) {
            Some(text) if !text.is_empty() => text,
            _ => {
                warn!("Model returned no final feedback; using fallback text");
                FALLBACK_FINAL_FEEDBACK.to_string()
            }
        })
    }
}
