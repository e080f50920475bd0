//! In-memory test doubles for the model and the repository.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::llm_client::{LlmError, TextModel};
use crate::models::interview::{
    Interview, NewQuestion, Question, Response, STATUS_COMPLETED, STATUS_IN_PROGRESS,
};
use crate::models::user::User;

use super::repository::InterviewRepository;

/// Replays queued model replies in order and records every prompt.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    replies: Arc<Mutex<VecDeque<Result<Option<String>, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(Some(text.to_string())))
    }

    /// Successful call with zero candidates.
    pub fn empty(self) -> Self {
        self.push(Ok(None))
    }

    pub fn fail(self) -> Self {
        self.push(Err(LlmError::Api {
            status: 503,
            message: "model unavailable".to_string(),
        }))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn push(self, reply: Result<Option<String>, LlmError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    message: "no scripted reply left".to_string(),
                })
            })
    }
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    users: Vec<User>,
    interviews: Vec<Interview>,
    questions: Vec<Question>,
    responses: Vec<Response>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_interview(&mut self, user_id: i64, position: &str, difficulty: &str) -> Interview {
        let interview = Interview {
            id: self.next_id(),
            user_id,
            position: position.to_string(),
            difficulty: difficulty.to_string(),
            status: STATUS_IN_PROGRESS.to_string(),
            score: None,
            final_feedback: None,
            started_at: Utc::now(),
            completed_at: None,
        };
        self.interviews.push(interview.clone());
        interview
    }

    fn insert_question(&mut self, interview_id: i64, question: &NewQuestion) -> Question {
        let question = Question {
            id: self.next_id(),
            interview_id,
            question_text: question.question_text.clone(),
            question_type: question.question_type.as_str().to_string(),
            order: question.order,
            created_at: Utc::now(),
        };
        self.questions.push(question.clone());
        question
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interview_count(&self) -> usize {
        self.state.lock().unwrap().interviews.len()
    }

    pub fn response_count(&self) -> usize {
        self.state.lock().unwrap().responses.len()
    }
}

#[async_trait]
impl InterviewRepository for MemoryRepository {
    async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.users.iter().find(|u| u.email == email) {
            return Ok(existing.clone());
        }
        let user = User {
            id: state.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_interview_with_questions(
        &self,
        user_id: i64,
        position: &str,
        difficulty: &str,
        questions: &[NewQuestion],
    ) -> Result<(Interview, Vec<Question>), AppError> {
        let mut state = self.state.lock().unwrap();
        let interview = state.insert_interview(user_id, position, difficulty);
        let stored = questions
            .iter()
            .map(|q| state.insert_question(interview.id, q))
            .collect();
        Ok((interview, stored))
    }

    async fn get_interview(&self, id: i64) -> Result<Interview, AppError> {
        let state = self.state.lock().unwrap();
        state
            .interviews
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
    }

    async fn complete_interview(
        &self,
        id: i64,
        score: f64,
        final_feedback: Option<&str>,
    ) -> Result<Option<Interview>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(interview) = state
            .interviews
            .iter_mut()
            .find(|i| i.id == id && i.status == STATUS_IN_PROGRESS)
        else {
            return Ok(None);
        };
        interview.status = STATUS_COMPLETED.to_string();
        interview.score = Some(score);
        interview.final_feedback = final_feedback.map(str::to_string);
        interview.completed_at = Some(Utc::now());
        Ok(Some(interview.clone()))
    }

    async fn get_user_interviews(&self, user_id: i64) -> Result<Vec<Interview>, AppError> {
        let state = self.state.lock().unwrap();
        let mut interviews: Vec<_> = state
            .interviews
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        interviews.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        Ok(interviews)
    }

    async fn get_question(&self, id: i64) -> Result<Question, AppError> {
        let state = self.state.lock().unwrap();
        state
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))
    }

    async fn get_interview_questions(&self, interview_id: i64) -> Result<Vec<Question>, AppError> {
        let state = self.state.lock().unwrap();
        let mut questions: Vec<_> = state
            .questions
            .iter()
            .filter(|q| q.interview_id == interview_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn create_response(
        &self,
        question_id: i64,
        response_text: &str,
        feedback: &str,
        score: Option<f64>,
    ) -> Result<Response, AppError> {
        let mut state = self.state.lock().unwrap();
        let response = Response {
            id: state.next_id(),
            question_id,
            response_text: response_text.to_string(),
            feedback: feedback.to_string(),
            score,
            created_at: Utc::now(),
        };
        state.responses.push(response.clone());
        Ok(response)
    }

    async fn get_question_responses(&self, question_id: i64) -> Result<Vec<Response>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .responses
            .iter()
            .filter(|r| r.question_id == question_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::QuestionType;

    fn new_question(order: i32) -> NewQuestion {
        NewQuestion {
            question_text: format!("Question {order}?"),
            question_type: QuestionType::for_index(order as usize - 1),
            order,
        }
    }

    #[tokio::test]
    async fn test_create_user_is_idempotent_on_email() {
        let repo = MemoryRepository::new();
        let first = repo.create_user("Ada", "ada@example.com").await.unwrap();
        let second = repo.create_user("Someone Else", "ada@example.com").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Ada");
    }

    #[tokio::test]
    async fn test_interview_result_without_responses_is_empty_list() {
        let repo = MemoryRepository::new();
        let user = repo.create_user("Ada", "ada@example.com").await.unwrap();
        let (interview, _) = repo
            .create_interview_with_questions(user.id, "Engineer", "easy", &[new_question(1)])
            .await
            .unwrap();

        let result = repo.get_interview_result(interview.id).await.unwrap();
        assert_eq!(result.questions.len(), 1);
        assert!(result.responses.is_empty());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["responses"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_interview_result_flattens_responses() {
        let repo = MemoryRepository::new();
        let user = repo.create_user("Ada", "ada@example.com").await.unwrap();
        let (interview, questions) = repo
            .create_interview_with_questions(
                user.id,
                "Engineer",
                "easy",
                &[new_question(1), new_question(2)],
            )
            .await
            .unwrap();
        for q in &questions {
            repo.create_response(q.id, "answer", "ok", Some(6.0)).await.unwrap();
        }

        let result = repo.get_interview_result(interview.id).await.unwrap();
        assert_eq!(result.responses.len(), 2);
    }

    #[tokio::test]
    async fn test_complete_interview_only_once() {
        let repo = MemoryRepository::new();
        let (interview, _) = repo
            .create_interview_with_questions(1, "Engineer", "easy", &[new_question(1)])
            .await
            .unwrap();
        let completed = repo
            .complete_interview(interview.id, 7.0, Some("Hire."))
            .await
            .unwrap()
            .unwrap();
        assert!(completed.is_completed());
        assert!(completed.completed_at.is_some());
        assert!(repo.complete_interview(interview.id, 3.0, None).await.unwrap().is_none());
        assert_eq!(repo.get_interview(interview.id).await.unwrap().score, Some(7.0));
        assert!(repo.complete_interview(999, 1.0, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_questions_ordered_by_order() {
        let repo = MemoryRepository::new();
        let (interview, _) = repo
            .create_interview_with_questions(
                1,
                "Engineer",
                "easy",
                &[new_question(2), new_question(1)],
            )
            .await
            .unwrap();
        let orders: Vec<_> = repo
            .get_interview_questions(interview.id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.order)
            .collect();
        assert_eq!(orders, vec![1, 2]);
    }
}
