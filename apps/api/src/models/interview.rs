use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

/// Question category, assigned by position in the generated batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    Coding,
}

/// Type pattern applied to a freshly generated batch, by 0-based index.
const TYPE_PATTERN: [QuestionType; 5] = [
    QuestionType::Technical,
    QuestionType::Behavioral,
    QuestionType::Technical,
    QuestionType::Coding,
    QuestionType::Behavioral,
];

impl QuestionType {
    /// Index 5 and beyond fall back to `Technical`.
    pub fn for_index(index: usize) -> Self {
        TYPE_PATTERN
            .get(index)
            .copied()
            .unwrap_or(QuestionType::Technical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Behavioral => "behavioral",
            QuestionType::Coding => "coding",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i64,
    pub user_id: i64,
    pub position: String,
    pub difficulty: String,
    /// "in_progress" | "completed"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Interview {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub interview_id: i64,
    pub question_text: String,
    /// "technical" | "behavioral" | "coding"
    pub question_type: String,
    /// 1-based, unique per interview.
    #[sqlx(rename = "order_num")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Response {
    pub id: i64,
    pub question_id: i64,
    pub response_text: String,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A question waiting to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub order: i32,
}

/// Full trail of one interview.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewResult {
    pub interview: Interview,
    pub questions: Vec<Question>,
    pub responses: Vec<Response>,
}
