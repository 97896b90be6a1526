//! Exam attempt payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A question presented during a test attempt.
///
/// Question bodies vary by test type; the client passes them through to the
/// embedder untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(flatten)]
    pub body: Value,
}

/// Response to `POST /exams/tests/{id}/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTestResponse {
    pub attempt_id: String,
    pub test_title: String,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
}

/// A single answer inside a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub selected_answer: String,
}

/// Payload for `POST /exams/tests/submit/{attempt_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTestRequest {
    pub answers: Vec<Answer>,
}
