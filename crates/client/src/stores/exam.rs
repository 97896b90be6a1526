//! Test attempt lifecycle.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};
use tutorhub_protocol::{Answer, Question, StartTestResponse, SubmitTestRequest};

use crate::http::ApiClient;
use crate::session::OpOutcome;

/// Metadata for the test the active attempt belongs to.
#[derive(Debug, Clone)]
pub struct TestDetails {
    pub title: String,
    pub duration_minutes: u32,
}

#[derive(Default)]
struct ExamState {
    attempt_id: Option<String>,
    questions: Vec<Question>,
    details: Option<TestDetails>,
    answers: BTreeMap<String, String>,
    final_result: Option<Value>,
}

/// Drives a single test attempt at a time: start, answer, submit.
pub struct ExamStore {
    api: ApiClient,
    state: Mutex<ExamState>,
}

impl ExamStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(ExamState::default()),
        }
    }

    pub fn attempt_id(&self) -> Option<String> {
        self.state.lock().attempt_id.clone()
    }

    pub fn questions(&self) -> Vec<Question> {
        self.state.lock().questions.clone()
    }

    pub fn details(&self) -> Option<TestDetails> {
        self.state.lock().details.clone()
    }

    pub fn answers(&self) -> BTreeMap<String, String> {
        self.state.lock().answers.clone()
    }

    pub fn final_result(&self) -> Option<Value> {
        self.state.lock().final_result.clone()
    }

    /// Starts an attempt for `test_id`, replacing any previous attempt and
    /// discarding its answers and result.
    pub async fn start_test(&self, test_id: &str) -> OpOutcome {
        let path = format!("/exams/tests/{test_id}/start");
        match self.api.post_empty::<StartTestResponse>(&path).await {
            Ok(response) => {
                debug!(
                    target = "tutorhub.exam",
                    attempt_id = %response.attempt_id,
                    questions = response.questions.len(),
                    "test attempt started"
                );
                let mut state = self.state.lock();
                state.attempt_id = Some(response.attempt_id);
                state.questions = response.questions;
                state.details = Some(TestDetails {
                    title: response.test_title,
                    duration_minutes: response.duration_minutes,
                });
                state.answers.clear();
                state.final_result = None;
                OpOutcome::ok()
            }
            Err(err) => {
                warn!(target = "tutorhub.exam", error = %err, "failed to start test");
                OpOutcome::fail(err.user_message())
            }
        }
    }

    /// Records (or overwrites) the answer for one question.
    pub fn record_answer(&self, question_id: &str, selected_answer: &str) {
        self.state
            .lock()
            .answers
            .insert(question_id.to_string(), selected_answer.to_string());
    }

    /// Submits the recorded answers for the active attempt.
    ///
    /// On success the raw grading payload is stored and the attempt is
    /// cleared; the result stays readable until the next `start_test`.
    pub async fn submit_test(&self) -> OpOutcome {
        let (attempt_id, answers) = {
            let state = self.state.lock();
            let Some(attempt_id) = state.attempt_id.clone() else {
                return OpOutcome::fail("No active test attempt.");
            };
            let answers = state
                .answers
                .iter()
                .map(|(question_id, selected_answer)| Answer {
                    question_id: question_id.clone(),
                    selected_answer: selected_answer.clone(),
                })
                .collect();
            (attempt_id, answers)
        };

        let request = SubmitTestRequest { answers };
        let path = format!("/exams/tests/submit/{attempt_id}");
        match self.api.post_json::<_, Value>(&path, &request).await {
            Ok(result) => {
                debug!(target = "tutorhub.exam", attempt_id = %attempt_id, "test submitted");
                let mut state = self.state.lock();
                state.final_result = Some(result);
                state.attempt_id = None;
                state.questions.clear();
                OpOutcome::ok()
            }
            Err(err) => {
                warn!(target = "tutorhub.exam", error = %err, "test submission failed");
                OpOutcome::fail(match &err {
                    crate::error::Error::Api { message, .. } => message.clone(),
                    _ => "Submission failed.".to_string(),
                })
            }
        }
    }
}
