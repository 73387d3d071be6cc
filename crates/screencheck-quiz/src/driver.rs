//! Synchronous driver wiring the quiz session to a submission sink.

use std::sync::Arc;

use screencheck_client::{SubmissionReceipt, SubmissionSink, SubmitError};
use screencheck_core::{
    QuizSession, QuizState, ScoreResult, Submission, Transition, QUESTION_COUNT, QUESTION_TEXTS,
};

/// One question as presented to the person taking the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPrompt {
    /// 1-based position, for "Question 2 of 4" style display.
    pub number: usize,
    pub total: usize,
    pub text: &'static str,
}

#[derive(Debug)]
pub enum DeliveryReport {
    Accepted(SubmissionReceipt),
    Failed(String),
}

/// Outcome of the answer that finished a session. The result is always
/// present; delivery is absent when the session ended without a submission.
#[derive(Debug)]
pub struct SessionReport {
    pub result: ScoreResult,
    pub delivery: Option<DeliveryReport>,
}

pub struct QuizDriver {
    session: QuizSession,
    sink: Arc<dyn SubmissionSink>,
}

impl QuizDriver {
    pub fn new(sink: Arc<dyn SubmissionSink>) -> Self {
        Self {
            session: QuizSession::new(),
            sink,
        }
    }

    pub fn question(&self) -> Option<QuestionPrompt> {
        match *self.session.state() {
            QuizState::AskingQuestion(index) => {
                QUESTION_TEXTS.get(index).copied().map(|text| QuestionPrompt {
                    number: index + 1,
                    total: QUESTION_COUNT,
                    text,
                })
            }
            QuizState::Completed(_) => None,
        }
    }

    pub fn recap(&self) -> Vec<(&'static str, Option<bool>)> {
        QUESTION_TEXTS
            .iter()
            .copied()
            .zip(self.session.answers())
            .collect()
    }

    /// Records one answer. On the finishing answer the result is handed to
    /// `show_result` first and only then delivered to the sink, so a failed
    /// delivery can never take the result away from the person who earned it.
    pub fn answer(
        &mut self,
        answer: bool,
        show_result: impl FnOnce(&ScoreResult),
    ) -> Option<SessionReport> {
        let step = std::mem::take(&mut self.session).answer(answer);
        self.session = step.session;
        match step.transition {
            Transition::AskNext(_) => None,
            Transition::Finished(completion) => {
                show_result(&completion.result);
                let delivery = completion
                    .submission
                    .map(|submission| self.deliver(submission));
                Some(SessionReport {
                    result: completion.result,
                    delivery,
                })
            }
        }
    }

    pub fn reset(&mut self) {
        self.session = std::mem::take(&mut self.session).reset();
    }

    fn deliver(&self, submission: Submission) -> DeliveryReport {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(err) => {
                return DeliveryReport::Failed(format!(
                    "delivery runtime initialization failed: {err}"
                ))
            }
        };
        match rt.block_on(async { self.sink.submit(submission).await }) {
            Ok(receipt) => DeliveryReport::Accepted(receipt),
            Err(err) => DeliveryReport::Failed(describe_submit_error(&err)),
        }
    }
}

fn describe_submit_error(err: &SubmitError) -> String {
    match err {
        SubmitError::Api { status, .. } => format!("collector rejected the submission ({status})"),
        other => other.to_string(),
    }
}
