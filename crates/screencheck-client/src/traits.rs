use async_trait::async_trait;

use screencheck_core::Submission;

use crate::error::SubmitError;
use crate::types::SubmissionReceipt;

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt, SubmitError>;
}
