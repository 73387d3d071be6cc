use reqwest::Client;
use serde::{Deserialize, Serialize};

use screencheck_core::{AnswerSet, Submission};

use crate::config::CollectorConfig;
use crate::error::SubmitError;
use crate::traits::SubmissionSink;
use crate::types::SubmissionReceipt;

#[derive(Clone)]
pub struct CollectorClient {
    config: CollectorConfig,
    client: Client,
}

impl CollectorClient {
    pub fn new(config: CollectorConfig) -> Result<Self, SubmitError> {
        if config.base_url.trim().is_empty() {
            return Err(SubmitError::Config(
                "collector base url is empty".to_string(),
            ));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn responses_url(&self) -> String {
        format!(
            "{}/api/responses",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl SubmissionSink for CollectorClient {
    fn name(&self) -> &'static str {
        "collector"
    }

    async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt, SubmitError> {
        let payload = SubmitBody {
            responses: WireAnswers::from(&submission.answers),
            prediction: submission.level.as_str().to_string(),
            score: submission.score,
        };

        let res = self
            .client
            .post(self.responses_url())
            .json(&payload)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(SubmitError::Api { status, body });
        }

        let parsed: CreatedReply = res.json().await?;
        if parsed.data.id.is_empty() {
            return Err(SubmitError::InvalidResponse(
                "created record is missing an id".to_string(),
            ));
        }

        Ok(SubmissionReceipt {
            id: parsed.data.id,
            timestamp_ms: parsed.data.timestamp_ms,
        })
    }
}

#[derive(Debug, Serialize)]
struct SubmitBody {
    responses: WireAnswers,
    prediction: String,
    score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireAnswers {
    uses_device_before_sleep: bool,
    difficulty_without_social_media: bool,
    uses_device_during_meals: bool,
    device_distracts_at_work_or_study: bool,
}

impl From<&AnswerSet> for WireAnswers {
    fn from(answers: &AnswerSet) -> Self {
        Self {
            uses_device_before_sleep: answers.uses_device_before_sleep,
            difficulty_without_social_media: answers.difficulty_without_social_media,
            uses_device_during_meals: answers.uses_device_during_meals,
            device_distracts_at_work_or_study: answers.device_distracts_at_work_or_study,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedReply {
    data: CreatedRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedRecord {
    id: String,
    timestamp_ms: u64,
}
