use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredResponse {
    pub id: String,
    pub uses_device_before_sleep: bool,
    pub difficulty_without_social_media: bool,
    pub uses_device_during_meals: bool,
    pub device_distracts_at_work_or_study: bool,
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    pub timestamp_ms: u64,
}

impl StoredResponse {
    pub fn answers_only(&self) -> AnswerProjection {
        AnswerProjection {
            uses_device_before_sleep: self.uses_device_before_sleep,
            difficulty_without_social_media: self.difficulty_without_social_media,
            uses_device_during_meals: self.uses_device_during_meals,
            device_distracts_at_work_or_study: self.device_distracts_at_work_or_study,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub uses_device_before_sleep: bool,
    pub difficulty_without_social_media: bool,
    pub uses_device_during_meals: bool,
    pub device_distracts_at_work_or_study: bool,
    pub prediction: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerProjection {
    pub uses_device_before_sleep: bool,
    pub difficulty_without_social_media: bool,
    pub uses_device_during_meals: bool,
    pub device_distracts_at_work_or_study: bool,
}

pub trait ResponseStore: Send {
    fn create(&mut self, new_response: NewResponse) -> Result<StoredResponse, StorageError>;
    // Newest first.
    fn list(&self) -> Vec<StoredResponse>;
    // Submission order, answer fields only.
    fn export_answers(&self) -> Vec<AnswerProjection>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    responses: Vec<StoredResponse>,
}

pub struct JsonResponseStore {
    path: PathBuf,
    responses: Vec<StoredResponse>,
    next_id: u64,
}

impl JsonResponseStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let persisted = Persisted::default();
            let bytes = serde_json::to_vec_pretty(&persisted)?;
            fs::write(&path, bytes)?;
        }

        let bytes = fs::read(&path)?;
        let persisted: Persisted = serde_json::from_slice(&bytes)?;
        let next_id = persisted
            .responses
            .iter()
            .filter_map(|r| r.id.strip_prefix("resp-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Ok(Self {
            path,
            responses: persisted.responses,
            next_id,
        })
    }

    pub fn create(&mut self, new_response: NewResponse) -> Result<StoredResponse, StorageError> {
        let response = StoredResponse {
            id: format!("resp-{}", self.next_id),
            uses_device_before_sleep: new_response.uses_device_before_sleep,
            difficulty_without_social_media: new_response.difficulty_without_social_media,
            uses_device_during_meals: new_response.uses_device_during_meals,
            device_distracts_at_work_or_study: new_response.device_distracts_at_work_or_study,
            prediction: new_response.prediction,
            score: new_response.score,
            timestamp_ms: now_ms(),
        };

        self.next_id += 1;
        self.responses.push(response.clone());
        self.persist()?;

        Ok(response)
    }

    pub fn list(&self) -> Vec<StoredResponse> {
        self.responses.iter().rev().cloned().collect()
    }

    pub fn export_answers(&self) -> Vec<AnswerProjection> {
        self.responses
            .iter()
            .map(StoredResponse::answers_only)
            .collect()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let persisted = Persisted {
            responses: self.responses.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl ResponseStore for JsonResponseStore {
    fn create(&mut self, new_response: NewResponse) -> Result<StoredResponse, StorageError> {
        Self::create(self, new_response)
    }

    fn list(&self) -> Vec<StoredResponse> {
        Self::list(self)
    }

    fn export_answers(&self) -> Vec<AnswerProjection> {
        Self::export_answers(self)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
