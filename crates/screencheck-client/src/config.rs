use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl CollectorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }
}
