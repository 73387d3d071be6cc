#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: String,
    pub timestamp_ms: u64,
}
