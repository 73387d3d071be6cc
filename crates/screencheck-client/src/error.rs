use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collector returned invalid response: {0}")]
    InvalidResponse(String),

    #[error("collector API error: status={status}, body={body}")]
    Api { status: u16, body: String },
}
