//! Outcome of a call to an external email or CRM provider.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached or its answer could not be read.
    #[error("HTTP error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("Provider rejected request (status {status})")]
    Rejected { status: u16, details: Value },
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

impl ProviderError {
    /// Reads a non-success response into `Rejected`. A body that is not JSON
    /// is kept as a string.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str(&body).unwrap_or(Value::String(body));
        ProviderError::Rejected { status, details }
    }
}
