//! Email delivery through the Resend HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::leads::provider::ProviderError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), ProviderError>;
}

#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ResendClient {
    pub fn new(client: Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        debug!(subject = %email.subject, "Email accepted by Resend");
        Ok(())
    }
}
