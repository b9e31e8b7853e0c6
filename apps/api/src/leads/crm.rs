//! Lead records in the HubSpot CRM.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;

use crate::leads::models::CrmLeadProperties;
use crate::leads::provider::ProviderError;

#[async_trait]
pub trait CrmSink: Send + Sync {
    /// Creates a lead and returns the provider's record.
    async fn create_lead(&self, properties: &CrmLeadProperties) -> Result<Value, ProviderError>;
}

#[derive(Debug, Serialize)]
struct CreateLeadRequest<'a> {
    properties: &'a CrmLeadProperties,
}

#[derive(Clone)]
pub struct HubSpotClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HubSpotClient {
    pub fn new(client: Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl CrmSink for HubSpotClient {
    async fn create_lead(&self, properties: &CrmLeadProperties) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&CreateLeadRequest { properties })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
