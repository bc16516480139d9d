use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::super::connections_errors::ConnectionError;
use super::super::connections_model::PluggyPosition;
use super::pluggy_provider::PluggyProvider;

/// Marker the function returns when the aggregator no longer knows the item
const ITEM_NOT_FOUND: &str = "ITEM_NOT_FOUND";

/// HTTP client for the `pluggy` serverless function. Requests carry an
/// `action` discriminator in the JSON body, responses are JSON.
pub struct PluggyFunctionsProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PluggyFunctionsProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    async fn invoke(&self, body: serde_json::Value) -> Result<serde_json::Value, ConnectionError> {
        let url = format!("{}/functions/v1/pluggy", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ConnectionError::ProviderError(e.to_string()))?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ConnectionError::ProviderError(e.to_string()))?;

        if payload["error"] == ITEM_NOT_FOUND {
            let item_id = body["itemId"].as_str().unwrap_or_default().to_string();
            return Err(ConnectionError::ItemNotFound(item_id));
        }
        if let Some(message) = payload["error"].as_str() {
            return Err(ConnectionError::ProviderError(message.to_string()));
        }

        Ok(payload)
    }
}

#[async_trait]
impl PluggyProvider for PluggyFunctionsProvider {
    async fn fetch_positions(
        &self,
        item_id: &str,
    ) -> Result<Vec<PluggyPosition>, ConnectionError> {
        let payload = self
            .invoke(json!({ "action": "get_investments", "itemId": item_id }))
            .await?;

        let positions = payload["investments"].clone();
        serde_json::from_value(positions)
            .map_err(|e| ConnectionError::ProviderError(e.to_string()))
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), ConnectionError> {
        self.invoke(json!({ "action": "delete_item", "itemId": item_id }))
            .await?;
        Ok(())
    }
}
