use super::{decode, ApiError, ChecklistTemplate};
use reqwest::Client;

/// Client for the checklist template service.
#[derive(Debug, Clone)]
pub struct ChecklistClient {
    base_url: String,
    http: Client,
}

impl ChecklistClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetch the template the service currently marks as active for
    /// pre-contract inspections. The server picks it; no id is sent.
    pub async fn fetch_active_template(&self) -> Result<ChecklistTemplate, ApiError> {
        let resp = self
            .http
            .get(format!("{}/templates/pre-contract/active", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await?;

        decode(resp).await
    }
}
