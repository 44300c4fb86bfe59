use super::{decode, ApiError, AskRequest, AskResponse};
use reqwest::Client;

/// Client for the RAG question/answer backend.
#[derive(Debug, Clone)]
pub struct RagClient {
    base_url: String,
    http: Client,
}

impl RagClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask one question. Callers trim and skip blank questions themselves;
    /// no retry and no timeout are applied here.
    pub async fn ask(&self, session_id: i64, question: &str) -> Result<AskResponse, ApiError> {
        let body = AskRequest {
            session_id,
            question: question.to_string(),
        };

        let resp = self
            .http
            .post(format!("{}/api/rag/ask", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        decode(resp).await
    }
}
