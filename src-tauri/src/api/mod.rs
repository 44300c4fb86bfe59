pub mod checklist;
pub mod rag;

use crate::db::Database;
use crate::settings::{self, SettingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_RAG_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CHECKLIST_BASE_URL: &str = "http://localhost:8080/api/checklist";

/// Opaque identifier as the backends send it: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

/// A retrieved passage backing an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default)]
    pub chunk_id: Option<ResourceId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunk_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub similarity_score: f64,
    #[serde(default)]
    pub file_id: Option<ResourceId>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub session_id: i64,
    pub question: String,
}

/// Answer payload. Both fields are guarded: a missing or null `answer` stays
/// `None` and missing or null `references` read as an empty list.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTemplate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub template_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item_id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub check_area: Option<String>,
}

/// Missing and `null` both read as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Base URLs of the two backends this app consumes.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub rag_base_url: String,
    pub checklist_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rag_base_url: DEFAULT_RAG_BASE_URL.to_string(),
            checklist_base_url: DEFAULT_CHECKLIST_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve base URLs from the settings store, falling back to defaults.
    pub fn from_settings(db: &Database) -> Self {
        let rag_base_url = settings::read(db, SettingKey::RagBaseUrl)
            .unwrap_or_else(|| DEFAULT_RAG_BASE_URL.to_string());
        let checklist_base_url = settings::read(db, SettingKey::ChecklistBaseUrl)
            .unwrap_or_else(|| DEFAULT_CHECKLIST_BASE_URL.to_string());
        Self {
            rag_base_url: trim_base(rag_base_url),
            checklist_base_url: trim_base(checklist_base_url),
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Turn a response into its decoded JSON body, or the matching `ApiError`.
pub(crate) async fn decode<T>(resp: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ask_response_tolerates_missing_fields() {
        let resp: AskResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.answer, None);
        assert!(resp.references.is_empty());

        let resp: AskResponse =
            serde_json::from_value(json!({ "answer": null, "references": null })).unwrap();
        assert_eq!(resp.answer, None);
        assert!(resp.references.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let resp: AskResponse = serde_json::from_value(json!({
            "answer": "ok",
            "references": [{ "chunkId": 1, "chunkText": null, "similarityScore": null }]
        }))
        .unwrap();
        assert_eq!(resp.answer.as_deref(), Some("ok"));
        assert_eq!(resp.references[0].chunk_text, "");
        assert_eq!(resp.references[0].similarity_score, 0.0);

        let template: ChecklistTemplate = serde_json::from_value(json!({
            "templateName": null,
            "items": [{ "itemId": "a-1", "title": null, "description": null, "checkArea": null }]
        }))
        .unwrap();
        assert_eq!(template.template_name, "");
        assert_eq!(template.items[0].item_id, ResourceId::Text("a-1".into()));
        assert_eq!(template.items[0].title, "");
        assert_eq!(template.items[0].check_area, None);

        let template: ChecklistTemplate =
            serde_json::from_value(json!({ "templateName": "t", "items": null })).unwrap();
        assert!(template.items.is_empty());
    }

    #[test]
    fn test_reference_ids_are_opaque() {
        let refs: Vec<Reference> = serde_json::from_value(json!([
            { "chunkId": 17, "chunkText": "a", "similarityScore": 0.5, "fileId": "doc-3" },
            { "chunkText": "b", "similarityScore": 0.25 }
        ]))
        .unwrap();
        assert_eq!(refs[0].chunk_id, Some(ResourceId::Number(17)));
        assert_eq!(refs[0].file_id, Some(ResourceId::Text("doc-3".into())));
        assert_eq!(refs[1].chunk_id, None);
        assert_eq!(refs[1].file_id, None);
    }

    #[test]
    fn test_ask_request_uses_camel_case() {
        let body = serde_json::to_value(AskRequest {
            session_id: 7,
            question: "q".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "sessionId": 7, "question": "q" }));
    }

    #[test]
    fn test_config_defaults_and_trailing_slash() {
        let db = Database::open_in_memory().unwrap();
        let config = ApiConfig::from_settings(&db);
        assert_eq!(config.rag_base_url, DEFAULT_RAG_BASE_URL);

        db.set_setting("rag_base_url", "http://rag.local:9000/").unwrap();
        let config = ApiConfig::from_settings(&db);
        assert_eq!(config.rag_base_url, "http://rag.local:9000");
        assert_eq!(config.checklist_base_url, DEFAULT_CHECKLIST_BASE_URL);
    }
}
