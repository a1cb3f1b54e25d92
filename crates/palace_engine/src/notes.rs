use palace_logging::palace_debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ApiClient, ApiError};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A note to be stored. Text is trimmed before sending and must not be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewNote {
    pub text: String,
    pub source_url: Option<String>,
    pub metadata: Map<String, Value>,
}

impl NewNote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        self.source_url = (!source_url.trim().is_empty()).then(|| source_url.trim().to_string());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct NoteBody<'a> {
    text: &'a str,
    source_url: Option<&'a str>,
    metadata: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedNote {
    #[serde(default)]
    id: Option<String>,
}

/// A stored note. The id comes from `id`, or from the raw `_id` when `id` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "NoteRecord")]
pub struct Note {
    pub id: String,
    pub text: String,
    pub source_url: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NoteRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl TryFrom<NoteRecord> for Note {
    type Error = String;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        let id = [record.id, record.object_id]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .ok_or_else(|| "note without id".to_string())?;
        Ok(Self {
            id,
            text: record.text,
            source_url: record.source_url,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NotePage {
    #[serde(default)]
    pub items: Vec<Note>,
}

#[derive(Debug, Deserialize)]
struct Health {
    #[serde(default)]
    status: Option<String>,
}

impl ApiClient {
    /// Stores a note and returns its id.
    pub async fn create_note(&self, note: &NewNote) -> Result<String, ApiError> {
        let text = note.text.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("text must not be empty".to_string()));
        }
        let body = NoteBody {
            text,
            source_url: note.source_url.as_deref(),
            metadata: &note.metadata,
        };
        let endpoint = self.endpoint(&["notes"])?;
        palace_debug!("POST {} text_len={}", endpoint, text.len());
        let created: CreatedNote = self
            .send_json(self.request(Method::POST, endpoint).json(&body))
            .await?;
        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingField("id"))
    }

    pub async fn list_notes(&self, skip: u32, limit: u32) -> Result<NotePage, ApiError> {
        let mut endpoint = self.endpoint(&["notes"])?;
        endpoint
            .query_pairs_mut()
            .append_pair("skip", &skip.to_string())
            .append_pair("limit", &limit.to_string());
        self.send_json(self.request(Method::GET, endpoint)).await
    }

    /// Deletes a note. Any 2xx answer, including an empty 204, counts as success.
    pub async fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["notes", id])?;
        self.send(self.request(Method::DELETE, endpoint)).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<String, ApiError> {
        let endpoint = self.endpoint(&["health"])?;
        let health: Health = self.send_json(self.request(Method::GET, endpoint)).await?;
        health.status.ok_or(ApiError::MissingField("status"))
    }
}
