//! crates/study_assistant_core/src/remote.rs
//!
//! The JSON shapes exchanged with the backend, and their conversion into
//! domain types.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::domain::{ChatSource, FolderId, Resource, ResourceId, ResourceKind, StudyPlan};

//=========================================================================================
// Server Ids
//=========================================================================================

/// Server ids arrive as strings (ObjectIds) or as integers; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(text) => text,
            IdRepr::Number(number) => number.to_string(),
        }
    }
}

fn server_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn optional_server_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}

//=========================================================================================
// Folder and Resource Records
//=========================================================================================

/// An entry of `GET /folders` and the response of `POST /folders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    #[serde(deserialize_with = "server_id")]
    pub id: String,
    pub name: String,
}

impl FolderSummary {
    pub fn folder_id(&self) -> FolderId {
        FolderId::new(self.id.clone())
    }
}

/// The response of `GET /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDetail {
    #[serde(deserialize_with = "server_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// A resource as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(deserialize_with = "server_id")]
    pub id: String,
    pub resource_type: String,
    pub source_id: String,
    #[serde(
        default,
        deserialize_with = "optional_server_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<String>,
}

impl ResourceRecord {
    /// Converts the record into a domain resource, or `None` when the backend
    /// reports a type this client does not know.
    pub fn into_domain(self) -> Option<Resource> {
        let kind = match self.resource_type.parse::<ResourceKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(
                    "Skipping resource {} with unsupported type '{}'",
                    self.id, self.resource_type
                );
                return None;
            }
        };
        Some(Resource {
            resource_id: ResourceId::new(self.id.clone()),
            id: self.id,
            kind,
            name: self.source_id.clone(),
            source_id: self.source_id,
        })
    }
}

//=========================================================================================
// Request Bodies
//=========================================================================================

#[derive(Debug, Serialize)]
pub struct YouTubeRequest<'a> {
    pub urls: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
}

//=========================================================================================
// AI Responses
//=========================================================================================

/// The chat endpoint answers with either `answer` or `content`, plus the
/// retrieved passages the answer was grounded on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ChatSource>,
}

impl ChatReply {
    pub fn text(&self) -> Option<&str> {
        self.answer.as_deref().or(self.content.as_deref())
    }
}

/// One element of a structured notes array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteItem {
    Text(String),
    Structured {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        content: Option<String>,
    },
}

/// Notes arrive either as one Markdown blob or as a pre-structured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotesPayload {
    Text(String),
    Items(Vec<NoteItem>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesResponse {
    pub notes: NotesPayload,
}

/// A study plan arrives either as raw text or already shaped into weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudyPlanPayload {
    Text(String),
    Structured(StudyPlan),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlanResponse {
    pub study_plan: StudyPlanPayload,
}

/// The backend's root banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}
