//! crates/study_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures held by the client.
//! These structs are independent of the backend's wire format; see `remote`
//! for the shapes that travel over HTTP.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ports::ApiError;

//=========================================================================================
// Identifiers
//=========================================================================================

/// The server-assigned folder identifier, stringified for local use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FolderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The server key of a resource, used for AI operations and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//=========================================================================================
// Session
//=========================================================================================

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub display_name: String,
}

/// The in-memory login state. Not persisted across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl Session {
    pub fn authenticated(user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }
}

//=========================================================================================
// Folders and Resources
//=========================================================================================

/// A user-defined grouping ("subject") of learning resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    /// Empty until the folder is opened and its details are fetched.
    pub resources: Vec<Resource>,
    pub study_plan: StudyPlan,
    pub notes: Vec<Note>,
    pub chat_history: Vec<ChatMessage>,
}

impl Folder {
    /// A folder with no resources and no derived data.
    pub fn empty(id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resources: Vec::new(),
            study_plan: StudyPlan::default(),
            notes: Vec::new(),
            chat_history: Vec::new(),
        }
    }
}

/// Payload for creating a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFolder {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Pdf,
    YouTube,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pdf => "pdf",
            ResourceKind::YouTube => "youtube",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ApiError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ResourceKind::Pdf),
            "youtube" => Ok(ResourceKind::YouTube),
            _ => Err(ApiError::validation(format!("unknown resource type: {}", tag))),
        }
    }
}

/// An uploaded PDF or linked YouTube video attached to a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// List-key identity.
    pub id: String,
    pub kind: ResourceKind,
    pub name: String,
    /// File name for PDFs, the video URL for YouTube resources.
    pub source_id: String,
    pub resource_id: ResourceId,
}

/// A PDF file ready to be sent as a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Describes a resource to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSpec {
    YouTube { urls: Vec<String> },
    Pdf(PdfUpload),
}

impl ResourceSpec {
    pub fn youtube(url: impl Into<String>) -> Self {
        ResourceSpec::YouTube {
            urls: vec![url.into()],
        }
    }

    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        ResourceSpec::Pdf(PdfUpload {
            file_name: file_name.into(),
            bytes: bytes.into(),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::YouTube { .. } => ResourceKind::YouTube,
            ResourceSpec::Pdf(_) => ResourceKind::Pdf,
        }
    }
}

//=========================================================================================
// AI-derived Data
//=========================================================================================

/// One week of a study plan. A `week` of 0 means the server left it unnumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyWeek {
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "whole_hours")]
    pub hours: u32,
}

/// Accepts any JSON number (or null) and rounds it to whole hours.
fn whole_hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let hours = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if !hours.is_finite() || hours <= 0.0 {
        return Ok(0);
    }
    Ok(hours.round().min(u32::MAX as f64) as u32)
}

/// A weekly breakdown of topics and time. Replaced wholesale by generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    #[serde(default)]
    pub weeks: Vec<StudyWeek>,
}

impl StudyPlan {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// A titled section of generated study content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => f.write_str("user"),
            ChatRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// One entry of a folder's chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

/// A retrieved passage the backend grounded a chat answer on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSource {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ChatSource {
    /// The document the passage came from, when the metadata names one.
    pub fn label(&self) -> Option<String> {
        ["source", "title", "file_name"]
            .iter()
            .find_map(|key| self.metadata.get(*key))
            .map(|value| match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    }
}

/// The answer to a chat question together with its supporting passages.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    pub text: String,
    pub sources: Vec<ChatSource>,
}

/// A chat message before the store stamps it with an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl NewChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The learner profile sent with a study plan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyPreferences {
    pub knowledge_level: String,
    pub learning_style: String,
}

impl Default for StudyPreferences {
    fn default() -> Self {
        Self {
            knowledge_level: "beginner".to_string(),
            learning_style: "active".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ErrorKind;

    #[test]
    fn study_week_tolerates_fractional_hours_and_missing_number() {
        let week: StudyWeek =
            serde_json::from_str(r#"{"topics":["Limits"],"hours":2.5}"#).unwrap();
        assert_eq!(week.week, 0);
        assert_eq!(week.hours, 3);

        let week: StudyWeek = serde_json::from_str(r#"{"week":2,"hours":null}"#).unwrap();
        assert_eq!(week.week, 2);
        assert_eq!(week.hours, 0);
        assert!(week.topics.is_empty());

        let week: StudyWeek = serde_json::from_str(r#"{"week":1,"hours":-4}"#).unwrap();
        assert_eq!(week.hours, 0);
    }

    #[test]
    fn resource_kind_parses_known_tags() {
        assert_eq!("pdf".parse::<ResourceKind>().unwrap(), ResourceKind::Pdf);
        assert_eq!(" YouTube ".parse::<ResourceKind>().unwrap(), ResourceKind::YouTube);
    }

    #[test]
    fn unknown_tag_is_a_validation_error() {
        let err = "vimeo".parse::<ResourceKind>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.status, 0);
        assert_eq!(err.message, "unknown resource type: vimeo");
    }

    #[test]
    fn spec_reports_its_kind() {
        assert_eq!(ResourceSpec::youtube("https://youtu.be/x").kind(), ResourceKind::YouTube);
        let spec = ResourceSpec::pdf("notes.pdf", Bytes::from_static(b"%PDF"));
        assert_eq!(spec.kind(), ResourceKind::Pdf);
    }

    #[test]
    fn default_preferences() {
        let prefs = StudyPreferences::default();
        assert_eq!(prefs.knowledge_level, "beginner");
        assert_eq!(prefs.learning_style, "active");
    }
}
