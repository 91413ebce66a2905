//! crates/study_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) the store depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! store independent of the HTTP client and of how users are authenticated.

use async_trait::async_trait;

use crate::domain::{FolderId, NewFolder, PdfUpload, ResourceId, StudyPreferences, User};
use crate::remote::{
    ChatReply, FolderDetail, FolderSummary, HealthStatus, NotesResponse, ResourceRecord,
    StudyPlanResponse,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Where an `ApiError` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    Network,
    /// The backend answered with a non-success status.
    Http,
    /// A success response whose body could not be decoded.
    Decode,
    /// Rejected locally before any request was made.
    Validation,
}

/// The single error shape surfaced by every store and API operation.
///
/// `status` is the HTTP status code, or `0` when no response was involved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
    /// The raw response body, when there was one.
    pub body: Option<String>,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            status: 0,
            message: message.into(),
            body: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>, body: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Http,
            status,
            message: message.into(),
            body,
        }
    }

    pub fn decode(status: u16, message: impl Into<String>, body: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            status,
            message: message.into(),
            body,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status: 0,
            message: message.into(),
            body: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::Http && self.status == 404
    }
}

/// A convenience type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = Result<T, ApiError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// One operation per backend endpoint. Implementations perform no retries and
/// no caching.
#[async_trait]
pub trait StudyApi: Send + Sync {
    // --- Folders ---
    async fn list_folders(&self) -> ApiResult<Vec<FolderSummary>>;

    async fn get_folder(&self, folder_id: &FolderId) -> ApiResult<FolderDetail>;

    async fn create_folder(&self, folder: &NewFolder) -> ApiResult<FolderSummary>;

    async fn delete_folder(&self, folder_id: &FolderId) -> ApiResult<()>;

    // --- Resources ---
    async fn add_youtube(&self, folder_id: &FolderId, urls: &[String]) -> ApiResult<ResourceRecord>;

    async fn upload_pdf(&self, folder_id: &FolderId, file: &PdfUpload) -> ApiResult<ResourceRecord>;

    async fn delete_resource(&self, resource_id: &ResourceId) -> ApiResult<()>;

    // --- AI Tasks ---
    async fn chat(&self, resource_id: &ResourceId, query: &str) -> ApiResult<ChatReply>;

    async fn generate_notes(&self, resource_id: &ResourceId) -> ApiResult<NotesResponse>;

    async fn generate_study_plan(
        &self,
        resource_id: &ResourceId,
        preferences: &StudyPreferences,
    ) -> ApiResult<StudyPlanResponse>;

    // --- Misc ---
    async fn health(&self) -> ApiResult<HealthStatus>;
}

/// Turns a pair of credentials into a signed-in user.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> ApiResult<User>;
}
