//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the study backend.
//! It implements the `StudyApi` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use study_assistant_core::{
    domain::{FolderId, NewFolder, PdfUpload, ResourceId, StudyPreferences},
    ports::{ApiError, ApiResult, StudyApi},
    remote::{
        ChatReply, ChatRequest, FolderDetail, FolderSummary, HealthStatus, NotesResponse,
        ResourceRecord, StudyPlanResponse, YouTubeRequest,
    },
};
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `StudyApi` against the JSON-over-HTTP backend.
///
/// Requests carry no timeout and are never retried.
#[derive(Clone)]
pub struct HttpStudyApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpStudyApi {
    /// Creates a new `HttpStudyApi` for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates an adapter around an existing `reqwest::Client`.
    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and turns transport failures and non-2xx statuses into
    /// `ApiError`s.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to backend failed before a response: {}", e);
            ApiError::network(format!("Network error: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(code, &body);
        warn!("Backend answered {}: {}", code, message);
        Err(ApiError::http(code, message, Some(body)))
    }

    /// Sends a request and decodes the JSON body of a successful response.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let code = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Network error: {}", e)))?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::decode(code, format!("Failed to decode response: {}", e), Some(text))
        })
    }

    /// Sends a request whose response body is irrelevant.
    async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

/// Picks the human-readable message for a failed response: the JSON `detail`,
/// else `message`, else a generic status line.
fn error_message(status: u16, body: &str) -> String {
    let fallback = || format!("HTTP error! status: {}", status);
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    for key in ["detail", "message"] {
        match fields.get(key) {
            Some(Value::String(text)) => return text.clone(),
            Some(Value::Null) | None => continue,
            Some(other) => return other.to_string(),
        }
    }
    fallback()
}

//=========================================================================================
// `StudyApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn list_folders(&self) -> ApiResult<Vec<FolderSummary>> {
        debug!("GET /folders");
        self.send_json(self.http_client.get(self.url("/folders"))).await
    }

    async fn get_folder(&self, folder_id: &FolderId) -> ApiResult<FolderDetail> {
        let path = format!("/folders/{}", folder_id);
        debug!("GET {}", path);
        self.send_json(self.http_client.get(self.url(&path))).await
    }

    async fn create_folder(&self, folder: &NewFolder) -> ApiResult<FolderSummary> {
        debug!("POST /folders");
        self.send_json(self.http_client.post(self.url("/folders")).json(folder))
            .await
    }

    async fn delete_folder(&self, folder_id: &FolderId) -> ApiResult<()> {
        let path = format!("/folders/{}", folder_id);
        debug!("DELETE {}", path);
        self.send_empty(self.http_client.delete(self.url(&path))).await
    }

    async fn add_youtube(&self, folder_id: &FolderId, urls: &[String]) -> ApiResult<ResourceRecord> {
        let path = format!("/folders/{}/add-youtube", folder_id);
        debug!("POST {} ({} urls)", path, urls.len());
        self.send_json(
            self.http_client
                .post(self.url(&path))
                .json(&YouTubeRequest { urls }),
        )
        .await
    }

    async fn upload_pdf(&self, folder_id: &FolderId, file: &PdfUpload) -> ApiResult<ResourceRecord> {
        let path = format!("/folders/{}/upload-pdf", folder_id);
        debug!("POST {} ({}, {} bytes)", path, file.file_name, file.bytes.len());
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::validation(format!("Invalid upload: {}", e)))?;
        let form = multipart::Form::new().part("file", part);
        self.send_json(self.http_client.post(self.url(&path)).multipart(form))
            .await
    }

    async fn delete_resource(&self, resource_id: &ResourceId) -> ApiResult<()> {
        let path = format!("/resources/{}", resource_id);
        debug!("DELETE {}", path);
        self.send_empty(self.http_client.delete(self.url(&path))).await
    }

    async fn chat(&self, resource_id: &ResourceId, query: &str) -> ApiResult<ChatReply> {
        let path = format!("/resources/{}/chat", resource_id);
        debug!("POST {}", path);
        self.send_json(
            self.http_client
                .post(self.url(&path))
                .json(&ChatRequest { query }),
        )
        .await
    }

    async fn generate_notes(&self, resource_id: &ResourceId) -> ApiResult<NotesResponse> {
        let path = format!("/resources/{}/generate-notes", resource_id);
        debug!("POST {}", path);
        self.send_json(self.http_client.post(self.url(&path))).await
    }

    async fn generate_study_plan(
        &self,
        resource_id: &ResourceId,
        preferences: &StudyPreferences,
    ) -> ApiResult<StudyPlanResponse> {
        let path = format!("/resources/{}/generate-study-plan", resource_id);
        debug!("POST {}", path);
        self.send_json(self.http_client.post(self.url(&path)).json(preferences))
            .await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.send_json(self.http_client.get(self.url("/"))).await
    }
}
