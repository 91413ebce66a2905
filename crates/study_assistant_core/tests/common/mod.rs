//! In-memory stand-ins for the store's ports.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use study_assistant_core::domain::{FolderId, NewFolder, PdfUpload, ResourceId, StudyPreferences, User};
use study_assistant_core::ports::{ApiError, ApiResult, SessionAuthenticator, StudyApi};
use study_assistant_core::remote::{
    ChatReply, FolderDetail, FolderSummary, HealthStatus, NotesPayload, NotesResponse,
    ResourceRecord, StudyPlanPayload, StudyPlanResponse,
};
use tokio::sync::oneshot;

#[derive(Default)]
pub struct FakeState {
    pub folders: Vec<FolderSummary>,
    pub resources: HashMap<String, Vec<ResourceRecord>>,
    pub next_id: u32,
    pub list_error: Option<ApiError>,
    pub delete_folder_error: Option<ApiError>,
    pub notes: Option<NotesPayload>,
    pub study_plan: Option<StudyPlanPayload>,
    pub chat_reply: ChatReply,
    /// Overrides the `resource_type` reported back for uploaded PDFs.
    pub upload_resource_type: Option<String>,
    /// When non-empty, each `list_folders` call waits on the next gate instead
    /// of answering from `folders`.
    pub list_gates: VecDeque<oneshot::Receiver<Vec<FolderSummary>>>,
    pub list_calls: usize,
    pub detail_calls: usize,
    pub last_preferences: Option<StudyPreferences>,
}

/// A backend that keeps folders and resources in memory.
#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(names: &[&str]) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            for name in names {
                state.next_id += 1;
                let id = state.next_id.to_string();
                state.folders.push(FolderSummary {
                    id,
                    name: name.to_string(),
                });
            }
        }
        api
    }

    pub fn seed_resource(&self, folder_id: &str, resource_type: &str, source_id: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("r{}", state.next_id);
        state
            .resources
            .entry(folder_id.to_string())
            .or_default()
            .push(ResourceRecord {
                id: id.clone(),
                resource_type: resource_type.to_string(),
                source_id: source_id.to_string(),
                folder_id: Some(folder_id.to_string()),
            });
        id
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn detail_calls(&self) -> usize {
        self.state.lock().unwrap().detail_calls
    }

    fn create_resource(&self, folder_id: &FolderId, resource_type: &str, source_id: &str) -> ApiResult<ResourceRecord> {
        let mut state = self.state.lock().unwrap();
        if !state.folders.iter().any(|f| f.id == folder_id.as_str()) {
            return Err(not_found("Folder not found"));
        }
        state.next_id += 1;
        let record = ResourceRecord {
            id: format!("r{}", state.next_id),
            resource_type: resource_type.to_string(),
            source_id: source_id.to_string(),
            folder_id: Some(folder_id.to_string()),
        };
        state
            .resources
            .entry(folder_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}

pub fn not_found(detail: &str) -> ApiError {
    ApiError::http(404, detail, Some(format!(r#"{{"detail":"{}"}}"#, detail)))
}

#[async_trait]
impl StudyApi for FakeApi {
    async fn list_folders(&self) -> ApiResult<Vec<FolderSummary>> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            if let Some(err) = state.list_error.clone() {
                return Err(err);
            }
            match state.list_gates.pop_front() {
                Some(gate) => gate,
                None => return Ok(state.folders.clone()),
            }
        };
        gate.await.map_err(|_| ApiError::network("Network error: gate dropped"))
    }

    async fn get_folder(&self, folder_id: &FolderId) -> ApiResult<FolderDetail> {
        let mut state = self.state.lock().unwrap();
        state.detail_calls += 1;
        let summary = state
            .folders
            .iter()
            .find(|f| f.id == folder_id.as_str())
            .cloned()
            .ok_or_else(|| not_found("Folder not found"))?;
        Ok(FolderDetail {
            resources: state.resources.get(&summary.id).cloned().unwrap_or_default(),
            id: summary.id,
            name: summary.name,
        })
    }

    async fn create_folder(&self, folder: &NewFolder) -> ApiResult<FolderSummary> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let summary = FolderSummary {
            id: state.next_id.to_string(),
            name: folder.name.clone(),
        };
        state.folders.push(summary.clone());
        Ok(summary)
    }

    async fn delete_folder(&self, folder_id: &FolderId) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.delete_folder_error.clone() {
            return Err(err);
        }
        let before = state.folders.len();
        state.folders.retain(|f| f.id != folder_id.as_str());
        if state.folders.len() == before {
            return Err(not_found("Folder not found"));
        }
        state.resources.remove(folder_id.as_str());
        Ok(())
    }

    async fn add_youtube(&self, folder_id: &FolderId, urls: &[String]) -> ApiResult<ResourceRecord> {
        let url = urls
            .first()
            .ok_or_else(|| ApiError::http(400, "At least one URL is required", None))?;
        self.create_resource(folder_id, "youtube", url)
    }

    async fn upload_pdf(&self, folder_id: &FolderId, file: &PdfUpload) -> ApiResult<ResourceRecord> {
        let resource_type = self
            .state
            .lock()
            .unwrap()
            .upload_resource_type
            .clone()
            .unwrap_or_else(|| "pdf".to_string());
        self.create_resource(folder_id, &resource_type, &file.file_name)
    }

    async fn delete_resource(&self, resource_id: &ResourceId) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        let mut found = false;
        for records in state.resources.values_mut() {
            let before = records.len();
            records.retain(|r| r.id != resource_id.as_str());
            found |= records.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(not_found("Resource not found"))
        }
    }

    async fn chat(&self, _resource_id: &ResourceId, _query: &str) -> ApiResult<ChatReply> {
        Ok(self.state.lock().unwrap().chat_reply.clone())
    }

    async fn generate_notes(&self, _resource_id: &ResourceId) -> ApiResult<NotesResponse> {
        let notes = self
            .state
            .lock()
            .unwrap()
            .notes
            .clone()
            .unwrap_or_else(|| NotesPayload::Text(String::new()));
        Ok(NotesResponse { notes })
    }

    async fn generate_study_plan(
        &self,
        _resource_id: &ResourceId,
        preferences: &StudyPreferences,
    ) -> ApiResult<StudyPlanResponse> {
        let mut state = self.state.lock().unwrap();
        state.last_preferences = Some(preferences.clone());
        let study_plan = state
            .study_plan
            .clone()
            .unwrap_or_else(|| StudyPlanPayload::Text(String::new()));
        Ok(StudyPlanResponse { study_plan })
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        Ok(HealthStatus {
            message: "Welcome".to_string(),
        })
    }
}

/// Accepts any credentials.
pub struct AcceptAll;

#[async_trait]
impl SessionAuthenticator for AcceptAll {
    async fn authenticate(&self, email: &str, _password: &str) -> ApiResult<User> {
        Ok(User {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
        })
    }
}
