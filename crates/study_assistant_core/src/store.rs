//! crates/study_assistant_core/src/store.rs
//!
//! The application state store: the single source of truth for the session and
//! the folder collection.
//!
//! State is kept on two levels. The live folder collection mirrors what the
//! backend last reported (ids, names, resources). The derived-data cache holds
//! the chat history, notes and study plan produced locally, keyed by folder id,
//! and is merged back into the collection on every refresh.
//!
//! The state lock is only taken to read or reconcile, never across a network
//! call, so overlapping operations all run to completion and the last response
//! to land wins.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::{
    ChatAnswer, ChatMessage, Folder, FolderId, NewChatMessage, NewFolder, Note, Resource,
    ResourceId, ResourceSpec, Session, StudyPlan, StudyPreferences, User,
};
use crate::parsing::{normalize_notes, normalize_study_plan};
use crate::ports::{ApiError, ApiResult, SessionAuthenticator, StudyApi};
use crate::remote::HealthStatus;

//=========================================================================================
// State
//=========================================================================================

/// Locally produced data for one folder that survives folder-list refreshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedData {
    pub chat_history: Vec<ChatMessage>,
    pub notes: Vec<Note>,
    pub study_plan: StudyPlan,
}

#[derive(Debug, Default)]
struct StoreState {
    session: Session,
    folders: Vec<Folder>,
    derived: HashMap<FolderId, DerivedData>,
    error: Option<ApiError>,
    folder_fetches_in_flight: usize,
}

impl StoreState {
    fn folder_mut(&mut self, folder_id: &FolderId) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| &f.id == folder_id)
    }
}

//=========================================================================================
// The Store
//=========================================================================================

/// Created once at startup and shared by `Arc` with every consumer.
pub struct StudyStore {
    api: Arc<dyn StudyApi>,
    authenticator: Arc<dyn SessionAuthenticator>,
    state: RwLock<StoreState>,
    message_seq: AtomicU64,
}

impl StudyStore {
    pub fn new(api: Arc<dyn StudyApi>, authenticator: Arc<dyn SessionAuthenticator>) -> Self {
        Self {
            api,
            authenticator,
            state: RwLock::new(StoreState::default()),
            message_seq: AtomicU64::new(0),
        }
    }

    // --- Read accessors ---

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_authenticated
    }

    pub async fn folders(&self) -> Vec<Folder> {
        self.state.read().await.folders.clone()
    }

    pub async fn folder(&self, folder_id: &FolderId) -> Option<Folder> {
        self.state
            .read()
            .await
            .folders
            .iter()
            .find(|f| &f.id == folder_id)
            .cloned()
    }

    /// The cached derived data for a folder, if any was ever produced.
    pub async fn cached_derived_data(&self, folder_id: &FolderId) -> Option<DerivedData> {
        self.state.read().await.derived.get(folder_id).cloned()
    }

    /// The error captured by the last failed `fetch_folders`.
    pub async fn error(&self) -> Option<ApiError> {
        self.state.read().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.folder_fetches_in_flight > 0
    }

    // --- Session ---

    /// Signs a user in. Both fields must be non-empty; everything else is up to
    /// the configured authenticator.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }
        let user = self.authenticator.authenticate(email, password).await?;
        info!("User {} signed in", user.email);
        self.state.write().await.session = Session::authenticated(user.clone());
        Ok(user)
    }

    /// Clears the session, the folder collection and every cached derived value.
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        state.session = Session::default();
        state.folders.clear();
        state.derived.clear();
        state.error = None;
        info!("User signed out; local state cleared");
    }

    // --- Folders ---

    /// Replaces the folder collection with the server's list, merging the cached
    /// derived data back in. Failures are captured into `error()` rather than
    /// returned, and leave the collection untouched.
    pub async fn fetch_folders(&self) {
        {
            let mut state = self.state.write().await;
            state.folder_fetches_in_flight += 1;
            state.error = None;
        }

        let result = self.api.list_folders().await;

        let mut state = self.state.write().await;
        state.folder_fetches_in_flight = state.folder_fetches_in_flight.saturating_sub(1);
        match result {
            Ok(summaries) => {
                let folders: Vec<Folder> = summaries
                    .into_iter()
                    .map(|summary| {
                        let id = summary.folder_id();
                        let mut folder = Folder::empty(id.clone(), summary.name);
                        if let Some(cached) = state.derived.get(&id) {
                            folder.chat_history = cached.chat_history.clone();
                            folder.notes = cached.notes.clone();
                            folder.study_plan = cached.study_plan.clone();
                        }
                        folder
                    })
                    .collect();
                info!("Fetched {} folders", folders.len());
                state.folders = folders;
            }
            Err(e) => {
                error!("Failed to fetch folders: {:?}", e);
                state.error = Some(e);
            }
        }
    }

    /// Fetches one folder's resources and replaces its `resources` in place.
    pub async fn fetch_folder_details(&self, folder_id: &FolderId) -> ApiResult<Vec<Resource>> {
        let detail = self.api.get_folder(folder_id).await.map_err(|e| {
            error!("Failed to fetch folder {}: {:?}", folder_id, e);
            e
        })?;
        let resources: Vec<Resource> = detail
            .resources
            .into_iter()
            .filter_map(|record| record.into_domain())
            .collect();

        let mut state = self.state.write().await;
        match state.folder_mut(folder_id) {
            Some(folder) => folder.resources = resources.clone(),
            None => warn!("Fetched details for folder {} which is not loaded", folder_id),
        }
        Ok(resources)
    }

    /// Lazily loads a folder's resources: the backend is only asked when the
    /// folder has none cached yet.
    pub async fn open_folder(&self, folder_id: &FolderId) -> ApiResult<Folder> {
        let needs_fetch = match self.folder(folder_id).await {
            Some(folder) => folder.resources.is_empty(),
            None => return Err(ApiError::validation(format!("Folder {} not found", folder_id))),
        };
        if needs_fetch {
            self.fetch_folder_details(folder_id).await?;
        }
        self.folder(folder_id)
            .await
            .ok_or_else(|| ApiError::validation(format!("Folder {} not found", folder_id)))
    }

    /// Creates a folder on the server, then appends it locally.
    pub async fn add_folder(&self, data: NewFolder) -> ApiResult<Folder> {
        let created = self.api.create_folder(&data).await.map_err(|e| {
            error!("Failed to create folder '{}': {:?}", data.name, e);
            e
        })?;
        let folder = Folder::empty(created.folder_id(), created.name);
        self.state.write().await.folders.push(folder.clone());
        info!("Created folder {} ('{}')", folder.id, folder.name);
        Ok(folder)
    }

    /// Deletes a folder on the server, then drops it and its cached data locally.
    /// A rejected delete leaves local state untouched.
    pub async fn delete_folder(&self, folder_id: &FolderId) -> ApiResult<()> {
        self.api.delete_folder(folder_id).await.map_err(|e| {
            error!("Failed to delete folder {}: {:?}", folder_id, e);
            e
        })?;
        let mut state = self.state.write().await;
        state.folders.retain(|f| &f.id != folder_id);
        state.derived.remove(folder_id);
        info!("Deleted folder {}", folder_id);
        Ok(())
    }

    // --- Resources ---

    /// Creates a resource through the endpoint matching its kind and appends it
    /// to the folder. Adding the same source twice is left to the server.
    pub async fn add_resource(&self, folder_id: &FolderId, spec: ResourceSpec) -> ApiResult<Resource> {
        let record = match &spec {
            ResourceSpec::YouTube { urls } => self.api.add_youtube(folder_id, urls).await,
            ResourceSpec::Pdf(file) => self.api.upload_pdf(folder_id, file).await,
        }
        .map_err(|e| {
            error!("Failed to add {} resource to folder {}: {:?}", spec.kind(), folder_id, e);
            e
        })?;

        let resource_type = record.resource_type.clone();
        let resource = record.into_domain().ok_or_else(|| {
            ApiError::decode(0, format!("unknown resource type: {}", resource_type), None)
        })?;

        let mut state = self.state.write().await;
        if let Some(folder) = state.folder_mut(folder_id) {
            folder.resources.push(resource.clone());
        }
        info!("Added {} resource {} to folder {}", resource.kind, resource.id, folder_id);
        Ok(resource)
    }

    pub async fn delete_resource(&self, folder_id: &FolderId, resource_id: &ResourceId) -> ApiResult<()> {
        self.api.delete_resource(resource_id).await.map_err(|e| {
            error!("Failed to delete resource {}: {:?}", resource_id, e);
            e
        })?;
        let mut state = self.state.write().await;
        if let Some(folder) = state.folder_mut(folder_id) {
            folder.resources.retain(|r| r.id != resource_id.as_str());
        }
        info!("Deleted resource {} from folder {}", resource_id, folder_id);
        Ok(())
    }

    // --- Chat ---

    /// Stamps a message with a generated id and appends it to the folder's
    /// history, both in the cache and on the live folder. No server call.
    /// Messages for folders that are not loaded are returned but not kept.
    pub async fn add_chat_message(&self, folder_id: &FolderId, message: NewChatMessage) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_message_id(),
            role: message.role,
            content: message.content,
        };
        let mut state = self.state.write().await;
        let Some(folder) = state.folder_mut(folder_id) else {
            warn!("Dropping {} message for unknown folder {}", message.role, folder_id);
            return message;
        };
        folder.chat_history.push(message.clone());
        state
            .derived
            .entry(folder_id.clone())
            .or_default()
            .chat_history
            .push(message.clone());
        debug!("Appended {} message {} to folder {}", message.role, message.id, folder_id);
        message
    }

    /// Asks the AI backend about a resource and returns the answer with the
    /// passages it cites.
    pub async fn chat(&self, resource_id: &ResourceId, query: &str) -> ApiResult<ChatAnswer> {
        if query.trim().is_empty() {
            return Err(ApiError::validation("Question cannot be empty"));
        }
        let reply = self.api.chat(resource_id, query).await.map_err(|e| {
            error!("Chat request for resource {} failed: {:?}", resource_id, e);
            e
        })?;
        let text = reply
            .text()
            .map(str::to_string)
            .ok_or_else(|| ApiError::decode(0, "Chat response contained no answer", None))?;
        Ok(ChatAnswer {
            text,
            sources: reply.sources,
        })
    }

    // --- Generation ---

    /// Generates notes for a resource. The result is not stored; callers pass
    /// it to `update_folder_notes`.
    pub async fn generate_notes(&self, resource_id: &ResourceId) -> ApiResult<Vec<Note>> {
        let response = self.api.generate_notes(resource_id).await.map_err(|e| {
            error!("Note generation for resource {} failed: {:?}", resource_id, e);
            e
        })?;
        let notes = normalize_notes(response.notes);
        info!("Generated {} notes for resource {}", notes.len(), resource_id);
        Ok(notes)
    }

    /// Generates a study plan for a resource. The result is not stored; callers
    /// pass it to `update_folder_study_plan`.
    pub async fn generate_study_plan(
        &self,
        resource_id: &ResourceId,
        preferences: &StudyPreferences,
    ) -> ApiResult<StudyPlan> {
        let response = self
            .api
            .generate_study_plan(resource_id, preferences)
            .await
            .map_err(|e| {
                error!("Study plan generation for resource {} failed: {:?}", resource_id, e);
                e
            })?;
        let plan = normalize_study_plan(response.study_plan);
        info!("Generated a {}-week study plan for resource {}", plan.weeks.len(), resource_id);
        Ok(plan)
    }

    /// Replaces a loaded folder's notes. Unknown folders are ignored.
    pub async fn update_folder_notes(&self, folder_id: &FolderId, notes: Vec<Note>) {
        let mut state = self.state.write().await;
        let Some(folder) = state.folder_mut(folder_id) else {
            warn!("Ignoring notes for unknown folder {}", folder_id);
            return;
        };
        folder.notes = notes.clone();
        state.derived.entry(folder_id.clone()).or_default().notes = notes;
    }

    /// Replaces a loaded folder's study plan. Unknown folders are ignored.
    pub async fn update_folder_study_plan(&self, folder_id: &FolderId, study_plan: StudyPlan) {
        let mut state = self.state.write().await;
        let Some(folder) = state.folder_mut(folder_id) else {
            warn!("Ignoring study plan for unknown folder {}", folder_id);
            return;
        };
        folder.study_plan = study_plan.clone();
        state.derived.entry(folder_id.clone()).or_default().study_plan = study_plan;
    }

    // --- Misc ---

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.api.health().await
    }

    /// Millisecond timestamp plus a per-store sequence number.
    fn next_message_id(&self) -> String {
        let seq = self.message_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), seq)
    }
}
