//! services/client/src/view/shell.rs
//!
//! The interactive shell: reads commands, checks them against the route guard,
//! invokes store operations and prints the resulting store state.
//!
//! The shell keeps no data of its own beyond transient UI flags; everything it
//! prints comes from the store's read accessors.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use study_assistant_core::{
    domain::{FolderId, NewChatMessage, NewFolder, ResourceId, ResourceKind, ResourceSpec},
    ApiError, StudyStore,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::error::ClientError;
use crate::view::command::{Command, HELP};
use crate::view::guard::{require_auth, Access, LOGIN_ROUTE};
use crate::view::render;

/// Whether the shell should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Transient busy flags, always reset once the awaited call settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub is_generating: bool,
    pub is_uploading: bool,
}

pub struct Shell<W> {
    store: Arc<StudyStore>,
    out: W,
    ui: UiFlags,
}

impl<W: AsyncWrite + Unpin> Shell<W> {
    pub fn new(store: Arc<StudyStore>, out: W) -> Self {
        Self {
            store,
            out,
            ui: UiFlags::default(),
        }
    }

    pub fn ui_flags(&self) -> UiFlags {
        self.ui
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), ClientError> {
        self.say("Study assistant. Type 'help' for commands.").await?;
        let mut lines = input.lines();
        loop {
            self.prompt().await?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.execute(&line).await? == Flow::Quit {
                break;
            }
        }
        info!("Shell closed");
        Ok(())
    }

    /// Executes one line of input. Operation failures are shown as alerts; only
    /// terminal I/O errors are returned.
    pub async fn execute(&mut self, line: &str) -> Result<Flow, ClientError> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                self.say(&e.to_string()).await?;
                return Ok(Flow::Continue);
            }
        };

        if require_auth(&self.store, &command).await == Access::RedirectToLogin {
            self.say(&format!("Please sign in first: {}", LOGIN_ROUTE))
                .await?;
            return Ok(Flow::Continue);
        }

        match self.dispatch(command).await {
            Ok(flow) => Ok(flow),
            Err(ClientError::Api(e)) => {
                error!("Command failed: {:?}", e);
                self.say(&render::alert(&e)).await?;
                Ok(Flow::Continue)
            }
            Err(other) => Err(other),
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow, ClientError> {
        match command {
            Command::Login { email, password } => {
                let user = self.store.login(&email, &password).await?;
                self.say(&format!("Welcome, {}!", user.display_name)).await?;
                self.show_folders().await?;
            }
            Command::Logout => {
                self.store.logout().await;
                self.say("Signed out.").await?;
            }
            Command::Folders => self.show_folders().await?,
            Command::Open { folder } => {
                let folder = self.store.open_folder(&folder).await?;
                self.say(&render::folder_detail(&folder)).await?;
            }
            Command::CreateFolder { name } => {
                let folder = self.store.add_folder(NewFolder { name }).await?;
                self.say(&format!("Created folder [{}] {}", folder.id, folder.name))
                    .await?;
            }
            Command::DeleteFolder { folder } => {
                self.store.delete_folder(&folder).await?;
                self.say(&format!("Deleted folder {}", folder)).await?;
            }
            Command::AddResource {
                folder,
                kind,
                source,
            } => self.add_resource(&folder, kind, source).await?,
            Command::DeleteResource { folder, resource } => {
                self.store.delete_resource(&folder, &resource).await?;
                self.say(&format!("Deleted resource {}", resource)).await?;
            }
            Command::Ask {
                folder,
                resource,
                question,
            } => self.ask(&folder, &resource, question).await?,
            Command::Notes { folder, resource } => {
                self.ui.is_generating = true;
                let result = self.store.generate_notes(&resource).await;
                self.ui.is_generating = false;
                let notes = result?;
                self.store.update_folder_notes(&folder, notes.clone()).await;
                self.say(&render::notes(&notes)).await?;
            }
            Command::Plan {
                folder,
                resource,
                preferences,
            } => {
                self.ui.is_generating = true;
                let result = self.store.generate_study_plan(&resource, &preferences).await;
                self.ui.is_generating = false;
                let plan = result?;
                self.store.update_folder_study_plan(&folder, plan.clone()).await;
                self.say(&render::study_plan(&plan)).await?;
            }
            Command::History { folder } => {
                let folder = self
                    .store
                    .folder(&folder)
                    .await
                    .ok_or_else(|| ApiError::validation(format!("Folder {} not found", folder)))?;
                self.say(&render::chat_history(&folder.chat_history)).await?;
            }
            Command::Health => {
                let status = self.store.health().await?;
                self.say(&format!("Backend: {}", status.message)).await?;
            }
            Command::Help => self.say(HELP).await?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Refreshes the folder list, showing a captured fetch error inline.
    async fn show_folders(&mut self) -> Result<(), ClientError> {
        self.store.fetch_folders().await;
        if let Some(e) = self.store.error().await {
            self.say(&format!("Could not load folders: {}", e.message))
                .await?;
        }
        let folders = self.store.folders().await;
        self.say(&render::folder_list(&folders)).await?;
        Ok(())
    }

    async fn add_resource(
        &mut self,
        folder: &FolderId,
        kind: ResourceKind,
        source: String,
    ) -> Result<(), ClientError> {
        let spec = match kind {
            ResourceKind::YouTube => ResourceSpec::youtube(source),
            ResourceKind::Pdf => {
                let bytes = tokio::fs::read(&source).await.map_err(|e| {
                    ApiError::validation(format!("Cannot read {}: {}", source, e))
                })?;
                let file_name = Path::new(&source)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.clone());
                ResourceSpec::pdf(file_name, Bytes::from(bytes))
            }
        };

        self.ui.is_uploading = true;
        let result = self.store.add_resource(folder, spec).await;
        self.ui.is_uploading = false;
        let resource = result?;
        self.say(&format!(
            "Added {} resource {} ({})",
            resource.kind, resource.resource_id, resource.name
        ))
        .await?;
        Ok(())
    }

    /// Records the question, asks the backend, then records the answer.
    async fn ask(
        &mut self,
        folder: &FolderId,
        resource: &ResourceId,
        question: String,
    ) -> Result<(), ClientError> {
        if self.store.folder(folder).await.is_none() {
            return Err(ApiError::validation(format!("Folder {} not found", folder)).into());
        }
        self.store
            .add_chat_message(folder, NewChatMessage::user(question.clone()))
            .await;
        self.ui.is_generating = true;
        let result = self.store.chat(resource, &question).await;
        self.ui.is_generating = false;
        let answer = result?;
        self.store
            .add_chat_message(folder, NewChatMessage::assistant(answer.text.clone()))
            .await;
        self.say(&render::chat_answer(&answer)).await?;
        Ok(())
    }

    async fn prompt(&mut self) -> Result<(), ClientError> {
        self.out.write_all(b"> ").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn say(&mut self, text: &str) -> Result<(), ClientError> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }
}
