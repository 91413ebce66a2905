//! services/client/src/view/command.rs
//!
//! Defines the commands a user can type into the shell and how a line of input
//! is turned into one.

use study_assistant_core::domain::{FolderId, ResourceId, ResourceKind, StudyPreferences};

/// Represents one parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Signs in. This is the only route open to anonymous users.
    Login { email: String, password: String },

    /// Signs out and drops all local state.
    Logout,

    /// Refreshes and lists the folder collection.
    Folders,

    /// Shows one folder, loading its resources on first open.
    Open { folder: FolderId },

    CreateFolder { name: String },

    DeleteFolder { folder: FolderId },

    /// Attaches a PDF (by local path) or a YouTube video (by URL) to a folder.
    AddResource {
        folder: FolderId,
        kind: ResourceKind,
        source: String,
    },

    DeleteResource { folder: FolderId, resource: ResourceId },

    /// Asks a question about a resource and records both sides in the folder's chat.
    Ask {
        folder: FolderId,
        resource: ResourceId,
        question: String,
    },

    /// Generates notes for a resource and stores them on the folder.
    Notes { folder: FolderId, resource: ResourceId },

    /// Generates a study plan for a resource and stores it on the folder.
    Plan {
        folder: FolderId,
        resource: ResourceId,
        preferences: StudyPreferences,
    },

    /// Prints the folder's chat history.
    History { folder: FolderId },

    /// Pings the backend.
    Health,

    Help,

    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  login <email> <password>              sign in
  logout                                sign out and clear local data
  folders                               list folders
  open <folder>                         show a folder and its resources
  mkdir <name>                          create a folder
  rmdir <folder>                        delete a folder
  add <folder> <pdf|youtube> <source>   attach a PDF file or YouTube URL
  add-pdf <folder> <path>               attach a PDF file
  add-youtube <folder> <url>            attach a YouTube video
  rm <folder> <resource>                delete a resource
  ask <folder> <resource> <question>    chat about a resource
  notes <folder> <resource>             generate notes
  plan <folder> <resource> [level] [style]  generate a study plan
  history <folder>                      show the folder's chat
  health                                check the backend
  help                                  show this text
  quit                                  leave";

impl Command {
    /// Parses a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        let Some((name, rest)) = split_word(line) else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "login" => {
                let (email, password) =
                    two_words(rest).ok_or(ParseError::Usage("login <email> <password>"))?;
                Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                }
            }
            "logout" => Command::Logout,
            "folders" | "ls" => Command::Folders,
            "open" => Command::Open {
                folder: one_word(rest).ok_or(ParseError::Usage("open <folder>"))?.into(),
            },
            "mkdir" => {
                if rest.is_empty() {
                    return Err(ParseError::Usage("mkdir <name>"));
                }
                Command::CreateFolder {
                    name: rest.to_string(),
                }
            }
            "rmdir" => Command::DeleteFolder {
                folder: one_word(rest).ok_or(ParseError::Usage("rmdir <folder>"))?.into(),
            },
            "add" => {
                const USAGE: &str = "add <folder> <pdf|youtube> <source>";
                let (folder, rest) = split_word(rest).ok_or(ParseError::Usage(USAGE))?;
                let (tag, source) = split_word(rest).ok_or(ParseError::Usage(USAGE))?;
                if source.is_empty() {
                    return Err(ParseError::Usage(USAGE));
                }
                let kind = tag
                    .parse::<ResourceKind>()
                    .map_err(|e| ParseError::Invalid(e.message))?;
                Command::AddResource {
                    folder: folder.into(),
                    kind,
                    source: source.to_string(),
                }
            }
            "add-youtube" | "add-pdf" => {
                let (kind, usage) = if name.eq_ignore_ascii_case("add-pdf") {
                    (ResourceKind::Pdf, "add-pdf <folder> <path>")
                } else {
                    (ResourceKind::YouTube, "add-youtube <folder> <url>")
                };
                let (folder, source) = split_word(rest).ok_or(ParseError::Usage(usage))?;
                if source.is_empty() {
                    return Err(ParseError::Usage(usage));
                }
                Command::AddResource {
                    folder: folder.into(),
                    kind,
                    source: source.to_string(),
                }
            }
            "rm" | "rm-resource" => {
                let (folder, resource) =
                    two_words(rest).ok_or(ParseError::Usage("rm <folder> <resource>"))?;
                Command::DeleteResource {
                    folder: folder.into(),
                    resource: resource.into(),
                }
            }
            "ask" => {
                const USAGE: &str = "ask <folder> <resource> <question>";
                let (folder, rest) = split_word(rest).ok_or(ParseError::Usage(USAGE))?;
                let (resource, question) = split_word(rest).ok_or(ParseError::Usage(USAGE))?;
                if question.is_empty() {
                    return Err(ParseError::Usage(USAGE));
                }
                Command::Ask {
                    folder: folder.into(),
                    resource: resource.into(),
                    question: question.to_string(),
                }
            }
            "notes" => {
                let (folder, resource) =
                    two_words(rest).ok_or(ParseError::Usage("notes <folder> <resource>"))?;
                Command::Notes {
                    folder: folder.into(),
                    resource: resource.into(),
                }
            }
            "plan" => {
                const USAGE: &str = "plan <folder> <resource> [level] [style]";
                let words: Vec<&str> = rest.split_whitespace().collect();
                if words.len() < 2 || words.len() > 4 {
                    return Err(ParseError::Usage(USAGE));
                }
                let mut preferences = StudyPreferences::default();
                if let Some(level) = words.get(2) {
                    preferences.knowledge_level = level.to_string();
                }
                if let Some(style) = words.get(3) {
                    preferences.learning_style = style.to_string();
                }
                Command::Plan {
                    folder: words[0].into(),
                    resource: words[1].into(),
                    preferences,
                }
            }
            "history" => Command::History {
                folder: one_word(rest).ok_or(ParseError::Usage("history <folder>"))?.into(),
            },
            "health" => Command::Health,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Commands reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Command::Login { .. } | Command::Help | Command::Quit)
    }
}

/// Splits off the first whitespace-delimited word; the remainder is trimmed.
fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((input, "")),
    }
}

fn one_word(input: &str) -> Option<&str> {
    match split_word(input)? {
        (word, "") => Some(word),
        _ => None,
    }
}

fn two_words(input: &str) -> Option<(&str, &str)> {
    let (first, rest) = split_word(input)?;
    Some((first, one_word(rest)?))
}
