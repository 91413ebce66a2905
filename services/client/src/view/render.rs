//! services/client/src/view/render.rs
//!
//! Presentational helpers that turn store state into terminal text.

use study_assistant_core::domain::{ChatAnswer, ChatMessage, Folder, Note, StudyPlan};
use study_assistant_core::ApiError;

pub fn folder_list(folders: &[Folder]) -> String {
    if folders.is_empty() {
        return "No folders yet. Create one with `mkdir <name>`.".to_string();
    }
    folders
        .iter()
        .map(|f| {
            format!(
                "[{}] {} ({} notes, {} messages)",
                f.id,
                f.name,
                f.notes.len(),
                f.chat_history.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn folder_detail(folder: &Folder) -> String {
    let mut out = format!("{} [{}]", folder.name, folder.id);
    if folder.resources.is_empty() {
        out.push_str("\n  (no resources)");
    }
    for resource in &folder.resources {
        out.push_str(&format!(
            "\n  {}  {:<7}  {}",
            resource.resource_id, resource.kind, resource.name
        ));
    }
    if !folder.notes.is_empty() {
        out.push_str(&format!("\n  {} notes", folder.notes.len()));
    }
    if !folder.study_plan.is_empty() {
        out.push_str(&format!("\n  {}-week study plan", folder.study_plan.weeks.len()));
    }
    out
}

pub fn notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes were generated.".to_string();
    }
    notes
        .iter()
        .map(|n| format!("## {}\n{}", n.title, n.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn study_plan(plan: &StudyPlan) -> String {
    if plan.is_empty() {
        return "The study plan is empty.".to_string();
    }
    plan.weeks
        .iter()
        .map(|w| format!("Week {} ({}h): {}", w.week, w.hours, w.topics.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn chat_history(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return "No messages yet.".to_string();
    }
    history
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

const SOURCE_PREVIEW_CHARS: usize = 80;

/// The assistant's reply followed by the passages it cites.
pub fn chat_answer(answer: &ChatAnswer) -> String {
    let mut out = format!("assistant: {}", answer.text);
    if answer.sources.is_empty() {
        return out;
    }
    out.push_str("\nSources:");
    for (i, source) in answer.sources.iter().enumerate() {
        let snippet = source.content.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut preview: String = snippet.chars().take(SOURCE_PREVIEW_CHARS).collect();
        if snippet.chars().count() > SOURCE_PREVIEW_CHARS {
            preview.push_str("...");
        }
        match source.label() {
            Some(label) => out.push_str(&format!("\n  [{}] {}: {}", i + 1, label, preview)),
            None => out.push_str(&format!("\n  [{}] {}", i + 1, preview)),
        }
    }
    out
}

/// The blocking alert shown for a failed action.
pub fn alert(error: &ApiError) -> String {
    if error.status == 0 {
        format!("Error: {}", error.message)
    } else {
        format!("Error: {} (status {})", error.message, error.status)
    }
}
