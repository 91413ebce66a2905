//! crates/study_assistant_core/src/parsing.rs
//!
//! Best-effort adapters that turn generated text into notes and study plans.
//!
//! Both parsers share one rule: the text is cut into sections on blank lines,
//! and the first line of each section is its title.

use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::domain::{Note, StudyPlan, StudyWeek};
use crate::remote::{NoteItem, NotesPayload, StudyPlanPayload};

//=========================================================================================
// Sectioning
//=========================================================================================

/// Splits text into blank-line-delimited sections of non-empty lines.
fn sections(text: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Strips Markdown heading, emphasis and bullet markers from a line.
fn strip_markers(line: &str) -> String {
    line.trim()
        .trim_start_matches(['#', '-', '+'])
        .trim()
        .trim_matches('*')
        .trim()
        .to_string()
}

/// Strips a leading bullet or ordinal ("- ", "* ", "2. ") from a list line.
fn strip_bullet(line: &str) -> String {
    let trimmed = line.trim();
    let without_bullet = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))
        .unwrap_or(trimmed);
    let digits = without_bullet
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits > 0 {
        if let Some(rest) = without_bullet[digits..].strip_prefix(". ") {
            return rest.trim().to_string();
        }
    }
    without_bullet.trim().to_string()
}

fn hours_pattern() -> &'static Regex {
    static HOURS: OnceLock<Regex> = OnceLock::new();
    HOURS.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?|h)\b").expect("hours pattern is valid")
    })
}

//=========================================================================================
// Notes
//=========================================================================================

/// Parses a raw notes blob. Each section becomes one note whose content is the
/// whole section, title included.
pub fn notes_from_text(text: &str) -> Vec<Note> {
    sections(text)
        .into_iter()
        .map(|lines| Note {
            id: Uuid::new_v4().to_string(),
            title: strip_markers(lines[0]),
            content: lines.join("\n").trim().to_string(),
        })
        .collect()
}

/// Normalizes either shape of the notes response into a note list.
pub fn normalize_notes(payload: NotesPayload) -> Vec<Note> {
    match payload {
        NotesPayload::Text(text) => notes_from_text(&text),
        NotesPayload::Items(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| note_from_item(index, item))
            .collect(),
    }
}

fn note_from_item(index: usize, item: NoteItem) -> Option<Note> {
    match item {
        NoteItem::Text(text) => {
            let content = text.trim().to_string();
            let first = content.lines().next()?;
            Some(Note {
                id: Uuid::new_v4().to_string(),
                title: strip_markers(first),
                content,
            })
        }
        NoteItem::Structured { id, title, content } => {
            if title.is_none() && content.is_none() {
                return None;
            }
            let content = content.unwrap_or_default();
            let title = title
                .or_else(|| content.lines().next().map(strip_markers))
                .unwrap_or_else(|| format!("Note {}", index + 1));
            Some(Note {
                id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                title,
                content,
            })
        }
    }
}

//=========================================================================================
// Study Plans
//=========================================================================================

/// Parses a raw study plan. Sections are numbered weeks; the lines under a
/// section title are its topics, and the first hours figure is its time budget.
pub fn study_plan_from_text(text: &str) -> StudyPlan {
    let weeks = sections(text)
        .into_iter()
        .enumerate()
        .map(|(index, lines)| {
            let topics: Vec<String> = if lines.len() == 1 {
                vec![strip_markers(lines[0])]
            } else {
                lines[1..]
                    .iter()
                    .map(|line| strip_bullet(line))
                    .filter(|topic| !topic.is_empty())
                    .collect()
            };
            let hours = lines
                .iter()
                .find_map(|line| hours_pattern().captures(line))
                .and_then(|caps| caps[1].parse::<u32>().ok())
                .unwrap_or(0);
            StudyWeek {
                week: index as u32 + 1,
                topics,
                hours,
            }
        })
        .collect();
    StudyPlan { weeks }
}

/// Normalizes either shape of the study plan response. Unnumbered weeks take
/// their position in the list.
pub fn normalize_study_plan(payload: StudyPlanPayload) -> StudyPlan {
    match payload {
        StudyPlanPayload::Text(text) => study_plan_from_text(&text),
        StudyPlanPayload::Structured(mut plan) => {
            for (index, week) in plan.weeks.iter_mut().enumerate() {
                if week.week == 0 {
                    week.week = index as u32 + 1;
                }
            }
            plan
        }
    }
}
