//! Shared UI primitives for touchbase
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `name: `
//! - Edit prompts show the current value in brackets; blank keeps it, `-` clears it
//! - Feedback: single word when possible: `Saved.`

use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::{
    cursor,
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Select, Text};
use std::io::{self, Write};

use crate::db::Database;
use crate::models::{ContactId, FieldEdit, GroupId};

/// Shown for unset optional fields
pub const UNKNOWN: &str = "unknown";

// ============================================================================
// Message Functions
// ============================================================================

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

// ============================================================================
// Layout Primitives
// ============================================================================

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept)
}

/// Render an optional profile field, `unknown` when unset
pub fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN)
}

/// Render a last-contact timestamp, or `never`
pub fn format_last_contact(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Number of visible lines for selection lists
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(4).max(5)
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Display a selection menu and return the chosen index
pub fn select<T: ToString>(prompt: &str, options: &[T]) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }

    // Prefix with position so identical labels stay distinguishable
    let items: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("[{}] {}", i + 1, o.to_string()))
        .collect();

    let result = Select::new(prompt, items.clone())
        .with_render_config(minimal_render_config())
        .with_page_size(visible_lines())
        .with_vim_mode(true)
        .prompt_skippable()?;

    Ok(result.and_then(|selected| items.iter().position(|i| *i == selected)))
}

/// Prompt for text input with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    let mut builder = Text::new(prompt).with_render_config(minimal_render_config());

    if let Some(d) = default {
        if !d.is_empty() {
            builder = builder.with_default(d);
        }
    }

    let result = builder.prompt_skippable()?;
    Ok(result)
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()?;
    Ok(result)
}

/// Prompt for text input, returning empty string on cancel
pub fn prompt_for_input(label: &str) -> Result<String> {
    let result = Text::new(label)
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;
    Ok(result.unwrap_or_default())
}

/// Wait for user to press enter to continue
pub fn wait_for_continue() {
    println!();
    let _ = Text::new("[enter]")
        .with_render_config(minimal_render_config())
        .prompt_skippable();
}

// ============================================================================
// Form Input Helpers
// ============================================================================

/// Result type for form inputs that can be cancelled
pub enum FormResult<T> {
    Value(T),
    Cancelled,
}

fn form_result(result: std::result::Result<String, InquireError>) -> Result<FormResult<String>> {
    match result {
        Ok(input) => Ok(FormResult::Value(input.trim().to_string())),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prompt for an edit of a field with a current value.
/// Format: `field [current] (- clears): ` or `field: ` if no current value.
/// Blank input keeps the current value.
pub fn prompt_field_edit(field: &str, current: Option<&str>) -> Result<FormResult<FieldEdit>> {
    let prompt = match current {
        Some(val) if !val.is_empty() => format!("{} [{}] (- clears): ", field, truncate(val, 30)),
        _ => format!("{}: ", field),
    };

    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();

    Ok(match form_result(result)? {
        FormResult::Value(v) => FormResult::Value(FieldEdit::from_input(&v)),
        FormResult::Cancelled => FormResult::Cancelled,
    })
}

/// Prompt for an optional field (returns empty string if skipped)
pub fn prompt_field_optional(field: &str) -> Result<FormResult<String>> {
    let prompt = format!("{}: ", field);
    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();
    form_result(result)
}

// ============================================================================
// Lookup Helpers
// ============================================================================

/// Let the user pick a group. Returns None if there are no groups or the
/// selection was cancelled.
pub fn select_group(db: &Database, prompt: &str) -> Result<Option<GroupId>> {
    let ids: Vec<GroupId> = db.group_ids().collect();
    let labels: Vec<String> = db
        .groups()
        .iter()
        .map(|g| format!("{} ({})", g.name, g.cadence_label()))
        .collect();

    Ok(select(prompt, &labels)?.map(|idx| ids[idx]))
}

/// Let the user pick one of `candidates` (all contacts when None).
/// A single candidate is returned without prompting.
pub fn select_contact(
    db: &Database,
    prompt: &str,
    candidates: Option<&[ContactId]>,
) -> Result<Option<ContactId>> {
    let ids: Vec<ContactId> = match candidates {
        Some(ids) => ids.to_vec(),
        None => db.contact_ids().collect(),
    };

    match ids.len() {
        0 => Ok(None),
        1 if candidates.is_some() => Ok(Some(ids[0])),
        _ => {
            let labels = ids
                .iter()
                .map(|&id| contact_label(db, id))
                .collect::<Result<Vec<_>>>()?;
            Ok(select(prompt, &labels)?.map(|idx| ids[idx]))
        }
    }
}

/// "Alex (Close Friends)"
pub fn contact_label(db: &Database, id: ContactId) -> Result<String> {
    let contact = db.contact(id)?;
    let group = db.group(contact.group)?;
    Ok(format!("{} ({})", contact.name, group.name))
}

/// Find a contact by name, prompting when several match.
/// Returns None if nothing matches or the selection was cancelled.
pub fn find_contact_by_identifier(db: &Database, identifier: &str) -> Result<Option<ContactId>> {
    let matches = db.find_contacts(identifier);
    if matches.is_empty() {
        return Ok(None);
    }
    select_contact(db, "Select:", Some(&matches))
}
