//! Recording and editing conversations

use anyhow::Result;
use chrono::Local;
use inquire::Confirm;
use std::collections::BTreeMap;

use super::now;
use super::ui::{minimal_render_config, select, select_contact, text_input};
use crate::db::Database;
use crate::models::{Category, ContactId, EntryEdit, Importance, TopicEdit, TopicNote};

/// Walk through every category, asking whether it came up. Categories
/// answered "no" are left out of the entry entirely.
pub fn run_record_conversation(db: &mut Database, id: Option<ContactId>) -> Result<()> {
    let id = match id {
        Some(id) => id,
        None => {
            if db.contacts().is_empty() {
                println!("No contacts yet.");
                return Ok(());
            }
            match select_contact(db, "Who did you talk to?", None)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    let Some(date) = text_input("date:", Some(&today))? else {
        println!("Cancelled.");
        return Ok(());
    };

    let mut topics = BTreeMap::new();
    for category in Category::ALL {
        let discussed = Confirm::new(&format!("Talked about {}?", category))
            .with_render_config(minimal_render_config())
            .with_default(false)
            .prompt_skippable()?;
        match discussed {
            Some(true) => {}
            Some(false) => continue,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let Some(importance) = prompt_importance(&format!("{} importance (1-5):", category), false)?
            .flatten()
        else {
            println!("Cancelled.");
            return Ok(());
        };
        let details = text_input(&format!("{} details:", category), None)?.unwrap_or_default();
        topics.insert(category, TopicNote::new(importance, details.trim()));
    }

    let entry = db.record_conversation(id, &date, topics)?;
    let summary = if entry.topics.is_empty() {
        "no topics".to_string()
    } else {
        entry.importance_summary()
    };
    println!("Saved: {} ({})", entry.date, summary);

    let name = db.contact(id)?.name.clone();
    if Confirm::new(&format!("Mark {} as contacted now?", name))
        .with_render_config(minimal_render_config())
        .with_default(true)
        .prompt_skippable()?
        .unwrap_or(false)
    {
        db.mark_contacted(id, now())?;
    }
    Ok(())
}

/// Ask for an importance until it is valid.
///
/// Returns `None` when cancelled, `Some(None)` when `allow_blank` and the
/// input was blank.
fn prompt_importance(label: &str, allow_blank: bool) -> Result<Option<Option<Importance>>> {
    loop {
        let Some(input) = text_input(label, None)? else {
            return Ok(None);
        };
        if allow_blank && input.trim().is_empty() {
            return Ok(Some(None));
        }
        match Importance::parse(&input) {
            Ok(importance) => return Ok(Some(Some(importance))),
            Err(e) => println!("{}", e),
        }
    }
}

/// Edit the date, importance and details of one recorded conversation.
/// Blank answers keep the current values.
pub fn run_edit_conversation(db: &mut Database) -> Result<()> {
    if db.contacts().is_empty() {
        println!("No contacts yet.");
        return Ok(());
    }
    let Some(id) = select_contact(db, "Contact:", None)? else {
        return Ok(());
    };

    let history = db.history(id)?;
    if history.is_empty() {
        println!("No conversations with {} yet.", db.contact(id)?.name);
        return Ok(());
    }
    let labels: Vec<String> = history
        .iter()
        .map(|e| format!("{} - {}", e.date, e.importance_summary()))
        .collect();
    let Some(index) = select("Conversation:", &labels)? else {
        return Ok(());
    };
    let entry = history[index].clone();

    let Some(date) = text_input(&format!("date [{}]:", entry.date), None)? else {
        return Ok(());
    };

    let mut topics = BTreeMap::new();
    for (category, note) in &entry.topics {
        println!("{}: importance {}, {}", category, note.importance, note.details);
        let Some(importance) =
            prompt_importance(&format!("{} importance [{}]:", category, note.importance), true)?
        else {
            return Ok(());
        };
        let Some(details) = text_input(&format!("{} details:", category), None)? else {
            return Ok(());
        };
        topics.insert(
            *category,
            TopicEdit {
                importance,
                details: Some(details),
            },
        );
    }

    db.edit_entry(
        id,
        index,
        EntryEdit {
            date: Some(date),
            topics,
        },
    )?;
    println!("Updated.");
    Ok(())
}
