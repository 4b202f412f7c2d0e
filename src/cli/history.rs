use anyhow::Result;

use super::ui::{find_contact_by_identifier, select_contact, text_input};
use crate::db::Database;
use crate::models::ConversationEntry;

/// Render one entry as a date line followed by one line per topic
pub fn format_entry(entry: &ConversationEntry) -> String {
    let mut out = format!("[{}]", entry.date);
    if entry.topics.is_empty() {
        out.push_str("\n  (no topics)");
    }
    for (category, note) in &entry.topics {
        out.push_str(&format!("\n  {} ({}): {}", category, note.importance, note.details));
    }
    out
}

/// Every conversation recorded under an exact date label
pub fn run_history_by_date(db: &Database, date: Option<&str>) -> Result<()> {
    let label = match date {
        Some(d) => d.trim().to_string(),
        None => match text_input("date:", None)? {
            Some(d) => d.trim().to_string(),
            None => return Ok(()),
        },
    };

    let hits = db.query_by_date_label(&label);
    if hits.is_empty() {
        println!("No conversations on {}.", label);
        return Ok(());
    }
    for (contact, entry) in hits {
        println!("{}\n{}\n", contact.name, format_entry(entry));
    }
    Ok(())
}

/// One contact's conversations in the order they were recorded
pub fn run_history_by_contact(db: &Database, name: Option<&str>) -> Result<()> {
    let id = match name {
        Some(query) => match find_contact_by_identifier(db, query)? {
            Some(id) => id,
            None => {
                println!("No contact found matching \"{}\".", query);
                return Ok(());
            }
        },
        None => match select_contact(db, "Contact:", None)? {
            Some(id) => id,
            None => {
                if db.contacts().is_empty() {
                    println!("No contacts yet.");
                }
                return Ok(());
            }
        },
    };

    let contact = db.contact(id)?;
    let history = db.history(id)?;
    if history.is_empty() {
        println!("No conversations with {} yet.", contact.name);
        return Ok(());
    }
    println!("{} - {} conversation(s)\n", contact.name, history.len());
    for entry in history {
        println!("{}\n", format_entry(entry));
    }
    Ok(())
}
