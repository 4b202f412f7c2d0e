use anyhow::{anyhow, Result};

use super::ai::{Suggestion, TopicPrompt, TopicSuggester};
use super::now;
use super::ui::{find_contact_by_identifier, select_contact, text_input};
use crate::cadence::{DueState, DueStatus};
use crate::db::Database;
use crate::models::ContactId;

/// One line describing where a contact stands
pub fn describe_status(name: &str, status: &DueStatus) -> String {
    let days = status.days_since_last_contact.unwrap_or_default();
    let plural = if days == 1 { "" } else { "s" };
    match status.state {
        DueState::NoHistory => format!("{}: no contact recorded yet.", name),
        DueState::Due => format!(
            "{}: time to reach out! {} day{} since last contact.",
            name, days, plural
        ),
        DueState::NotYetDue => format!(
            "{}: not yet. {} day{} since last contact.",
            name, days, plural
        ),
    }
}

/// Check one contact (by name) or everyone. Due contacts get a topic
/// suggestion while the suggester is still enabled.
pub fn run_due(db: &Database, suggester: &mut TopicSuggester, name: Option<&str>) -> Result<()> {
    let now = now();
    let report = match name {
        Some(query) => match find_contact_by_identifier(db, query)? {
            Some(id) => vec![(id, db.due_status(id, now)?)],
            None => {
                println!("No contact found matching \"{}\".", query);
                return Ok(());
            }
        },
        None => db.due_report(now)?,
    };

    if report.is_empty() {
        println!("No contacts yet.");
        return Ok(());
    }

    for (id, status) in report {
        check_one(db, suggester, id, &status)?;
    }
    Ok(())
}

fn check_one(
    db: &Database,
    suggester: &mut TopicSuggester,
    id: ContactId,
    status: &DueStatus,
) -> Result<()> {
    let contact = db.contact(id)?;
    println!("{}", describe_status(&contact.name, status));

    if !status.is_due() {
        return Ok(());
    }

    let prompt = TopicPrompt::for_contact(db, id)?;
    match suggester.suggest(&prompt) {
        Suggestion::Topic(topic) => println!("  Topic idea: {}", topic),
        Suggestion::Disabled => println!("  Topic suggestions are off."),
        Suggestion::Failed(reason) => {
            println!("  Topic suggestions unavailable ({}); turned off for this session.", reason)
        }
    }
    Ok(())
}

/// Set a contact's last contact date from `YYYY-MM-DD`
pub fn run_set_last_contact(db: &mut Database, name: Option<&str>, date: Option<&str>) -> Result<()> {
    let id = match name {
        Some(query) => find_contact_by_identifier(db, query)?
            .ok_or_else(|| anyhow!("Not found: {}", query))?,
        None => {
            if db.contacts().is_empty() {
                println!("No contacts yet.");
                return Ok(());
            }
            match select_contact(db, "Contact:", None)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let date = match date {
        Some(d) => d.to_string(),
        None => match text_input("last contact date (YYYY-MM-DD):", None)? {
            Some(d) => d,
            None => return Ok(()),
        },
    };

    let set = db.update_last_contact_date(id, &date)?;
    println!("{} - last contact {}", db.contact(id)?.name, set.format("%Y-%m-%d"));
    Ok(())
}

/// Stamp a contact as reached right now
pub fn run_mark_contacted(db: &mut Database, id: Option<ContactId>) -> Result<()> {
    let id = match id {
        Some(id) => id,
        None => match select_contact(db, "Contact:", None)? {
            Some(id) => id,
            None => return Ok(()),
        },
    };
    db.mark_contacted(id, now())?;
    println!("Done: {}", db.contact(id)?.name);
    Ok(())
}
