use anyhow::Result;

use crate::cli::ui::{format_last_contact, or_unknown};
use crate::db::Database;
use crate::models::{Contact, Group};

/// Print every contact with profile fields and last contact
pub fn run_list(db: &Database) -> Result<()> {
    if db.contacts().is_empty() {
        println!("No contacts yet.");
        return Ok(());
    }

    for (idx, id) in db.contact_ids().enumerate() {
        let contact = db.contact(id)?;
        let group = db.group(contact.group)?;
        println!("{}\n", format_contact(idx + 1, contact, group));
    }
    Ok(())
}

pub fn format_contact(position: usize, contact: &Contact, group: &Group) -> String {
    let mut out = format!("[{}] {} - {}", position, contact.name, group.name);
    out.push_str(&format!(
        "\n  birthday: {}, gender: {}, residence: {}, hobbies: {}",
        or_unknown(contact.birthday.as_deref()),
        or_unknown(contact.gender.as_deref()),
        or_unknown(contact.residence.as_deref()),
        or_unknown(contact.hobbies.as_deref()),
    ));
    if !contact.additional_info.is_empty() {
        out.push_str(&format!("\n  notes: {}", contact.additional_info));
    }
    out.push_str(&format!(
        "\n  last contact: {}",
        format_last_contact(contact.last_contact_date.as_ref())
    ));
    out
}
