use anyhow::Result;

use crate::cli::ui::{prompt_field_optional, select_group, FormResult};
use crate::db::Database;
use crate::models::ContactDraft;

/// Interactive contact creation. Requires at least one group.
pub fn run_add(db: &mut Database) -> Result<()> {
    if db.groups().is_empty() {
        println!("Add a group first.");
        return Ok(());
    }

    let Some(draft) = interactive_mode()? else {
        println!("Cancelled.");
        return Ok(());
    };
    if draft.name.is_empty() {
        println!("Name is required.");
        return Ok(());
    }

    let Some(group) = select_group(db, "group:")? else {
        println!("Cancelled.");
        return Ok(());
    };

    let id = db.add_contact(draft, group)?;
    let contact = db.contact(id)?;
    println!("\nCreated: {} in {}", contact.name, db.group(group)?.name);
    Ok(())
}

/// Collect the contact's fields. Blank answers leave optional fields unset.
fn interactive_mode() -> Result<Option<ContactDraft>> {
    let mut values = Vec::with_capacity(6);
    for field in ["name", "birthday", "gender", "residence", "hobbies", "notes"] {
        match prompt_field_optional(field)? {
            FormResult::Value(v) => values.push(v),
            FormResult::Cancelled => return Ok(None),
        }
        if field == "name" && values[0].is_empty() {
            break;
        }
    }

    let mut values = values.into_iter();
    let name = values.next().unwrap_or_default();
    let mut next = || values.next().filter(|v| !v.is_empty());

    Ok(Some(ContactDraft {
        name,
        birthday: next(),
        gender: next(),
        residence: next(),
        hobbies: next(),
        additional_info: next(),
    }))
}
