use anyhow::Result;

use crate::cli::ui::{prompt_field_edit, select_contact, select_group, confirm, FormResult};
use crate::db::Database;
use crate::models::{ContactEdit, FieldEdit};

/// Interactive contact edit. Blank input keeps a field, `-` clears it.
pub fn run_update(db: &mut Database) -> Result<()> {
    if db.contacts().is_empty() {
        println!("No contacts yet.");
        return Ok(());
    }
    let Some(id) = select_contact(db, "Contact to edit:", None)? else {
        return Ok(());
    };
    let current = db.contact(id)?.clone();

    let fields: [(&str, Option<&str>); 6] = [
        ("name", Some(current.name.as_str())),
        ("birthday", current.birthday.as_deref()),
        ("gender", current.gender.as_deref()),
        ("residence", current.residence.as_deref()),
        ("hobbies", current.hobbies.as_deref()),
        ("notes", Some(current.additional_info.as_str())),
    ];

    let mut edits = Vec::with_capacity(fields.len());
    for (field, value) in fields {
        match prompt_field_edit(field, value)? {
            FormResult::Value(edit) => edits.push(edit),
            FormResult::Cancelled => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    let mut edits = edits.into_iter();
    let mut next = || edits.next().unwrap_or(FieldEdit::Keep);
    let edit = ContactEdit {
        name: next(),
        birthday: next(),
        gender: next(),
        residence: next(),
        hobbies: next(),
        additional_info: next(),
    };

    let mut changed = !edit.is_empty();
    if changed {
        db.edit_contact(id, &edit)?;
    }

    if db.groups().len() > 1 && confirm("Move to another group?")? {
        if let Some(group) = select_group(db, "group:")? {
            db.reassign_group(id, group)?;
            changed = true;
        }
    }

    if changed {
        println!("Updated: {}", db.contact(id)?.name);
    } else {
        println!("No changes.");
    }
    Ok(())
}
