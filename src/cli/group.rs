//! Group commands: add, edit, list

use anyhow::Result;

use crate::cli::ui::{prompt_field_optional, select_group, text_input, warning, FormResult};
use crate::db::Database;
use crate::models::{parse_days, GroupEdit};

/// Interactive group creation. Re-prompts until the numbers parse.
pub fn run_add_group(db: &mut Database) -> Result<()> {
    let name = match prompt_field_optional("group name")? {
        FormResult::Value(v) if !v.is_empty() => v,
        FormResult::Value(_) => {
            println!("Group name is required.");
            return Ok(());
        }
        FormResult::Cancelled => {
            println!("Cancelled.");
            return Ok(());
        }
    };

    let Some(interval) = prompt_days("contact interval (days)")? else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(tolerance) = prompt_days("tolerance (days)")? else {
        println!("Cancelled.");
        return Ok(());
    };

    let id = db.add_group(&name, &interval, &tolerance)?;
    let group = db.group(id)?;
    println!("\nCreated: {} ({})", group.name, group.cadence_label());
    Ok(())
}

/// Ask until the input is a valid day count. None when cancelled.
fn prompt_days(label: &str) -> Result<Option<String>> {
    loop {
        match prompt_field_optional(label)? {
            FormResult::Cancelled => return Ok(None),
            FormResult::Value(v) => match parse_days(label, &v) {
                Ok(_) => return Ok(Some(v)),
                Err(e) => println!("{}", e),
            },
        }
    }
}

/// Interactive group edit. Blank input keeps a field; each field is applied
/// on its own, so a bad number does not undo a rename.
pub fn run_edit_group(db: &mut Database) -> Result<()> {
    if db.groups().is_empty() {
        println!("No groups yet.");
        return Ok(());
    }
    let Some(id) = select_group(db, "Group to edit:")? else {
        return Ok(());
    };
    let current = db.group(id)?.clone();

    let name = text_input(&format!("name [{}]:", current.name), None)?;
    let Some(name) = name else { return Ok(()) };
    let interval = text_input(&format!("contact interval [{}]:", current.contact_interval), None)?;
    let Some(interval) = interval else { return Ok(()) };
    let tolerance = text_input(&format!("tolerance [{}]:", current.tolerance), None)?;
    let Some(tolerance) = tolerance else { return Ok(()) };

    let report = db.edit_group(
        id,
        GroupEdit {
            name: Some(name),
            contact_interval: Some(interval),
            tolerance: Some(tolerance),
        },
    )?;

    for (field, err) in &report.rejected {
        warning(&format!("{} not changed: {}", field, err));
    }
    let group = db.group(id)?;
    if report.applied.is_empty() {
        println!("No changes.");
    } else {
        println!("Updated: {} ({})", group.name, group.cadence_label());
    }
    Ok(())
}

/// Print every group with its cadence and member count
pub fn run_groups(db: &Database) -> Result<()> {
    if db.groups().is_empty() {
        println!("No groups yet.");
        return Ok(());
    }
    for id in db.group_ids() {
        let group = db.group(id)?;
        let members = db.group_size(id);
        println!(
            "  {} - {} ({} contact{})",
            group.name,
            group.cadence_label(),
            members,
            if members == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
