//! Main menu for touchbase
//!
//! Uses inquire for clean, reliable terminal interaction. Changes stay in
//! memory until Save or Save and quit.

use anyhow::{anyhow, Result};
use inquire::Select;
use std::io::{self, IsTerminal};

use super::ai::TopicSuggester;
use super::dashboard::{run_view, View};
use super::ui::{clear_screen, confirm, error, minimal_render_config, prompt_for_input, wait_for_continue};
use super::{
    run_add, run_add_group, run_due, run_edit_conversation, run_edit_group, run_history_by_contact,
    run_history_by_date, run_list, run_mark_contacted, run_record_conversation, run_set_last_contact,
    run_update,
};
use crate::db::Database;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    AddGroup,
    EditGroup,
    AddContact,
    EditContact,
    List,
    DueOne,
    DueAll,
    RecordConversation,
    EditConversation,
    HistoryByDate,
    HistoryByContact,
    Dashboard(View),
    SetLastContact,
    MarkContacted,
    Save,
    SaveAndQuit,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::AddGroup,
        MenuOption::EditGroup,
        MenuOption::AddContact,
        MenuOption::EditContact,
        MenuOption::List,
        MenuOption::DueOne,
        MenuOption::DueAll,
        MenuOption::RecordConversation,
        MenuOption::EditConversation,
        MenuOption::HistoryByDate,
        MenuOption::HistoryByContact,
        MenuOption::Dashboard(View::Importance),
        MenuOption::Dashboard(View::ContactTopics),
        MenuOption::Dashboard(View::ImportantTopics),
        MenuOption::Dashboard(View::PerDate),
        MenuOption::Dashboard(View::Schedule),
        MenuOption::SetLastContact,
        MenuOption::MarkContacted,
        MenuOption::Save,
        MenuOption::SaveAndQuit,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::AddGroup => "Add group",
            MenuOption::EditGroup => "Edit group",
            MenuOption::AddContact => "Add contact",
            MenuOption::EditContact => "Edit contact",
            MenuOption::List => "List contacts",
            MenuOption::DueOne => "Check one contact",
            MenuOption::DueAll => "Check everyone",
            MenuOption::RecordConversation => "Record conversation",
            MenuOption::EditConversation => "Edit conversation",
            MenuOption::HistoryByDate => "Conversations by date",
            MenuOption::HistoryByContact => "Conversations by contact",
            MenuOption::Dashboard(view) => view.label(),
            MenuOption::SetLastContact => "Set last contact date",
            MenuOption::MarkContacted => "Mark contacted now",
            MenuOption::Save => "Save",
            MenuOption::SaveAndQuit => "Save and quit",
            MenuOption::Quit => "Quit without saving",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }
}

/// Run the interactive main menu
pub fn run_menu(db: &mut Database, suggester: &mut TopicSuggester) -> Result<()> {
    // TTY check: interactive menu requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive menu requires a terminal. Use subcommands for non-interactive use:\n  \
            touchbase list\n  \
            touchbase due [name]\n  \
            touchbase contacted <name> <YYYY-MM-DD>\n  \
            Run 'touchbase --help' for all options."
        ));
    }

    let menu_labels: Vec<&str> = MenuOption::ALL.iter().map(|opt| opt.label()).collect();

    loop {
        // Clear screen - if this fails, continue anyway (degraded but functional)
        let _ = clear_screen();

        let title = if db.is_dirty() { "touchbase *" } else { "touchbase" };
        let selection = Select::new(title, menu_labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(menu_labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Escape and Ctrl+C are treated as Quit
        let choice = match selection {
            Ok(Some(label)) => MenuOption::from_label(label).unwrap_or(MenuOption::Quit),
            _ => MenuOption::Quit,
        };

        if choice == MenuOption::Quit {
            if !db.is_dirty() || confirm("Quit without saving?").unwrap_or(true) {
                return Ok(());
            }
            continue;
        }

        let _ = clear_screen();

        // Execute command - all errors caught and displayed
        // Returns true if user wants to quit the app
        match execute_command(db, suggester, choice) {
            Ok(true) => return Ok(()),
            Ok(false) => wait_for_continue(),
            Err(e) => {
                eprintln!();
                error(&e.to_string());
                wait_for_continue();
            }
        }
    }
}

/// Execute a menu command
/// Returns Ok(true) if the user wants to quit the app
fn execute_command(
    db: &mut Database,
    suggester: &mut TopicSuggester,
    choice: MenuOption,
) -> Result<bool> {
    match choice {
        MenuOption::AddGroup => run_add_group(db).map(|_| false),
        MenuOption::EditGroup => run_edit_group(db).map(|_| false),
        MenuOption::AddContact => run_add(db).map(|_| false),
        MenuOption::EditContact => run_update(db).map(|_| false),
        MenuOption::List => run_list(db).map(|_| false),
        MenuOption::DueOne => {
            let name = prompt_for_input("name: ")?;
            if name.is_empty() {
                return Ok(false);
            }
            run_due(db, suggester, Some(&name)).map(|_| false)
        }
        MenuOption::DueAll => run_due(db, suggester, None).map(|_| false),
        MenuOption::RecordConversation => run_record_conversation(db, None).map(|_| false),
        MenuOption::EditConversation => run_edit_conversation(db).map(|_| false),
        MenuOption::HistoryByDate => run_history_by_date(db, None).map(|_| false),
        MenuOption::HistoryByContact => run_history_by_contact(db, None).map(|_| false),
        MenuOption::Dashboard(view) => run_view(db, view).map(|_| false),
        MenuOption::SetLastContact => run_set_last_contact(db, None, None).map(|_| false),
        MenuOption::MarkContacted => run_mark_contacted(db, None).map(|_| false),
        MenuOption::Save => {
            db.save()?;
            println!("Saved.");
            Ok(false)
        }
        MenuOption::SaveAndQuit => {
            db.save()?;
            println!("Saved.");
            Ok(true)
        }
        MenuOption::Quit => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_option_roundtrip() {
        for opt in MenuOption::ALL {
            let label = opt.label();
            let recovered = MenuOption::from_label(label);
            assert_eq!(recovered, Some(*opt), "Failed roundtrip for {:?}", opt);
        }
    }

    #[test]
    fn test_menu_option_from_invalid_label() {
        assert_eq!(MenuOption::from_label("Invalid"), None);
        assert_eq!(MenuOption::from_label(""), None);
    }

    #[test]
    fn test_menu_covers_every_dashboard_view() {
        for view in View::ALL {
            assert!(MenuOption::ALL.contains(&MenuOption::Dashboard(view)));
        }
    }

    #[test]
    fn test_menu_option_all_has_correct_count() {
        assert_eq!(MenuOption::ALL.len(), 21);
    }
}
