use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod add;
pub mod ai;
pub mod checkin;
pub mod conversation;
pub mod dashboard;
pub mod group;
pub mod history;
pub mod list;
pub mod menu;
pub mod ui;
pub mod update;

pub use add::run_add;
pub use checkin::{run_due, run_mark_contacted, run_set_last_contact};
pub use conversation::{run_edit_conversation, run_record_conversation};
pub use dashboard::run_stats;
pub use group::{run_add_group, run_edit_group, run_groups};
pub use history::{run_history_by_contact, run_history_by_date};
pub use list::run_list;
pub use menu::run_menu;
pub use update::run_update;

#[derive(Parser)]
#[command(name = "touchbase")]
#[command(about = "Keep in touch on a cadence")]
#[command(version)]
pub struct Cli {
    /// Data file (defaults to $TOUCHBASE_DATA, then the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,
    /// Refuse to load a data file containing contacts of unknown groups
    #[arg(long, global = true)]
    pub strict: bool,
    /// Disable AI topic suggestions
    #[arg(long, global = true)]
    pub no_ai: bool,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List contacts with their group and last contact
    List,
    /// List groups and their cadence
    Groups,
    /// Check who is due for contact
    Due(DueArgs),
    /// Show recorded conversations
    History(HistoryArgs),
    /// Show conversation statistics
    Stats(StatsArgs),
    /// Set the last contact date of a contact
    Contacted(ContactedArgs),
}

#[derive(Args)]
pub struct DueArgs {
    /// Contact name (all contacts when omitted)
    pub name: Option<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct HistoryArgs {
    /// Exact date label to look up, e.g. 2024-09-20
    #[arg(short, long)]
    pub date: Option<String>,
    /// Contact name
    #[arg(short, long)]
    pub contact: Option<String>,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Limit to one contact
    #[arg(short, long)]
    pub contact: Option<String>,
}

#[derive(Args)]
pub struct ContactedArgs {
    /// Contact name
    pub name: String,
    /// Date in YYYY-MM-DD
    pub date: String,
}

/// Current local time, the clock every command measures against
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["touchbase", "--no-ai", "due", "--data", "/tmp/x.json"]).unwrap();
        assert!(cli.no_ai);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x.json")));
        assert!(matches!(cli.command, Some(Commands::Due(DueArgs { name: None }))));
    }

    #[test]
    fn test_history_requires_one_filter() {
        assert!(Cli::try_parse_from(["touchbase", "history"]).is_err());
        assert!(Cli::try_parse_from(["touchbase", "history", "-d", "2024-09-20", "-c", "Alex"]).is_err());
        assert!(Cli::try_parse_from(["touchbase", "history", "-c", "Alex"]).is_ok());
    }

    #[test]
    fn test_no_subcommand_runs_menu() {
        let cli = Cli::try_parse_from(["touchbase"]).unwrap();
        assert!(cli.command.is_none());
    }
}
