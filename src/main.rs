use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use touchbase::cli::ai::{AiConfig, TopicSuggester};
use touchbase::cli::ui::warning;
use touchbase::cli::{
    run_due, run_groups, run_history_by_contact, run_history_by_date, run_list, run_menu,
    run_set_last_contact, run_stats, Cli, Commands,
};
use touchbase::db::{Database, LoadPolicy};

fn main() -> anyhow::Result<()> {
    // Parse first so --help/--version work without logging set up
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let path = match cli.data.clone() {
        Some(path) => path,
        None => Database::default_path()?,
    };
    let policy = if cli.strict {
        LoadPolicy::Strict
    } else {
        LoadPolicy::Lenient
    };

    let (mut db, recovery) = Database::open_or_recover(&path, policy)?;
    if let Some(recovery) = recovery {
        warning(&format!("could not load {}: {}", path.display(), recovery.error));
        match recovery.backup {
            Some(backup) => warning(&format!("unreadable file moved to {}", backup.display())),
            None => warning("starting with an empty database"),
        }
    }
    for dropped in &db.load_report().dropped_contacts {
        warning(&format!(
            "dropped contact {} (unknown group \"{}\")",
            dropped.name, dropped.group
        ));
    }

    let mut suggester = TopicSuggester::from_config(&AiConfig::from_env(), !cli.no_ai);

    match cli.command {
        None => {
            // No subcommand provided - show interactive menu
            run_menu(&mut db, &mut suggester)?;
        }
        Some(Commands::List) => {
            run_list(&db)?;
        }
        Some(Commands::Groups) => {
            run_groups(&db)?;
        }
        Some(Commands::Due(args)) => {
            run_due(&db, &mut suggester, args.name.as_deref())?;
        }
        Some(Commands::History(args)) => {
            if let Some(date) = args.date.as_deref() {
                run_history_by_date(&db, Some(date))?;
            } else {
                run_history_by_contact(&db, args.contact.as_deref())?;
            }
        }
        Some(Commands::Stats(args)) => {
            run_stats(&db, args.contact.as_deref())?;
        }
        Some(Commands::Contacted(args)) => {
            run_set_last_contact(&mut db, Some(&args.name), Some(&args.date))?;
            db.save()?;
        }
    }

    Ok(())
}
