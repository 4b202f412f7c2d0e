//! Terminal charts over conversation statistics

use anyhow::Result;
use std::fmt::Display;

use super::now;
use super::ui::{find_contact_by_identifier, select_contact, term_size};
use crate::cadence::ScheduleProjection;
use crate::db::Database;
use crate::models::{ContactId, ConversationEntry};
use crate::stats;

const BAR: char = '█';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Importance,
    ContactTopics,
    ImportantTopics,
    PerDate,
    Schedule,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Importance,
        View::ContactTopics,
        View::ImportantTopics,
        View::PerDate,
        View::Schedule,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Importance => "Importance by category",
            View::ContactTopics => "Topics with one contact",
            View::ImportantTopics => "Important topics",
            View::PerDate => "Conversations per date",
            View::Schedule => "Contact schedule",
        }
    }
}

/// Horizontal bar chart, bars scaled so the largest value fills `width`
pub fn render_bars<L: Display>(title: &str, rows: &[(L, u64)], width: usize) -> String {
    let mut out = title.to_string();
    if rows.is_empty() {
        out.push_str("\n  (no data)");
        return out;
    }

    let labels: Vec<String> = rows.iter().map(|(l, _)| l.to_string()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);

    for (label, (_, value)) in labels.iter().zip(rows) {
        let len = (*value as usize * width).div_ceil(max as usize);
        let pad = label_width - label.chars().count();
        out.push_str(&format!(
            "\n  {}{} | {} {}",
            label,
            " ".repeat(pad),
            BAR.to_string().repeat(len),
            value
        ));
    }
    out
}

fn bar_width() -> usize {
    let (cols, _) = term_size();
    cols.saturating_sub(40).clamp(10, 50)
}

fn importance_chart<'a>(title: &str, entries: impl IntoIterator<Item = &'a ConversationEntry>) -> String {
    let rows: Vec<_> = stats::importance_by_category(entries)
        .into_iter()
        .map(|(c, total)| (c, u64::from(total)))
        .collect();
    render_bars(title, &rows, bar_width())
}

fn counts_chart<'a>(title: &str, entries: impl IntoIterator<Item = &'a ConversationEntry>) -> String {
    let rows: Vec<_> = stats::topic_counts(entries)
        .into_iter()
        .map(|(c, n)| (c, n as u64))
        .collect();
    render_bars(title, &rows, bar_width())
}

fn per_date_chart<'a>(entries: impl IntoIterator<Item = &'a ConversationEntry>) -> String {
    let rows: Vec<_> = stats::entries_per_date(entries)
        .into_iter()
        .map(|(d, n)| (d, n as u64))
        .collect();
    render_bars("Conversations per date", &rows, bar_width())
}

/// Important topic details grouped by category
pub fn render_important<'a>(entries: impl IntoIterator<Item = &'a ConversationEntry>) -> String {
    let important = stats::important_details(entries);
    let mut out = format!("Important topics (importance {}+)", stats::IMPORTANT_THRESHOLD);
    if important.is_empty() {
        out.push_str("\n  (none)");
    }
    for (category, details) in important {
        out.push_str(&format!("\n  {}", category));
        for detail in details {
            out.push_str(&format!("\n    - {}", detail));
        }
    }
    out
}

/// Days since last contact against days left in the interval
pub fn render_schedule(name: &str, projection: Option<ScheduleProjection>) -> String {
    let Some(p) = projection else {
        return format!("{}: no contact recorded yet.", name);
    };
    let rows = [
        ("since last contact", p.days_since_last_contact.max(0) as u64),
        ("until next contact", p.days_until_next as u64),
    ];
    let mut out = render_bars(&format!("{} - schedule (days)", name), &rows, bar_width());
    if p.overdue {
        out.push_str(&format!("\n  {} is past the contact interval.", name));
    }
    out
}

fn pick_contact(db: &Database, name: Option<&str>) -> Result<Option<ContactId>> {
    match name {
        Some(query) => {
            let found = find_contact_by_identifier(db, query)?;
            if found.is_none() {
                println!("No contact found matching \"{}\".", query);
            }
            Ok(found)
        }
        None => select_contact(db, "Contact:", None),
    }
}

/// Draw one chart. Per-contact views prompt for the contact.
pub fn run_view(db: &Database, view: View) -> Result<()> {
    let out = match view {
        View::Importance => importance_chart("Importance by category (all contacts)", db.all_entries()),
        View::ImportantTopics => render_important(db.all_entries()),
        View::PerDate => per_date_chart(db.all_entries()),
        View::ContactTopics | View::Schedule => {
            let Some(id) = pick_contact(db, None)? else {
                if db.contacts().is_empty() {
                    println!("No contacts yet.");
                }
                return Ok(());
            };
            contact_view(db, view, id)?
        }
    };
    println!("{}", out);
    Ok(())
}

fn contact_view(db: &Database, view: View, id: ContactId) -> Result<String> {
    let contact = db.contact(id)?;
    let history = db.history(id)?;
    Ok(match view {
        View::Importance => importance_chart(&format!("{} - importance by category", contact.name), history),
        View::ContactTopics => format!(
            "{}\n\n{}",
            counts_chart(&format!("{} - topics discussed", contact.name), history),
            importance_chart(&format!("{} - importance by category", contact.name), history),
        ),
        View::ImportantTopics => render_important(history),
        View::PerDate => per_date_chart(history),
        View::Schedule => render_schedule(&contact.name, db.schedule_projection(id, now())?),
    })
}

/// Every chart, either for everyone or for one contact
pub fn run_stats(db: &Database, contact: Option<&str>) -> Result<()> {
    if let Some(query) = contact {
        let Some(id) = pick_contact(db, Some(query))? else {
            return Ok(());
        };
        for view in [View::ContactTopics, View::ImportantTopics, View::PerDate, View::Schedule] {
            println!("{}\n", contact_view(db, view, id)?);
        }
        return Ok(());
    }

    println!("{}\n", importance_chart("Importance by category (all contacts)", db.all_entries()));
    println!("{}\n", counts_chart("Topics discussed (all contacts)", db.all_entries()));
    println!("{}\n", render_important(db.all_entries()));
    println!("{}\n", per_date_chart(db.all_entries()));

    let now = now();
    let mut overdue = Vec::new();
    for id in db.contact_ids() {
        let contact = db.contact(id)?;
        if let Some(p) = db.schedule_projection(id, now)? {
            if p.overdue {
                overdue.push((contact.name.as_str(), p.days_since_last_contact));
            }
        }
    }
    if !overdue.is_empty() {
        println!("Past their contact interval:");
        for (name, days) in overdue {
            println!("  {} ({} days since last contact)", name, days);
        }
    }
    Ok(())
}
