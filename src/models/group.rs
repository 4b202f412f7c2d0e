use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable handle to a group inside a [`crate::Database`].
///
/// Groups are never removed, so a handle stays valid for the lifetime of the
/// database it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named cadence policy: reach out every `contact_interval` days, give or
/// take `tolerance` days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub contact_interval: u32,
    pub tolerance: u32,
}

impl Group {
    pub fn new(name: impl Into<String>, contact_interval: u32, tolerance: u32) -> Self {
        Self {
            name: name.into(),
            contact_interval,
            tolerance,
        }
    }

    /// Inclusive range of elapsed days during which a contact is due.
    /// The lower bound may be negative when tolerance exceeds the interval.
    pub fn due_window(&self) -> (i64, i64) {
        let interval = i64::from(self.contact_interval);
        let tolerance = i64::from(self.tolerance);
        (interval - tolerance, interval + tolerance)
    }

    /// "every 14d ±3d"
    pub fn cadence_label(&self) -> String {
        format!("every {}d ±{}d", self.contact_interval, self.tolerance)
    }
}

/// Changes to apply to a group. Each field holds raw user input; `None` or
/// blank input leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct GroupEdit {
    pub name: Option<String>,
    pub contact_interval: Option<String>,
    pub tolerance: Option<String>,
}

/// Outcome of a per-field edit: which fields changed and which were rejected.
#[derive(Debug, Default)]
pub struct EditReport {
    pub applied: Vec<&'static str>,
    pub rejected: Vec<(&'static str, Error)>,
}

impl EditReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse a day count typed by the user. Accepts surrounding whitespace;
/// rejects signs other than a leading `+`, fractions and empty input.
pub fn parse_days(field: &str, input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    trimmed.parse::<u32>().map_err(|_| {
        Error::validation(format!(
            "{} must be a whole number of days (0 or more), got \"{}\"",
            field, trimmed
        ))
    })
}

/// Trim a group name, rejecting empty input.
pub(crate) fn clean_group_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::validation("Group name is required"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("interval", "14").unwrap(), 14);
        assert_eq!(parse_days("interval", "  0 ").unwrap(), 0);
        assert_eq!(parse_days("interval", "-3").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(parse_days("interval", "two").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(parse_days("interval", "1.5").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(parse_days("interval", "").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_due_window() {
        assert_eq!(Group::new("Close Friends", 14, 3).due_window(), (11, 17));
        assert_eq!(Group::new("Loose", 2, 5).due_window(), (-3, 7));
        assert_eq!(Group::new("Degenerate", 0, 0).due_window(), (0, 0));
    }

    #[test]
    fn test_clean_group_name() {
        assert_eq!(clean_group_name("  Family ").unwrap(), "Family");
        assert!(clean_group_name("   ").is_err());
    }
}
