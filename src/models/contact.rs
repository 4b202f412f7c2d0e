use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use super::{ConversationEntry, GroupId};
use crate::error::{Error, Result};

/// Stable handle to a contact inside a [`crate::Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub(crate) usize);

/// An acquaintance bound to one cadence group.
///
/// Optional profile fields distinguish "never set" (`None`) from an
/// explicit empty value (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub group: GroupId,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub residence: Option<String>,
    pub hobbies: Option<String>,
    pub additional_info: String,
    pub last_contact_date: Option<NaiveDateTime>,
    pub contact_history: Vec<ConversationEntry>,
}

impl Contact {
    pub fn new(name: impl Into<String>, group: GroupId) -> Self {
        Self {
            name: name.into(),
            group,
            birthday: None,
            gender: None,
            residence: None,
            hobbies: None,
            additional_info: String::new(),
            last_contact_date: None,
            contact_history: Vec::new(),
        }
    }

    /// Stamp the last contact as happening at `now`.
    pub fn mark_contacted(&mut self, now: NaiveDateTime) {
        self.last_contact_date = Some(now);
    }
}

/// Input for creating a contact. Blank optional fields become unset.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub residence: Option<String>,
    pub hobbies: Option<String>,
    pub additional_info: Option<String>,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// What to do with one field during an edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldEdit {
    #[default]
    Keep,
    Set(String),
    Clear,
}

impl FieldEdit {
    /// Marker typed at a prompt to clear a field.
    pub const CLEAR_MARKER: &'static str = "-";

    /// Interpret prompt input: blank keeps, `-` clears, anything else sets.
    pub fn from_input(input: &str) -> Self {
        match input.trim() {
            "" => Self::Keep,
            Self::CLEAR_MARKER => Self::Clear,
            value => Self::Set(value.to_string()),
        }
    }

    /// `Set` with blank text is treated as `Keep`.
    pub(crate) fn normalized(&self) -> Self {
        match self {
            Self::Set(value) if value.trim().is_empty() => Self::Keep,
            Self::Set(value) => Self::Set(value.trim().to_string()),
            other => other.clone(),
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self.normalized(), Self::Keep)
    }

    pub(crate) fn apply_optional(&self, field: &mut Option<String>) {
        match self.normalized() {
            Self::Keep => {}
            Self::Set(value) => *field = Some(value),
            Self::Clear => *field = None,
        }
    }

    pub(crate) fn apply_text(&self, field: &mut String) {
        match self.normalized() {
            Self::Keep => {}
            Self::Set(value) => *field = value,
            Self::Clear => field.clear(),
        }
    }
}

/// Per-field changes to a contact.
#[derive(Debug, Clone, Default)]
pub struct ContactEdit {
    pub name: FieldEdit,
    pub birthday: FieldEdit,
    pub gender: FieldEdit,
    pub residence: FieldEdit,
    pub hobbies: FieldEdit,
    pub additional_info: FieldEdit,
}

impl ContactEdit {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.birthday,
            &self.gender,
            &self.residence,
            &self.hobbies,
            &self.additional_info,
        ]
        .iter()
        .all(|f| f.is_keep())
    }
}

/// Blank or whitespace-only input becomes unset.
pub fn normalize_optional(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strict_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Parse a strict `YYYY-MM-DD` date into midnight of that day.
pub fn parse_contact_date(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    let invalid = || Error::format(format!("Invalid date \"{}\". Use YYYY-MM-DD.", input));

    if !strict_date_pattern().is_match(input) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
    Ok(date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_field_edit_from_input() {
        assert_eq!(FieldEdit::from_input(""), FieldEdit::Keep);
        assert_eq!(FieldEdit::from_input("   "), FieldEdit::Keep);
        assert_eq!(FieldEdit::from_input("-"), FieldEdit::Clear);
        assert_eq!(FieldEdit::from_input(" Seoul "), FieldEdit::Set("Seoul".into()));
    }

    #[test]
    fn test_field_edit_apply() {
        let mut residence = Some("Busan".to_string());
        FieldEdit::Set("  ".into()).apply_optional(&mut residence);
        assert_eq!(residence.as_deref(), Some("Busan"));
        FieldEdit::Set("Seoul".into()).apply_optional(&mut residence);
        assert_eq!(residence.as_deref(), Some("Seoul"));
        FieldEdit::Clear.apply_optional(&mut residence);
        assert_eq!(residence, None);

        let mut info = "likes tea".to_string();
        FieldEdit::Keep.apply_text(&mut info);
        assert_eq!(info, "likes tea");
        FieldEdit::Clear.apply_text(&mut info);
        assert_eq!(info, "");
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(Some(" chess ")), Some("chess".into()));
    }

    #[test]
    fn test_parse_contact_date() {
        let dt = parse_contact_date("2024-09-20").unwrap();
        assert_eq!(dt.to_string(), "2024-09-20 00:00:00");

        for bad in ["2024-9-20", "20240920", "2024-13-01", "2024-02-30", "yesterday", ""] {
            let err = parse_contact_date(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_contact_edit_is_empty() {
        assert!(ContactEdit::default().is_empty());
        let edit = ContactEdit {
            hobbies: FieldEdit::Set("go".into()),
            ..Default::default()
        };
        assert!(!edit.is_empty());
    }
}
