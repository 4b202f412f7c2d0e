//! Persisted document shape and the conversion between it and the in-memory
//! registries.
//!
//! On disk a contact names its group; in memory it holds a [`GroupId`].
//! Field names and the `YYYY-MM-DD HH:MM:SS` timestamp format are the
//! compatibility surface and must not change.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Contact, ConversationEntry, Group, GroupId};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub groups: Vec<Group>,
    pub contacts: Vec<ContactRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub group: String,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub residence: Option<String>,
    pub hobbies: Option<String>,
    #[serde(default)]
    pub additional_info: String,
    pub last_contact_date: Option<String>,
    #[serde(default)]
    pub contact_history: Vec<ConversationEntry>,
}

/// How to treat a contact whose group name matches no group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Drop the contact and report it
    #[default]
    Lenient,
    /// Reject the whole document
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedContact {
    pub name: String,
    pub group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub dropped_contacts: Vec<DroppedContact>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("contact \"{contact}\" refers to unknown group \"{group}\"")]
    UnknownGroup { contact: String, group: String },

    #[error("contact \"{contact}\" has an invalid last_contact_date \"{value}\"")]
    BadTimestamp { contact: String, value: String },
}

impl Document {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Flatten the registries into their persisted shape. Every contact's group
/// handle must come from `groups`.
pub fn serialize(groups: &[Group], contacts: &[Contact]) -> Document {
    let contacts = contacts
        .iter()
        .map(|c| ContactRecord {
            name: c.name.clone(),
            group: groups
                .get(c.group.index())
                .map(|g| g.name.clone())
                .unwrap_or_default(),
            birthday: c.birthday.clone(),
            gender: c.gender.clone(),
            residence: c.residence.clone(),
            hobbies: c.hobbies.clone(),
            additional_info: c.additional_info.clone(),
            last_contact_date: c.last_contact_date.as_ref().map(format_timestamp),
            contact_history: c.contact_history.clone(),
        })
        .collect();

    Document {
        groups: groups.to_vec(),
        contacts,
    }
}

/// Rebuild the registries: groups first, then contacts, resolving each
/// contact's group by name. With duplicate group names the first one wins.
pub fn deserialize(
    doc: Document,
    policy: LoadPolicy,
) -> Result<(Vec<Group>, Vec<Contact>, LoadReport), DocumentError> {
    let mut by_name: HashMap<&str, GroupId> = HashMap::new();
    for (idx, group) in doc.groups.iter().enumerate() {
        by_name.entry(group.name.as_str()).or_insert(GroupId(idx));
    }

    let mut contacts = Vec::with_capacity(doc.contacts.len());
    let mut report = LoadReport::default();

    for record in doc.contacts {
        let Some(&group) = by_name.get(record.group.as_str()) else {
            if policy == LoadPolicy::Strict {
                return Err(DocumentError::UnknownGroup {
                    contact: record.name,
                    group: record.group,
                });
            }
            report.dropped_contacts.push(DroppedContact {
                name: record.name,
                group: record.group,
            });
            continue;
        };

        let last_contact_date = match record.last_contact_date {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| DocumentError::BadTimestamp {
                contact: record.name.clone(),
                value: raw.clone(),
            })?),
            None => None,
        };

        contacts.push(Contact {
            name: record.name,
            group,
            birthday: record.birthday,
            gender: record.gender,
            residence: record.residence,
            hobbies: record.hobbies,
            additional_info: record.additional_info,
            last_contact_date,
            contact_history: record.contact_history,
        });
    }

    Ok((doc.groups, contacts, report))
}
