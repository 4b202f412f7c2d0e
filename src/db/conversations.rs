use std::collections::BTreeMap;
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Category, Contact, ContactId, ConversationEntry, EntryEdit, TopicNote};

impl Database {
    // ==================== LEDGER WRITE ====================

    /// Append a conversation to a contact's history.
    ///
    /// `topics` holds only the categories that were discussed; importance is
    /// already range-checked by its type. The date label is stored exactly as
    /// typed; only an all-blank label is refused.
    pub fn record_conversation(
        &mut self,
        id: ContactId,
        date_label: &str,
        topics: BTreeMap<Category, TopicNote>,
    ) -> Result<&ConversationEntry> {
        if date_label.trim().is_empty() {
            return Err(Error::validation("Conversation date is required"));
        }
        let date = date_label;

        let contact = self.contact_mut(id)?;
        contact
            .contact_history
            .push(ConversationEntry::new(date, topics));
        debug!(
            contact = %contact.name,
            date,
            entries = contact.contact_history.len(),
            "recorded conversation"
        );
        self.mark_dirty();

        let contact = self.contact(id)?;
        contact
            .contact_history
            .last()
            .ok_or_else(|| Error::not_found("recorded entry"))
    }

    /// Edit one entry in place. Only categories already on the entry can be
    /// changed; the whole edit is rejected before any change otherwise.
    pub fn edit_entry(&mut self, id: ContactId, index: usize, edit: EntryEdit) -> Result<()> {
        let contact = self.contact_mut(id)?;
        let entry = contact
            .contact_history
            .get_mut(index)
            .ok_or_else(|| Error::not_found(format!("conversation #{}", index + 1)))?;

        if let Some(category) = edit.topics.keys().find(|c| !entry.topics.contains_key(*c)) {
            return Err(Error::validation(format!(
                "{} was not discussed in this conversation and cannot be added",
                category
            )));
        }

        let mut changed = false;
        if let Some(date) = edit.date.as_deref().filter(|d| !d.trim().is_empty()) {
            entry.date = date.to_string();
            changed = true;
        }
        for (category, update) in edit.topics {
            let Some(note) = entry.topics.get_mut(&category) else {
                continue;
            };
            if let Some(importance) = update.importance {
                note.importance = importance;
                changed = true;
            }
            if let Some(details) = update.details.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
                note.details = details.to_string();
                changed = true;
            }
        }

        if changed {
            debug!(contact = %contact.name, index, "edited conversation");
            self.mark_dirty();
        }
        Ok(())
    }

    // ==================== LEDGER READ ====================

    /// Every entry in insertion order
    pub fn history(&self, id: ContactId) -> Result<&[ConversationEntry]> {
        Ok(&self.contact(id)?.contact_history)
    }

    /// Entries whose date label equals `label` exactly, across all contacts
    pub fn query_by_date_label(&self, label: &str) -> Vec<(&Contact, &ConversationEntry)> {
        self.contacts
            .iter()
            .flat_map(|c| c.contact_history.iter().map(move |e| (c, e)))
            .filter(|(_, e)| e.date == label)
            .collect()
    }

    /// Up to `n` entries ordered by date label, newest first.
    ///
    /// Labels compare as plain strings, which is chronological only for
    /// `YYYY-MM-DD` style labels. Equal labels keep insertion order.
    pub fn most_recent(&self, id: ContactId, n: usize) -> Result<Vec<&ConversationEntry>> {
        let mut entries: Vec<&ConversationEntry> = self.history(id)?.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(n);
        Ok(entries)
    }

    /// All entries of all contacts
    pub fn all_entries(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.contacts.iter().flat_map(|c| c.contact_history.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{ContactDraft, Importance, TopicEdit};

    fn note(importance: u8, details: &str) -> TopicNote {
        TopicNote::new(Importance::new(importance).unwrap(), details)
    }

    fn setup() -> (Database, ContactId) {
        let mut db = Database::open_memory();
        let group = db.add_group("Friends", "14", "3").unwrap();
        let id = db.add_contact(ContactDraft::new("Alex"), group).unwrap();
        (db, id)
    }

    #[test]
    fn test_record_only_discussed_categories() {
        let (mut db, id) = setup();
        let mut topics = BTreeMap::new();
        topics.insert(Category::Work, note(4, "promotion talk"));

        let entry = db.record_conversation(id, "2024-09-20", topics).unwrap();
        assert_eq!(entry.date, "2024-09-20");
        assert_eq!(entry.topics.len(), 1);
        assert_eq!(entry.topics[&Category::Work], note(4, "promotion talk"));
        assert_eq!(db.history(id).unwrap().len(), 1);
    }

    #[test]
    fn test_record_requires_date() {
        let (mut db, id) = setup();
        let err = db.record_conversation(id, "  ", BTreeMap::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(db.history(id).unwrap().is_empty());
    }

    #[test]
    fn test_date_label_stored_verbatim() {
        let (mut db, id) = setup();
        db.record_conversation(id, " 2024-09-20 ", BTreeMap::new()).unwrap();

        assert_eq!(db.history(id).unwrap()[0].date, " 2024-09-20 ");
        assert_eq!(db.query_by_date_label(" 2024-09-20 ").len(), 1);
        assert!(db.query_by_date_label("2024-09-20").is_empty());
    }

    #[test]
    fn test_record_unknown_contact() {
        let (mut db, _) = setup();
        let err = db
            .record_conversation(ContactId(7), "2024-09-20", BTreeMap::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_edit_entry_updates_existing_categories() {
        let (mut db, id) = setup();
        let mut topics = BTreeMap::new();
        topics.insert(Category::Work, note(4, "promotion talk"));
        topics.insert(Category::Hobby, note(2, "bouldering"));
        db.record_conversation(id, "2024-09-20", topics).unwrap();

        let mut updates = BTreeMap::new();
        updates.insert(
            Category::Work,
            TopicEdit {
                importance: Some(Importance::new(5).unwrap()),
                details: Some("  ".into()),
            },
        );
        updates.insert(
            Category::Hobby,
            TopicEdit {
                importance: None,
                details: Some("lead climbing".into()),
            },
        );
        db.edit_entry(
            id,
            0,
            EntryEdit {
                date: Some("2024-09-21".into()),
                topics: updates,
            },
        )
        .unwrap();

        let entry = &db.history(id).unwrap()[0];
        assert_eq!(entry.date, "2024-09-21");
        assert_eq!(entry.topics[&Category::Work], note(5, "promotion talk"));
        assert_eq!(entry.topics[&Category::Hobby], note(2, "lead climbing"));
    }

    #[test]
    fn test_edit_entry_cannot_add_category() {
        let (mut db, id) = setup();
        let mut topics = BTreeMap::new();
        topics.insert(Category::Work, note(4, "promotion talk"));
        db.record_conversation(id, "2024-09-20", topics).unwrap();

        let mut updates = BTreeMap::new();
        updates.insert(
            Category::Romance,
            TopicEdit {
                importance: Some(Importance::new(3).unwrap()),
                details: Some("new partner".into()),
            },
        );
        let err = db
            .edit_entry(
                id,
                0,
                EntryEdit {
                    date: Some("2030-01-01".into()),
                    topics: updates,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let entry = &db.history(id).unwrap()[0];
        assert_eq!(entry.date, "2024-09-20");
        assert!(!entry.topics.contains_key(&Category::Romance));
    }

    #[test]
    fn test_edit_entry_bad_index() {
        let (mut db, id) = setup();
        let err = db.edit_entry(id, 3, EntryEdit::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_query_by_date_label_exact_match() {
        let (mut db, alex) = setup();
        let group = db.find_group_by_name("Friends").unwrap();
        let sam = db.add_contact(ContactDraft::new("Sam"), group).unwrap();

        db.record_conversation(alex, "2024-09-20", BTreeMap::new()).unwrap();
        db.record_conversation(alex, "2024-09-2", BTreeMap::new()).unwrap();
        db.record_conversation(sam, "2024-09-20", BTreeMap::new()).unwrap();

        let hits = db.query_by_date_label("2024-09-20");
        let names: Vec<&str> = hits.iter().map(|(c, _)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alex", "Sam"]);
        assert!(db.query_by_date_label("2024-09").is_empty());
    }

    #[test]
    fn test_most_recent_sorts_by_label_descending() {
        let (mut db, id) = setup();
        for label in ["2024-03-01", "2024-09-20", "2023-12-31", "2024-05-05"] {
            db.record_conversation(id, label, BTreeMap::new()).unwrap();
        }

        let labels: Vec<&str> = db
            .most_recent(id, 3)
            .unwrap()
            .iter()
            .map(|e| e.date.as_str())
            .collect();
        assert_eq!(labels, vec!["2024-09-20", "2024-05-05", "2024-03-01"]);

        // Insertion order untouched
        assert_eq!(db.history(id).unwrap()[0].date, "2024-03-01");
        assert_eq!(db.most_recent(id, 10).unwrap().len(), 4);
    }

    #[test]
    fn test_most_recent_is_lexicographic() {
        let (mut db, id) = setup();
        db.record_conversation(id, "9/1/2024", BTreeMap::new()).unwrap();
        db.record_conversation(id, "10/1/2024", BTreeMap::new()).unwrap();

        let first = db.most_recent(id, 1).unwrap()[0].date.clone();
        assert_eq!(first, "9/1/2024");
    }
}
