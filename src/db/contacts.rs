use chrono::NaiveDateTime;
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{
    normalize_optional, parse_contact_date, Contact, ContactDraft, ContactEdit, ContactId,
    FieldEdit, Group, GroupId,
};

impl Database {
    // ==================== CONTACT CREATE ====================

    /// Register a new contact in `group`.
    ///
    /// Requires at least one group to exist and `group` to belong to this
    /// database. Blank optional fields are stored as unset.
    pub fn add_contact(&mut self, draft: ContactDraft, group: GroupId) -> Result<ContactId> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Contact name is required"));
        }
        if self.groups.is_empty() {
            return Err(Error::precondition("Add a group before adding contacts"));
        }
        if group.0 >= self.groups.len() {
            return Err(Error::precondition(format!(
                "Group #{} does not exist",
                group.0 + 1
            )));
        }

        let mut contact = Contact::new(name, group);
        contact.birthday = normalize_optional(draft.birthday.as_deref());
        contact.gender = normalize_optional(draft.gender.as_deref());
        contact.residence = normalize_optional(draft.residence.as_deref());
        contact.hobbies = normalize_optional(draft.hobbies.as_deref());
        contact.additional_info = draft
            .additional_info
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let id = ContactId(self.contacts.len());
        debug!(contact = %contact.name, group = %self.groups[group.0].name, "added contact");
        self.contacts.push(contact);
        self.mark_dirty();
        Ok(id)
    }

    // ==================== CONTACT READ ====================

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contact_ids(&self) -> impl Iterator<Item = ContactId> {
        (0..self.contacts.len()).map(ContactId)
    }

    pub fn contact(&self, id: ContactId) -> Result<&Contact> {
        self.contacts
            .get(id.0)
            .ok_or_else(|| Error::not_found(format!("contact #{}", id.0 + 1)))
    }

    pub(crate) fn contact_mut(&mut self, id: ContactId) -> Result<&mut Contact> {
        self.contacts
            .get_mut(id.0)
            .ok_or_else(|| Error::not_found(format!("contact #{}", id.0 + 1)))
    }

    /// The group a contact belongs to
    pub fn group_of(&self, id: ContactId) -> Result<&Group> {
        let contact = self.contact(id)?;
        self.group(contact.group)
    }

    /// Contacts whose name matches `query`. Exact (case-insensitive) matches
    /// win; otherwise every contact containing all query words is returned.
    pub fn find_contacts(&self, query: &str) -> Vec<ContactId> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let exact: Vec<ContactId> = self
            .contact_ids()
            .filter(|id| self.contacts[id.0].name.to_lowercase() == query)
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        let words: Vec<&str> = query.split_whitespace().collect();
        self.contact_ids()
            .filter(|id| {
                let name = self.contacts[id.0].name.to_lowercase();
                words.iter().all(|w| name.contains(w))
            })
            .collect()
    }

    // ==================== CONTACT UPDATE ====================

    /// Apply a per-field edit. Blank values keep the current value; the name
    /// can be replaced but never cleared. Validation happens before any
    /// field changes.
    pub fn edit_contact(&mut self, id: ContactId, edit: &ContactEdit) -> Result<()> {
        if edit.name == FieldEdit::Clear {
            return Err(Error::validation("Contact name cannot be cleared"));
        }
        let contact = self.contact_mut(id)?;

        edit.name.apply_text(&mut contact.name);
        edit.birthday.apply_optional(&mut contact.birthday);
        edit.gender.apply_optional(&mut contact.gender);
        edit.residence.apply_optional(&mut contact.residence);
        edit.hobbies.apply_optional(&mut contact.hobbies);
        edit.additional_info.apply_text(&mut contact.additional_info);

        if !edit.is_empty() {
            debug!(contact = %contact.name, "edited contact");
            self.mark_dirty();
        }
        Ok(())
    }

    /// Move a contact to another group
    pub fn reassign_group(&mut self, id: ContactId, group: GroupId) -> Result<()> {
        self.group(group)?;
        let contact = self.contact_mut(id)?;
        if contact.group != group {
            contact.group = group;
            self.mark_dirty();
        }
        Ok(())
    }

    /// Set the last contact date from strict `YYYY-MM-DD` input. On a format
    /// error the stored date is left untouched.
    pub fn update_last_contact_date(&mut self, id: ContactId, input: &str) -> Result<NaiveDateTime> {
        let date = parse_contact_date(input)?;
        let contact = self.contact_mut(id)?;
        contact.last_contact_date = Some(date);
        debug!(contact = %contact.name, %date, "set last contact date");
        self.mark_dirty();
        Ok(date)
    }

    /// Record that the contact was reached at `now`
    pub fn mark_contacted(&mut self, id: ContactId, now: NaiveDateTime) -> Result<()> {
        self.contact_mut(id)?.mark_contacted(now);
        self.mark_dirty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn db_with_group() -> (Database, GroupId) {
        let mut db = Database::open_memory();
        let group = db.add_group("Friends", "14", "3").unwrap();
        (db, group)
    }

    #[test]
    fn test_add_contact_requires_group() {
        let mut db = Database::open_memory();
        let err = db.add_contact(ContactDraft::new("Alex"), GroupId(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(db.contacts().is_empty());
    }

    #[test]
    fn test_add_contact_unknown_group() {
        let (mut db, _) = db_with_group();
        let err = db.add_contact(ContactDraft::new("Alex"), GroupId(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(db.contacts().is_empty());
    }

    #[test]
    fn test_add_contact_requires_name() {
        let (mut db, group) = db_with_group();
        let err = db.add_contact(ContactDraft::new("   "), group).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(db.contacts().is_empty());
    }

    #[test]
    fn test_add_contact_normalizes_optional_fields() {
        let (mut db, group) = db_with_group();
        let draft = ContactDraft {
            name: " Alex ".into(),
            birthday: Some("1990-01-01".into()),
            gender: Some("  ".into()),
            residence: Some(" Seoul ".into()),
            hobbies: None,
            additional_info: None,
        };
        let id = db.add_contact(draft, group).unwrap();

        let alex = db.contact(id).unwrap();
        assert_eq!(alex.name, "Alex");
        assert_eq!(alex.birthday.as_deref(), Some("1990-01-01"));
        assert_eq!(alex.gender, None);
        assert_eq!(alex.residence.as_deref(), Some("Seoul"));
        assert_eq!(alex.hobbies, None);
        assert_eq!(alex.additional_info, "");
        assert_eq!(alex.last_contact_date, None);
        assert!(alex.contact_history.is_empty());
        assert_eq!(db.group_of(id).unwrap().name, "Friends");
    }

    #[test]
    fn test_edit_contact_blank_keeps_value() {
        let (mut db, group) = db_with_group();
        let id = db
            .add_contact(
                ContactDraft {
                    name: "Alex".into(),
                    hobbies: Some("chess".into()),
                    ..Default::default()
                },
                group,
            )
            .unwrap();

        let edit = ContactEdit {
            name: FieldEdit::from_input("  "),
            hobbies: FieldEdit::from_input(""),
            residence: FieldEdit::from_input("Busan"),
            additional_info: FieldEdit::from_input("owes me a book"),
            ..Default::default()
        };
        db.edit_contact(id, &edit).unwrap();

        let alex = db.contact(id).unwrap();
        assert_eq!(alex.name, "Alex");
        assert_eq!(alex.hobbies.as_deref(), Some("chess"));
        assert_eq!(alex.residence.as_deref(), Some("Busan"));
        assert_eq!(alex.additional_info, "owes me a book");
    }

    #[test]
    fn test_edit_contact_clear_marker() {
        let (mut db, group) = db_with_group();
        let id = db
            .add_contact(
                ContactDraft {
                    name: "Alex".into(),
                    hobbies: Some("chess".into()),
                    ..Default::default()
                },
                group,
            )
            .unwrap();

        let edit = ContactEdit {
            hobbies: FieldEdit::Clear,
            ..Default::default()
        };
        db.edit_contact(id, &edit).unwrap();
        assert_eq!(db.contact(id).unwrap().hobbies, None);

        let edit = ContactEdit {
            name: FieldEdit::Clear,
            gender: FieldEdit::Set("f".into()),
            ..Default::default()
        };
        assert_eq!(db.edit_contact(id, &edit).unwrap_err().kind(), ErrorKind::Validation);
        // Rejected edit leaves every field alone
        assert_eq!(db.contact(id).unwrap().gender, None);
        assert_eq!(db.contact(id).unwrap().name, "Alex");
    }

    #[test]
    fn test_update_last_contact_date() {
        let (mut db, group) = db_with_group();
        let id = db.add_contact(ContactDraft::new("Alex"), group).unwrap();

        let date = db.update_last_contact_date(id, "2024-09-20").unwrap();
        assert_eq!(db.contact(id).unwrap().last_contact_date, Some(date));

        let err = db.update_last_contact_date(id, "09/21/2024").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(db.contact(id).unwrap().last_contact_date, Some(date));
    }

    #[test]
    fn test_mark_contacted() {
        let (mut db, group) = db_with_group();
        let id = db.add_contact(ContactDraft::new("Alex"), group).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2024, 9, 20)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();

        db.mark_contacted(id, now).unwrap();
        assert_eq!(db.contact(id).unwrap().last_contact_date, Some(now));
    }

    #[test]
    fn test_find_contacts() {
        let (mut db, group) = db_with_group();
        let alex = db.add_contact(ContactDraft::new("Alex Kim"), group).unwrap();
        let alexa = db.add_contact(ContactDraft::new("Alexa Park"), group).unwrap();

        assert_eq!(db.find_contacts("alex kim"), vec![alex]);
        assert_eq!(db.find_contacts("alex"), vec![alex, alexa]);
        assert_eq!(db.find_contacts("park"), vec![alexa]);
        assert!(db.find_contacts("zoe").is_empty());
        assert!(db.find_contacts(" ").is_empty());
    }

    #[test]
    fn test_reassign_group() {
        let (mut db, friends) = db_with_group();
        let family = db.add_group("Family", "30", "5").unwrap();
        let id = db.add_contact(ContactDraft::new("Alex"), friends).unwrap();

        db.reassign_group(id, family).unwrap();
        assert_eq!(db.contact(id).unwrap().group, family);
        assert_eq!(db.reassign_group(id, GroupId(9)).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
