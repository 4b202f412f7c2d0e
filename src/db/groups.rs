use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{clean_group_name, parse_days, EditReport, Group, GroupEdit, GroupId};

impl Database {
    // ==================== GROUP CREATE ====================

    /// Register a new group from raw user input. Nothing is stored unless all
    /// three values validate.
    pub fn add_group(&mut self, name: &str, interval: &str, tolerance: &str) -> Result<GroupId> {
        let name = clean_group_name(name)?;
        self.ensure_group_name_free(&name, None)?;
        let contact_interval = parse_days("Contact interval", interval)?;
        let tolerance = parse_days("Tolerance", tolerance)?;

        let id = GroupId(self.groups.len());
        debug!(group = %name, contact_interval, tolerance, "added group");
        self.groups.push(Group::new(name, contact_interval, tolerance));
        self.mark_dirty();
        Ok(id)
    }

    // ==================== GROUP READ ====================

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> {
        (0..self.groups.len()).map(GroupId)
    }

    pub fn group(&self, id: GroupId) -> Result<&Group> {
        self.groups
            .get(id.0)
            .ok_or_else(|| Error::not_found(format!("group #{}", id.0 + 1)))
    }

    pub fn find_group_by_name(&self, name: &str) -> Result<GroupId> {
        let name = name.trim();
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(GroupId)
            .ok_or_else(|| Error::not_found(format!("group \"{}\"", name)))
    }

    /// Number of contacts assigned to the group
    pub fn group_size(&self, id: GroupId) -> usize {
        self.contacts.iter().filter(|c| c.group == id).count()
    }

    // ==================== GROUP UPDATE ====================

    /// Apply the supplied fields one by one. A field that fails validation is
    /// reported and skipped; it never blocks the others.
    pub fn edit_group(&mut self, id: GroupId, edit: GroupEdit) -> Result<EditReport> {
        self.group(id)?;
        let mut report = EditReport::default();

        if let Some(raw) = supplied(&edit.name) {
            match clean_group_name(raw).and_then(|n| {
                self.ensure_group_name_free(&n, Some(id))?;
                Ok(n)
            }) {
                Ok(name) => {
                    self.groups[id.0].name = name;
                    report.applied.push("name");
                }
                Err(e) => report.rejected.push(("name", e)),
            }
        }

        if let Some(raw) = supplied(&edit.contact_interval) {
            match parse_days("Contact interval", raw) {
                Ok(days) => {
                    self.groups[id.0].contact_interval = days;
                    report.applied.push("contact_interval");
                }
                Err(e) => report.rejected.push(("contact_interval", e)),
            }
        }

        if let Some(raw) = supplied(&edit.tolerance) {
            match parse_days("Tolerance", raw) {
                Ok(days) => {
                    self.groups[id.0].tolerance = days;
                    report.applied.push("tolerance");
                }
                Err(e) => report.rejected.push(("tolerance", e)),
            }
        }

        if !report.applied.is_empty() {
            debug!(group = %self.groups[id.0].name, fields = ?report.applied, "edited group");
            self.mark_dirty();
        }
        Ok(report)
    }

    fn ensure_group_name_free(&self, name: &str, except: Option<GroupId>) -> Result<()> {
        let taken = self
            .groups
            .iter()
            .enumerate()
            .any(|(idx, g)| g.name == name && Some(GroupId(idx)) != except);
        if taken {
            return Err(Error::validation(format!("A group named \"{}\" already exists", name)));
        }
        Ok(())
    }
}

fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
