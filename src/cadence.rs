//! Due-date computation.
//!
//! Everything here is a pure function of a contact, its group and the
//! current time. Nothing is cached and nothing is written back.
//!
//! A contact is due while the days elapsed since the last contact fall
//! inside `interval ± tolerance`, inclusive. Past the upper bound the
//! contact reports [`DueState::NotYetDue`] again; there is no separate
//! overdue state. [`ScheduleProjection::overdue`] exposes that tail for
//! display only.

use chrono::NaiveDateTime;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Contact, ContactId, Group};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    NoHistory,
    Due,
    NotYetDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueStatus {
    pub state: DueState,
    pub days_since_last_contact: Option<i64>,
}

impl DueStatus {
    pub fn is_due(&self) -> bool {
        self.state == DueState::Due
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleProjection {
    pub days_since_last_contact: i64,
    /// Days until the interval is reached, never negative
    pub days_until_next: i64,
    /// The interval has already passed and `days_until_next` was clamped
    pub overdue: bool,
}

/// Whole days from `last` to `now`, rounded down. Negative when `last` is in
/// the future.
pub fn elapsed_days(last: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - last).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn due_status(contact: &Contact, group: &Group, now: NaiveDateTime) -> DueStatus {
    let Some(last) = contact.last_contact_date else {
        return DueStatus {
            state: DueState::NoHistory,
            days_since_last_contact: None,
        };
    };

    let elapsed = elapsed_days(last, now);
    let (low, high) = group.due_window();
    let state = if (low..=high).contains(&elapsed) {
        DueState::Due
    } else {
        DueState::NotYetDue
    };

    DueStatus {
        state,
        days_since_last_contact: Some(elapsed),
    }
}

/// Days since the last contact and days left until the interval. `None`
/// when the contact has never been reached.
pub fn schedule_projection(
    contact: &Contact,
    group: &Group,
    now: NaiveDateTime,
) -> Option<ScheduleProjection> {
    let last = contact.last_contact_date?;
    let elapsed = elapsed_days(last, now);
    let remaining = i64::from(group.contact_interval) - elapsed;

    Some(ScheduleProjection {
        days_since_last_contact: elapsed,
        days_until_next: remaining.max(0),
        overdue: remaining < 0,
    })
}

impl Database {
    pub fn due_status(&self, id: ContactId, now: NaiveDateTime) -> Result<DueStatus> {
        let contact = self.contact(id)?;
        Ok(due_status(contact, self.group(contact.group)?, now))
    }

    pub fn schedule_projection(
        &self,
        id: ContactId,
        now: NaiveDateTime,
    ) -> Result<Option<ScheduleProjection>> {
        let contact = self.contact(id)?;
        Ok(schedule_projection(contact, self.group(contact.group)?, now))
    }

    /// Status of every contact, in insertion order
    pub fn due_report(&self, now: NaiveDateTime) -> Result<Vec<(ContactId, DueStatus)>> {
        self.contact_ids()
            .map(|id| Ok((id, self.due_status(id, now)?)))
            .collect()
    }
}
