//! The application context: group and contact registries plus the JSON
//! store they are loaded from and saved to.
//!
//! Everything the program knows lives in one `Database` value that is passed
//! by reference to every command. There is no background writer; the store
//! is read once by [`Database::open_at`] and written by [`Database::save`].

use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Contact, Group};

mod contacts;
mod conversations;
pub mod document;
mod groups;

pub use document::{Document, LoadPolicy, LoadReport};
use document::DocumentError;

/// Environment variable overriding the data file location
pub const ENV_DATA_PATH: &str = "TOUCHBASE_DATA";

pub struct Database {
    path: Option<PathBuf>,
    groups: Vec<Group>,
    contacts: Vec<Contact>,
    load_report: LoadReport,
    dirty: bool,
}

/// A document that could not be parsed, or one the load policy refused
enum LoadFailure {
    Unreadable(Error),
    Rejected(Error),
}

impl LoadFailure {
    fn into_error(self) -> Error {
        match self {
            LoadFailure::Unreadable(e) | LoadFailure::Rejected(e) => e,
        }
    }
}

/// Why a store could not be opened and where the unreadable file went.
#[derive(Debug)]
pub struct Recovery {
    pub error: Error,
    pub backup: Option<PathBuf>,
}

impl Database {
    /// Open the store at the default location
    pub fn open(policy: LoadPolicy) -> Result<Self> {
        Self::open_at(Self::default_path()?, policy)
    }

    /// Open the store at `path`. A missing file yields an empty database
    /// that will be created on first save.
    pub fn open_at(path: impl Into<PathBuf>, policy: LoadPolicy) -> Result<Self> {
        Self::load(path.into(), policy).map_err(LoadFailure::into_error)
    }

    /// Open the store at `path`, falling back to an empty database when it
    /// cannot be read or parsed. The unreadable file is moved aside so a
    /// later save cannot overwrite it.
    ///
    /// A well-formed file refused by [`LoadPolicy::Strict`] is not corrupt:
    /// it is left in place and the error is returned.
    pub fn open_or_recover(
        path: impl Into<PathBuf>,
        policy: LoadPolicy,
    ) -> Result<(Self, Option<Recovery>)> {
        let path = path.into();
        match Self::load(path.clone(), policy) {
            Ok(db) => Ok((db, None)),
            Err(LoadFailure::Rejected(error)) => Err(error),
            Err(LoadFailure::Unreadable(error)) => {
                warn!(error = %error, "could not load data file, starting empty");
                let backup = move_aside(&path);
                Ok((Self::empty(Some(path)), Some(Recovery { error, backup })))
            }
        }
    }

    fn load(path: PathBuf, policy: LoadPolicy) -> std::result::Result<Self, LoadFailure> {
        let mut db = Self::empty(Some(path.clone()));

        if !path.exists() {
            info!(path = %path.display(), "no data file yet, starting fresh");
            return Ok(db);
        }

        let unreadable = |e: &dyn std::fmt::Display| LoadFailure::Unreadable(Error::persistence(&path, e));
        let raw = fs::read_to_string(&path).map_err(|e| unreadable(&e))?;
        let doc = Document::from_json(&raw).map_err(|e| unreadable(&e))?;
        let (groups, contacts, report) = document::deserialize(doc, policy).map_err(|e| match e {
            DocumentError::UnknownGroup { .. } => {
                LoadFailure::Rejected(Error::persistence(&path, &e))
            }
            DocumentError::BadTimestamp { .. } => unreadable(&e),
        })?;

        for dropped in &report.dropped_contacts {
            warn!(
                contact = %dropped.name,
                group = %dropped.group,
                "dropping contact whose group does not exist"
            );
        }
        info!(
            path = %path.display(),
            groups = groups.len(),
            contacts = contacts.len(),
            "loaded data file"
        );

        db.groups = groups;
        db.contacts = contacts;
        db.load_report = report;
        Ok(db)
    }

    /// In-memory database with no backing file, for tests
    pub fn open_memory() -> Self {
        Self::empty(None)
    }

    fn empty(path: Option<PathBuf>) -> Self {
        Self {
            path,
            groups: Vec::new(),
            contacts: Vec::new(),
            load_report: LoadReport::default(),
            dirty: false,
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_DATA_PATH) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::persistence("~", "could not find a config directory for this user")
        })?;
        Ok(config_dir.join("touchbase").join("contacts.json"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Contacts discarded while loading because their group was missing
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// True when there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Snapshot the whole graph in its persisted shape
    pub fn to_document(&self) -> Document {
        document::serialize(&self.groups, &self.contacts)
    }

    /// Write the full graph to the backing file.
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// the target, so a crash mid-write leaves the previous file intact.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| Error::precondition("This database has no backing file"))?;

        let json = self
            .to_document()
            .to_json()
            .map_err(|e| Error::persistence(&path, e))?;
        write_atomic(&path, json.as_bytes()).map_err(|e| Error::persistence(&path, e))?;

        self.dirty = false;
        debug!(path = %path.display(), bytes = json.len(), "saved data file");
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Rename an unreadable data file to `<name>.corrupt-<timestamp>`.
fn move_aside(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".corrupt-{}", Local::now().format("%Y%m%d%H%M%S")));
    let backup = PathBuf::from(name);

    match fs::rename(path, &backup) {
        Ok(()) => {
            warn!(backup = %backup.display(), "moved unreadable data file aside");
            Some(backup)
        }
        Err(e) => {
            warn!(error = %e, "could not move unreadable data file aside");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::ContactDraft;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let db = Database::open_at(dir.path().join("contacts.json"), LoadPolicy::Lenient).unwrap();
        assert!(db.groups().is_empty());
        assert!(db.contacts().is_empty());
        assert!(!db.is_dirty());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("contacts.json");

        let mut db = Database::open_at(&path, LoadPolicy::Lenient).unwrap();
        let group = db.add_group("Family", "30", "5").unwrap();
        db.add_contact(ContactDraft::new("Mina"), group).unwrap();
        assert!(db.is_dirty());
        db.save().unwrap();
        assert!(!db.is_dirty());

        let reopened = Database::open_at(&path, LoadPolicy::Lenient).unwrap();
        assert_eq!(reopened.groups().len(), 1);
        assert_eq!(reopened.contacts().len(), 1);
        assert_eq!(reopened.contacts()[0].name, "Mina");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let mut db = Database::open_at(&path, LoadPolicy::Lenient).unwrap();
        db.add_group("Work", "7", "1").unwrap();
        db.save().unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["contacts.json".to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Database::open_at(&path, LoadPolicy::Lenient).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_wrong_structure_is_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, r#"{"groups": 3, "contacts": []}"#).unwrap();

        let err = Database::open_at(&path, LoadPolicy::Lenient).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_open_or_recover_starts_empty_and_backs_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, "garbage").unwrap();

        let (db, recovery) = Database::open_or_recover(&path, LoadPolicy::Lenient).unwrap();
        assert!(db.groups().is_empty());
        assert!(db.contacts().is_empty());

        let recovery = recovery.unwrap();
        assert_eq!(recovery.error.kind(), ErrorKind::Persistence);
        let backup = recovery.backup.unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "garbage");
        assert!(!path.exists());
    }

    #[test]
    fn test_strict_rejection_leaves_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let raw = r#"{"groups": [{"name": "Family", "contact_interval": 7, "tolerance": 1}],
            "contacts": [{"name": "Ghost", "group": "Gone", "birthday": null, "gender": null,
            "residence": null, "hobbies": null, "additional_info": "",
            "last_contact_date": null, "contact_history": []}]}"#;
        fs::write(&path, raw).unwrap();

        let err = Database::open_or_recover(&path, LoadPolicy::Strict).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(fs::read_to_string(&path).unwrap(), raw);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let db = Database::open_at(&path, LoadPolicy::Lenient).unwrap();
        assert_eq!(db.groups().len(), 1);
        assert_eq!(db.load_report().dropped_contacts.len(), 1);
    }

    #[test]
    fn test_bad_timestamp_is_moved_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(
            &path,
            r#"{"groups": [{"name": "Family", "contact_interval": 7, "tolerance": 1}],
            "contacts": [{"name": "Mom", "group": "Family", "birthday": null, "gender": null,
            "residence": null, "hobbies": null, "additional_info": "",
            "last_contact_date": "yesterday", "contact_history": []}]}"#,
        )
        .unwrap();

        let (db, recovery) = Database::open_or_recover(&path, LoadPolicy::Strict).unwrap();
        assert!(db.contacts().is_empty());
        assert!(recovery.unwrap().backup.is_some());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let mut db = Database::open_at(&path, LoadPolicy::Lenient).unwrap();
        db.add_group("Family", "7", "1").unwrap();
        db.save().unwrap();
        let before = fs::read(&path).unwrap();

        // A directory where the temp file goes makes the write fail
        fs::create_dir(dir.path().join("contacts.json.tmp")).unwrap();
        db.add_group("Work", "30", "5").unwrap();
        let err = db.save().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(db.is_dirty());
    }

    #[test]
    fn test_memory_database_cannot_save() {
        let mut db = Database::open_memory();
        assert_eq!(db.save().unwrap_err().kind(), ErrorKind::Precondition);
    }
}
