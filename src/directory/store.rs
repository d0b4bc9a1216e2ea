//! The in-memory student table.

use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

use super::model::{StudentRecord, StudentUpdate};

/// Domain errors produced by directory operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("student {0} already exists")]
    AlreadyExists(u32),

    #[error("student {0} does not exist")]
    NotFound(u32),
}

/// The in-memory student table, keyed by student id.
///
/// Wraps a `BTreeMap` behind an `RwLock` so the table can be shared across
/// connection tasks via `Arc`. The ordered map makes iteration order — and
/// therefore the name lookup's first-match tie-break — deterministic:
/// ascending student id.
///
/// Contents live for the lifetime of the process; there is no durability.
///
/// # Examples
///
/// ```
/// use rosterd::directory::StudentDirectory;
///
/// let directory = StudentDirectory::seeded();
/// let john = directory.get(1).unwrap();
/// assert_eq!(john.name, "john");
/// ```
#[derive(Debug, Default)]
pub struct StudentDirectory {
    table: RwLock<BTreeMap<u32, StudentRecord>>,
}

impl StudentDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the startup seed record:
    /// id 1 → john, 17, senior.
    pub fn seeded() -> Self {
        Self::with_records([(
            1,
            StudentRecord {
                name: "john".to_owned(),
                age: 17,
                year: "senior".to_owned(),
            },
        )])
    }

    /// Creates a directory pre-populated with the given records.
    pub fn with_records(records: impl IntoIterator<Item = (u32, StudentRecord)>) -> Self {
        Self {
            table: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Returns the record stored under `id`, if any.
    pub fn get(&self, id: u32) -> Option<StudentRecord> {
        self.read().get(&id).cloned()
    }

    /// Returns the first record whose name equals `name` exactly
    /// (case-sensitive), scanning in ascending id order.
    pub fn find_by_name(&self, name: &str) -> Option<StudentRecord> {
        self.read()
            .values()
            .find(|record| record.name == name)
            .cloned()
    }

    /// Inserts `record` under `id` and returns the stored copy.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::AlreadyExists`] if `id` is taken; the existing
    /// record is left untouched.
    pub fn create(&self, id: u32, record: StudentRecord) -> Result<StudentRecord, DirectoryError> {
        let mut table = self.write();
        if table.contains_key(&id) {
            return Err(DirectoryError::AlreadyExists(id));
        }
        table.insert(id, record.clone());
        Ok(record)
    }

    /// Applies `update` to the record under `id` and returns the result.
    ///
    /// Only fields present in the update are overwritten.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::NotFound`] if `id` is absent.
    pub fn update(&self, id: u32, update: StudentUpdate) -> Result<StudentRecord, DirectoryError> {
        let mut table = self.write();
        let record = table.get_mut(&id).ok_or(DirectoryError::NotFound(id))?;
        update.apply(record);
        Ok(record.clone())
    }

    /// Removes the record under `id`.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::NotFound`] if `id` is absent. Repeating a remove
    /// yields the same error every time.
    pub fn remove(&self, id: u32) -> Result<(), DirectoryError> {
        match self.write().remove(&id) {
            Some(_) => Ok(()),
            None => Err(DirectoryError::NotFound(id)),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<u32, StudentRecord>> {
        self.table.read().expect("student table lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<u32, StudentRecord>> {
        self.table.write().expect("student table lock poisoned")
    }
}
