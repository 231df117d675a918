//! Persistence gateway for routines and weight logs.
//!
//! Every call is scoped by the owning [`UserId`]: rows that belong to
//! someone else behave exactly like rows that do not exist.
//!
//! `FileRoutineStore` keeps all rows in one JSON document. Writers take an
//! exclusive lock on a sidecar lock file for the whole load-modify-save
//! cycle and replace the document atomically through a temp file.

use crate::types::{NewRoutine, NewWeightLog, Routine, UserId, WeightLog};
use crate::{Error, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// CRUD over a user's routines
pub trait RoutineStore {
    fn create(&mut self, owner: &UserId, routine: NewRoutine) -> Result<Routine>;
    fn get(&self, owner: &UserId, id: Uuid) -> Result<Option<Routine>>;
    /// Routines in creation order
    fn list(&self, owner: &UserId) -> Result<Vec<Routine>>;
    /// Full rewrite of name, description and exercises; id and creation time are kept
    fn update(&mut self, owner: &UserId, id: Uuid, routine: NewRoutine) -> Result<Routine>;
    /// Returns false when there was nothing to delete
    fn delete(&mut self, owner: &UserId, id: Uuid) -> Result<bool>;
}

/// Append-only body-weight history
pub trait WeightLogStore {
    fn append(&mut self, owner: &UserId, log: NewWeightLog) -> Result<WeightLog>;
    /// Newest date first
    fn list(&self, owner: &UserId) -> Result<Vec<WeightLog>>;
}

/// One stored routine plus its ownership key
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RoutineRow {
    user_id: UserId,
    #[serde(flatten)]
    routine: Routine,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RoutineTable {
    #[serde(default)]
    routines: Vec<RoutineRow>,
}

impl RoutineTable {
    fn owned_by<'a>(&'a self, owner: &'a UserId) -> impl Iterator<Item = &'a Routine> + 'a {
        self.routines
            .iter()
            .filter(move |row| &row.user_id == owner)
            .map(|row| &row.routine)
    }

    fn position(&self, owner: &UserId, id: Uuid) -> Option<usize> {
        self.routines
            .iter()
            .position(|row| &row.user_id == owner && row.routine.id == id)
    }
}

/// JSON-document routine store with file locking
pub struct FileRoutineStore {
    path: PathBuf,
}

impl FileRoutineStore {
    /// Create a store backed by the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Read the table under a shared lock.
    ///
    /// A missing file is an empty table. `Ok(None)` means the file exists
    /// but could not be parsed.
    fn read_table(&self) -> Result<Option<RoutineTable>> {
        if !self.path.exists() {
            return Ok(Some(RoutineTable::default()));
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Some(RoutineTable::default()));
        }

        match serde_json::from_str::<RoutineTable>(&contents) {
            Ok(table) => {
                tracing::debug!(
                    "Loaded {} routine rows from {:?}",
                    table.routines.len(),
                    self.path
                );
                Ok(Some(table))
            }
            Err(e) => {
                tracing::warn!("Failed to parse routine store {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Table for read-only queries; a corrupt file reads as empty
    fn load_lenient(&self) -> Result<RoutineTable> {
        Ok(self.read_table()?.unwrap_or_default())
    }

    /// Run a load-modify-save cycle under the writer lock
    fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut RoutineTable) -> Result<T>,
    {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", self.path)))?;
        std::fs::create_dir_all(parent)?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.modify_locked(parent, f);

        lock.unlock()?;
        result
    }

    fn modify_locked<T, F>(&self, parent: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut RoutineTable) -> Result<T>,
    {
        let mut table = self.read_table()?.ok_or_else(|| {
            Error::Store(format!(
                "Refusing to overwrite unreadable routine store {:?}",
                self.path
            ))
        })?;

        let value = f(&mut table)?;

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&table)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            "Saved {} routine rows to {:?}",
            table.routines.len(),
            self.path
        );
        Ok(value)
    }
}

impl RoutineStore for FileRoutineStore {
    fn create(&mut self, owner: &UserId, routine: NewRoutine) -> Result<Routine> {
        let routine = Routine {
            id: Uuid::new_v4(),
            name: routine.name,
            description: routine.description,
            exercises: routine.exercises,
            created_at: Utc::now(),
        };

        let created = routine.clone();
        self.modify(move |table| {
            table.routines.push(RoutineRow {
                user_id: owner.clone(),
                routine,
            });
            Ok(())
        })?;

        tracing::info!("Created routine {} for {}", created.id, owner);
        Ok(created)
    }

    fn get(&self, owner: &UserId, id: Uuid) -> Result<Option<Routine>> {
        let table = self.load_lenient()?;
        let found = table.owned_by(owner).find(|r| r.id == id).cloned();
        Ok(found)
    }

    fn list(&self, owner: &UserId) -> Result<Vec<Routine>> {
        let table = self.load_lenient()?;
        let routines = table.owned_by(owner).cloned().collect();
        Ok(routines)
    }

    fn update(&mut self, owner: &UserId, id: Uuid, routine: NewRoutine) -> Result<Routine> {
        let updated = self.modify(|table| {
            let index = table
                .position(owner, id)
                .ok_or_else(|| Error::NotFound(format!("routine {}", id)))?;
            let row = &mut table.routines[index].routine;
            row.name = routine.name;
            row.description = routine.description;
            row.exercises = routine.exercises;
            Ok(row.clone())
        })?;

        tracing::info!("Updated routine {} for {}", id, owner);
        Ok(updated)
    }

    fn delete(&mut self, owner: &UserId, id: Uuid) -> Result<bool> {
        // Deleting from a missing file should not create one.
        if !self.path.exists() {
            return Ok(false);
        }

        let removed = self.modify(|table| {
            Ok(match table.position(owner, id) {
                Some(index) => {
                    table.routines.remove(index);
                    true
                }
                None => false,
            })
        })?;

        if removed {
            tracing::info!("Deleted routine {} for {}", id, owner);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Exercise, Weekday};

    fn owner(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    fn payload(name: &str) -> NewRoutine {
        NewRoutine {
            name: name.into(),
            description: "Básicos".into(),
            exercises: vec![Exercise::new("Press banca", Weekday::Lunes, 4, 10, 60.0)],
        }
    }

    fn store() -> (tempfile::TempDir, FileRoutineStore) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileRoutineStore::new(temp_dir.path().join("routines.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_create_and_get() {
        crate::logging::init_test();
        let (_dir, mut store) = store();
        let ana = owner("ana");

        let created = store.create(&ana, payload("Fuerza")).unwrap();
        let fetched = store.get(&ana, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.exercises.len(), 1);
    }

    #[test]
    fn test_list_keeps_creation_order() {
        let (_dir, mut store) = store();
        let ana = owner("ana");

        store.create(&ana, payload("A")).unwrap();
        store.create(&ana, payload("B")).unwrap();
        store.create(&ana, payload("C")).unwrap();

        let names: Vec<_> = store
            .list(&ana)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rows_are_scoped_by_owner() {
        let (_dir, mut store) = store();
        let ana = owner("ana");
        let bruno = owner("bruno");

        let routine = store.create(&ana, payload("Fuerza")).unwrap();
        store.create(&bruno, payload("Cardio")).unwrap();

        assert_eq!(store.list(&ana).unwrap().len(), 1);
        assert!(store.get(&bruno, routine.id).unwrap().is_none());
        assert!(matches!(
            store.update(&bruno, routine.id, payload("Robada")),
            Err(Error::NotFound(_))
        ));
        assert!(!store.delete(&bruno, routine.id).unwrap());
        assert!(store.get(&ana, routine.id).unwrap().is_some());
    }

    #[test]
    fn test_update_preserves_id_and_created_at() {
        let (_dir, mut store) = store();
        let ana = owner("ana");
        let created = store.create(&ana, payload("Fuerza")).unwrap();

        let mut changed = payload("Fuerza 2");
        changed.description = "Nueva".into();
        changed
            .exercises
            .push(Exercise::new("Sentadilla", Weekday::Martes, 5, 5, 100.0));

        let updated = store.update(&ana, created.id, changed).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Fuerza 2");
        assert_eq!(updated.exercises.len(), 2);

        let fetched = store.get(&ana, created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_delete() {
        let (_dir, mut store) = store();
        let ana = owner("ana");
        let routine = store.create(&ana, payload("Fuerza")).unwrap();

        assert!(store.delete(&ana, routine.id).unwrap());
        assert!(store.get(&ana, routine.id).unwrap().is_none());
        assert!(!store.delete(&ana, routine.id).unwrap());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, mut store) = store();
        let ana = owner("ana");
        assert!(store.list(&ana).unwrap().is_empty());
        assert!(!store.delete(&ana, Uuid::new_v4()).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_reads_empty_but_refuses_writes() {
        let (_dir, mut store) = store();
        let ana = owner("ana");
        std::fs::write(store.path(), "{ invalid json }").unwrap();

        assert!(store.list(&ana).unwrap().is_empty());
        assert!(matches!(
            store.create(&ana, payload("Fuerza")),
            Err(Error::Store(_))
        ));
        // Original bytes are left in place for manual recovery
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "{ invalid json }");
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let (dir, mut store) = store();
        store.create(&owner("ana"), payload("Fuerza")).unwrap();

        let extras: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "routines.json" && name != "routines.json.lock")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }
}
