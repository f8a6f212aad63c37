//! Typed slots
//!
//! `AppStorage` maps records to fixed keys of a `KeyValueStore`. Reads report
//! `Missing`, `Loaded` or `Corrupt` explicitly; the `load_*` helpers fold the
//! last two failure cases into an empty default and log the corruption.
//!
//! The checklist spans three bucket slots. Each bucket is settled on its own,
//! and writes only touch the buckets that changed, so one corrupt bucket never
//! costs its siblings their data.

use std::collections::HashSet;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StoreResult};
use crate::codec::{from_slot_text, to_slot_text, DecodeError};
use crate::domain::{ApartmentProfile, BuildingCompany, Bucket, Checklist, Defect, Task, Trackable};

/// Fixed slot names
pub mod keys {
    pub const USER_DATA: &str = "user_data";
    pub const CHECKLIST_FIRST_WEEK: &str = "checklist_first_week";
    pub const CHECKLIST_FIRST_MONTH: &str = "checklist_first_month";
    pub const CHECKLIST_FIRST_YEAR: &str = "checklist_first_year";
    /// Combined checklist record written by older builds
    pub const CHECKLIST_LEGACY: &str = "checklist_data";
    pub const DEFECTS: &str = "defects";
    pub const BUILDING_COMPANIES: &str = "building_companies";
}

fn bucket_key(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::FirstWeek => keys::CHECKLIST_FIRST_WEEK,
        Bucket::FirstMonth => keys::CHECKLIST_FIRST_MONTH,
        Bucket::FirstYear => keys::CHECKLIST_FIRST_YEAR,
    }
}

/// Result of reading one slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotRead<T> {
    /// Nothing stored yet
    Missing,
    Loaded(T),
    /// Stored text exists but does not decode
    Corrupt(DecodeError),
}

impl<T> SlotRead<T> {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, SlotRead::Corrupt(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SlotRead<U> {
        match self {
            SlotRead::Missing => SlotRead::Missing,
            SlotRead::Loaded(value) => SlotRead::Loaded(f(value)),
            SlotRead::Corrupt(err) => SlotRead::Corrupt(err),
        }
    }

    /// Drop the distinction between missing and corrupt
    pub fn ok(self) -> Option<T> {
        match self {
            SlotRead::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Typed access to the app's slots
pub struct AppStorage {
    kv: Box<dyn KeyValueStore>,
}

impl AppStorage {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn raw(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    fn write_slot<T: Serialize + ?Sized>(&self, key: &str, record: &T) -> StoreResult<()> {
        let text = to_slot_text(record)?;
        self.kv.put(key, &text)?;
        debug!("Saved slot {} ({} bytes)", key, text.len());
        Ok(())
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> StoreResult<SlotRead<T>> {
        let Some(text) = self.kv.get(key)? else {
            return Ok(SlotRead::Missing);
        };
        Ok(match from_slot_text(&text) {
            Ok(record) => SlotRead::Loaded(record),
            Err(err) => SlotRead::Corrupt(err),
        })
    }

    /// Fold a read into an optional value, logging what went wrong
    fn settle<T>(key: &str, read: StoreResult<SlotRead<T>>) -> Option<T> {
        match read {
            Ok(SlotRead::Loaded(value)) => Some(value),
            Ok(SlotRead::Missing) => None,
            Ok(SlotRead::Corrupt(err)) => {
                warn!("Discarding corrupt slot {}: {}", key, err);
                None
            }
            Err(err) => {
                warn!("Failed to read slot {}: {}", key, err);
                None
            }
        }
    }

    // Profile

    pub fn save_profile(&self, profile: &ApartmentProfile) -> StoreResult<()> {
        self.write_slot(keys::USER_DATA, profile)
    }

    pub fn read_profile(&self) -> StoreResult<SlotRead<ApartmentProfile>> {
        self.read_slot(keys::USER_DATA)
    }

    pub fn load_profile(&self) -> Option<ApartmentProfile> {
        Self::settle(keys::USER_DATA, self.read_profile())
    }

    // Checklist

    pub fn save_bucket(&self, bucket: Bucket, tasks: &[Task]) -> StoreResult<()> {
        self.write_slot(bucket_key(bucket), tasks)
    }

    pub fn read_bucket(&self, bucket: Bucket) -> StoreResult<SlotRead<Vec<Task>>> {
        self.read_slot(bucket_key(bucket))
    }

    /// Write all three buckets; retires the legacy combined slot
    pub fn save_checklist(&self, checklist: &Checklist) -> StoreResult<()> {
        for bucket in Bucket::ALL {
            self.save_bucket(bucket, checklist.bucket(bucket))?;
        }
        self.kv.remove(keys::CHECKLIST_LEGACY)?;
        Ok(())
    }

    /// Read the bucket slots, falling back to the legacy combined slot
    ///
    /// A bucket that is missing while another is present reads as empty; any
    /// corrupt bucket makes the whole read corrupt.
    pub fn read_checklist(&self) -> StoreResult<SlotRead<Checklist>> {
        let mut checklist = Checklist::default();
        let mut found = false;

        for bucket in Bucket::ALL {
            match self.read_bucket(bucket)? {
                SlotRead::Loaded(tasks) => {
                    *checklist.bucket_mut(bucket) = tasks;
                    found = true;
                }
                SlotRead::Missing => {}
                SlotRead::Corrupt(err) => return Ok(SlotRead::Corrupt(err)),
            }
        }

        if found {
            return Ok(SlotRead::Loaded(checklist));
        }
        self.read_slot(keys::CHECKLIST_LEGACY)
    }

    fn has_bucket_slots(&self) -> StoreResult<bool> {
        for bucket in Bucket::ALL {
            if self.kv.contains(bucket_key(bucket))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Buckets settled one at a time; `None` when nothing is stored at all
    fn collect_checklist(&self) -> StoreResult<Option<Checklist>> {
        let mut checklist = Checklist::default();
        let mut found = false;

        for bucket in Bucket::ALL {
            match self.read_bucket(bucket)? {
                SlotRead::Loaded(tasks) => {
                    *checklist.bucket_mut(bucket) = tasks;
                    found = true;
                }
                SlotRead::Missing => {}
                SlotRead::Corrupt(err) => {
                    warn!("Discarding corrupt slot {}: {}", bucket_key(bucket), err);
                    found = true;
                }
            }
        }

        if found {
            return Ok(Some(checklist));
        }
        Ok(Self::settle(
            keys::CHECKLIST_LEGACY,
            Ok(self.read_slot(keys::CHECKLIST_LEGACY)?),
        ))
    }

    /// Checklist for display; a corrupt bucket shows as empty
    pub fn load_checklist(&self) -> Option<Checklist> {
        match self.collect_checklist() {
            Ok(checklist) => checklist,
            Err(err) => {
                warn!("Failed to read checklist: {}", err);
                None
            }
        }
    }

    /// Checklist to change and hand back to `save_checklist_changes`
    ///
    /// Unlike `load_checklist`, a failing store is an error here.
    pub fn checklist_for_update(&self) -> StoreResult<Checklist> {
        Ok(self.collect_checklist()?.unwrap_or_default())
    }

    /// Write the buckets of `after` that differ from `before`
    ///
    /// With no bucket slot stored yet, all three are written, which also
    /// retires the legacy combined slot.
    pub fn save_checklist_changes(&self, before: &Checklist, after: &Checklist) -> StoreResult<()> {
        if !self.has_bucket_slots()? {
            return self.save_checklist(after);
        }
        for bucket in Bucket::ALL {
            if before.bucket(bucket) != after.bucket(bucket) {
                self.save_bucket(bucket, after.bucket(bucket))?;
            }
        }
        Ok(())
    }

    // Defects

    pub fn save_defects(&self, defects: &[Defect]) -> StoreResult<()> {
        self.write_slot(keys::DEFECTS, defects)
    }

    pub fn read_defects(&self) -> StoreResult<SlotRead<Vec<Defect>>> {
        self.read_slot(keys::DEFECTS)
    }

    pub fn load_defects(&self) -> Vec<Defect> {
        Self::settle(keys::DEFECTS, self.read_defects()).unwrap_or_default()
    }

    // Building companies

    pub fn save_companies(&self, companies: &[BuildingCompany]) -> StoreResult<()> {
        self.write_slot(keys::BUILDING_COMPANIES, companies)
    }

    pub fn read_companies(&self) -> StoreResult<SlotRead<Vec<BuildingCompany>>> {
        self.read_slot(keys::BUILDING_COMPANIES)
    }

    pub fn load_companies(&self) -> Vec<BuildingCompany> {
        Self::settle(keys::BUILDING_COMPANIES, self.read_companies()).unwrap_or_default()
    }

    /// Every file path still referenced by a stored task or defect
    ///
    /// `None` when a checklist or defect slot cannot be read or decoded: the
    /// records in it may reference files too.
    pub fn referenced_files(&self) -> Option<HashSet<String>> {
        let mut files = HashSet::new();

        match self.read_checklist() {
            Ok(SlotRead::Loaded(checklist)) => {
                for task in checklist.tasks() {
                    files.extend(task.owned_files().into_iter().map(str::to_string));
                }
            }
            Ok(SlotRead::Missing) => {}
            Ok(SlotRead::Corrupt(err)) => {
                warn!("Checklist slots unreadable, file references unknown: {}", err);
                return None;
            }
            Err(err) => {
                warn!("Failed to read checklist: {}", err);
                return None;
            }
        }

        match self.read_defects() {
            Ok(SlotRead::Loaded(defects)) => {
                for defect in &defects {
                    files.extend(defect.owned_files().into_iter().map(str::to_string));
                }
            }
            Ok(SlotRead::Missing) => {}
            Ok(SlotRead::Corrupt(err)) => {
                warn!("Defect slot unreadable, file references unknown: {}", err);
                return None;
            }
            Err(err) => {
                warn!("Failed to read slot {}: {}", keys::DEFECTS, err);
                return None;
            }
        }

        Some(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefectCategory, Priority, Status};
    use crate::store::{JsonFileStore, MemoryStore};
    use chrono::NaiveDate;

    fn memory_storage() -> AppStorage {
        AppStorage::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_missing_slots() {
        let storage = memory_storage();
        assert_eq!(storage.read_profile().unwrap(), SlotRead::Missing);
        assert!(storage.load_profile().is_none());
        assert!(storage.load_checklist().is_none());
        assert!(storage.load_defects().is_empty());
    }

    #[test]
    fn test_bucket_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = Task::new("Register for recycling", "City services", "Services");
        first.due_date = Some("02/01/2025".to_string());
        let mut second = Task::new("Meet neighbors", "", "Community");
        second.set_status(Status::Closed);
        second.add_sub_task("Bake cookies");

        {
            let storage = AppStorage::new(Box::new(JsonFileStore::open(dir.path()).unwrap()));
            storage
                .save_bucket(Bucket::FirstMonth, &[first.clone(), second.clone()])
                .unwrap();
        }

        let storage = AppStorage::new(Box::new(JsonFileStore::open(dir.path()).unwrap()));
        let checklist = storage.load_checklist().unwrap();
        assert_eq!(checklist.first_month, vec![first, second]);
        assert!(checklist.first_week.is_empty());
        assert!(checklist.first_year.is_empty());
    }

    #[test]
    fn test_missing_array_reads_as_corrupt_and_loads_default() {
        let storage = memory_storage();
        let defect = Defect::new(
            "Kitchen",
            DefectCategory::Installations,
            Priority::Low,
            "Cabinet door misaligned",
            NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
        );
        let mut tree = crate::codec::encode(&vec![defect]).unwrap();
        tree[0].as_object_mut().unwrap().remove("subTasks");
        storage.raw().put(keys::DEFECTS, &tree.to_string()).unwrap();

        match storage.read_defects().unwrap() {
            SlotRead::Corrupt(DecodeError::FieldMissing { field }) => assert_eq!(field, "subTasks"),
            other => panic!("unexpected read: {:?}", other),
        }
        assert!(storage.load_defects().is_empty());
    }

    #[test]
    fn test_legacy_combined_checklist() {
        let storage = memory_storage();
        let checklist = Checklist {
            first_week: vec![Task::seeded("week_1", "Change all locks", "", "Security")],
            first_month: Vec::new(),
            first_year: vec![Task::seeded("year_1", "Review lease renewal", "", "Administrative")],
        };
        let legacy = crate::codec::encode(&checklist).unwrap();
        storage.raw().put(keys::CHECKLIST_LEGACY, &legacy.to_string()).unwrap();

        assert_eq!(storage.load_checklist().unwrap(), checklist);

        storage.save_checklist(&checklist).unwrap();
        assert!(!storage.raw().contains(keys::CHECKLIST_LEGACY).unwrap());
        assert_eq!(storage.load_checklist().unwrap(), checklist);
    }

    #[test]
    fn test_referenced_files() {
        let storage = memory_storage();
        let mut defect = Defect::new(
            "Bathroom",
            DefectCategory::Plumbing,
            Priority::High,
            "Leak",
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        );
        defect.images.push("/files/a.jpg".to_string());
        storage.save_defects(&[defect]).unwrap();

        let files = storage.referenced_files().unwrap();
        assert!(files.contains("/files/a.jpg"));
        assert_eq!(files.len(), 1);
    }

    const NEWER_SCHEMA: &str = r#"{"schemaVersion":2,"payload":[]}"#;

    fn month_tasks() -> Vec<Task> {
        vec![
            Task::seeded("month_1", "Deep clean carpets", "", "Maintenance"),
            Task::seeded("month_2", "Update address", "", "Administrative"),
        ]
    }

    #[test]
    fn test_corrupt_bucket_loads_empty_alone() {
        let storage = memory_storage();
        storage.save_bucket(Bucket::FirstMonth, &month_tasks()).unwrap();
        storage.raw().put(keys::CHECKLIST_FIRST_YEAR, NEWER_SCHEMA).unwrap();

        assert!(storage.read_checklist().unwrap().is_corrupt());

        let checklist = storage.load_checklist().unwrap();
        assert_eq!(checklist.first_month, month_tasks());
        assert!(checklist.first_year.is_empty());
    }

    #[test]
    fn test_save_changes_skips_untouched_buckets() {
        let storage = memory_storage();
        storage.save_bucket(Bucket::FirstMonth, &month_tasks()).unwrap();
        storage.raw().put(keys::CHECKLIST_FIRST_YEAR, NEWER_SCHEMA).unwrap();

        let before = storage.checklist_for_update().unwrap();
        let mut after = before.clone();
        after.push(Bucket::FirstWeek, Task::seeded("week_1", "Change all locks", "", "Security"));
        storage.save_checklist_changes(&before, &after).unwrap();

        assert_eq!(
            storage.raw().get(keys::CHECKLIST_FIRST_YEAR).unwrap().as_deref(),
            Some(NEWER_SCHEMA)
        );
        let checklist = storage.load_checklist().unwrap();
        assert_eq!(checklist.first_week.len(), 1);
        assert_eq!(checklist.first_month, month_tasks());
    }

    #[test]
    fn test_save_changes_retires_legacy_slot() {
        let storage = memory_storage();
        let legacy = Checklist {
            first_week: Vec::new(),
            first_month: month_tasks(),
            first_year: Vec::new(),
        };
        let text = crate::codec::encode(&legacy).unwrap().to_string();
        storage.raw().put(keys::CHECKLIST_LEGACY, &text).unwrap();

        let before = storage.checklist_for_update().unwrap();
        let mut after = before.clone();
        after.push(Bucket::FirstWeek, Task::seeded("week_1", "Change all locks", "", "Security"));
        storage.save_checklist_changes(&before, &after).unwrap();

        assert!(!storage.raw().contains(keys::CHECKLIST_LEGACY).unwrap());
        assert_eq!(storage.load_checklist().unwrap(), after);
    }

    #[test]
    fn test_referenced_files_unknown_while_a_slot_is_corrupt() {
        let storage = memory_storage();
        storage.save_defects(&[]).unwrap();
        storage.raw().put(keys::CHECKLIST_FIRST_MONTH, "not json").unwrap();
        assert!(storage.referenced_files().is_none());

        storage.raw().remove(keys::CHECKLIST_FIRST_MONTH).unwrap();
        assert_eq!(storage.referenced_files(), Some(HashSet::new()));

        storage.raw().put(keys::DEFECTS, NEWER_SCHEMA).unwrap();
        assert!(storage.referenced_files().is_none());
    }
}
