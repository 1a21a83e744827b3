//! Persistence of the dataset
//!
//! A store holds exactly one serialized `Dataset`. Stores report failures;
//! deciding to fall back to defaults or keep going without durability is the
//! session controller's job.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::Dataset;

/// File name used for the dataset inside the data directory
pub const DATA_FILE_NAME: &str = "cuttracker_data.json";

/// Durable home of the dataset
pub trait DataStore {
    /// Read the stored dataset; `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Dataset>, StoreError>;

    /// Replace the stored dataset
    fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError>;

    /// Remove the stored dataset
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Dataset stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default location under the platform's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cuttracker")
            .join(DATA_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DataStore for JsonFileStore {
    fn load(&self) -> Result<Option<Dataset>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let dataset = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(dataset))
    }

    fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json =
            serde_json::to_string(dataset).map_err(|e| StoreError::Serialize(e.to_string()))?;

        // Write beside the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Dataset saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory store holding the serialized payload
///
/// Keeps the JSON text rather than the value so loads go through the same
/// decoding path as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    payload: Option<String>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a raw payload, valid or not
    pub fn with_payload(payload: impl Into<String>) -> Self {
        MemoryStore {
            payload: Some(payload.into()),
            save_count: 0,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl DataStore for MemoryStore {
    fn load(&self) -> Result<Option<Dataset>, StoreError> {
        match &self.payload {
            None => Ok(None),
            Some(payload) => serde_json::from_str(payload)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    path: PathBuf::from("<memory>"),
                    reason: e.to_string(),
                }),
        }
    }

    fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(dataset).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.payload = Some(json);
        self.save_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.payload = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample() -> Dataset {
        let mut data = Dataset::default();
        data.upsert_weight(NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(), 59.8);
        data.upsert_steps(NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(), 13_200);
        data
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join(DATA_FILE_NAME));

        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_reports_corrupt_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_memory_store_merges_missing_fields() {
        let store = MemoryStore::with_payload(r#"{"steps": {"2026-02-19": 9000}}"#);
        let data = store.load().unwrap().unwrap();

        assert_eq!(data.steps.len(), 1);
        assert!(data.weights.is_empty());
        assert!(data.workouts.is_empty());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        store.save(&sample()).unwrap();
        store.save(&sample()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert!(store.payload().unwrap().contains("2026-02-19"));

        store.clear().unwrap();
        assert!(store.payload().is_none());
    }

    mod properties {
        use super::*;
        use crate::models::{ExerciseLog, SetLog, SleepEntry, WorkoutSession};
        use proptest::prelude::*;

        fn day(offset: u64) -> NaiveDate {
            crate::dates::days_after(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), offset)
        }

        proptest! {
            #[test]
            fn test_floats_survive_save_and_load(
                weights in prop::collection::vec(0.01f64..400.0, 1..20),
                hours in prop::collection::vec(0.0f64..24.0, 1..20),
                set_weights in prop::collection::vec(0.0f64..500.0, 1..10),
            ) {
                let mut data = Dataset::default();
                for (i, kg) in weights.iter().enumerate() {
                    data.upsert_weight(day(i as u64), *kg);
                }
                for (i, h) in hours.iter().enumerate() {
                    data.upsert_sleep(day(i as u64), SleepEntry { hours: *h, energy: 3 });
                }
                data.append_workout(WorkoutSession {
                    date: day(0),
                    name: "C – Legs".to_string(),
                    exercises: vec![ExerciseLog {
                        name: "Squat".to_string(),
                        sets: set_weights.iter().map(|w| SetLog::new(*w, 5)).collect(),
                    }],
                });

                let mut store = MemoryStore::new();
                store.save(&data).unwrap();
                prop_assert_eq!(store.load().unwrap(), Some(data));
            }
        }
    }
}
