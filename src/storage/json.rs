use std::{
    fs::{self, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::{
    models::store::Store,
    storage::{
        LoadOutcome, Storage, StorageError,
        migrations::{LegacyStore, legacy_to_current},
    },
};

/// Current on-disk record. Notes are a list per project.
pub const CURRENT_FILE: &str = "hobby_hop_data_v2.json";
/// Original on-disk record. One free-form notes string per project. Read
/// only when the current record is absent; never written.
pub const LEGACY_FILE: &str = "hobby_hop_data_v1.json";

pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    fn legacy_path(&self) -> PathBuf {
        self.dir.join(LEGACY_FILE)
    }

    fn load_legacy(&self) -> Result<LoadOutcome, StorageError> {
        let path = self.legacy_path();
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<LegacyStore>(&content) {
                Ok(legacy) => Ok(LoadOutcome {
                    store: legacy_to_current(legacy),
                    migrated: true,
                }),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse legacy record '{}': {} (starting with empty collections)",
                        path.display(),
                        e
                    );
                    Ok(LoadOutcome {
                        store: Store::default(),
                        migrated: false,
                    })
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LoadOutcome {
                store: Store::default(),
                migrated: false,
            }),
            Err(e) => Err(StorageError::LoadFailed { path, source: e }),
        }
    }

    fn create_backup_dir(&self) -> Result<(), StorageError> {
        let backups_dir = self.get_backup_dir();
        fs::create_dir(&backups_dir).map_err(|e| StorageError::BackupFailed {
            path: backups_dir,
            source: e,
        })?;
        Ok(())
    }

    fn create_backup(&self) -> Result<u64, StorageError> {
        let current_path = self.current_path();
        let file_exists = fs::exists(&current_path).map_err(|e| StorageError::BackupFailed {
            path: current_path.clone(),
            source: e,
        })?;
        if !file_exists {
            return Ok(0);
        }

        let backup_path = self.get_backup_path();
        let copy_result = fs::copy(&current_path, &backup_path);
        match copy_result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.create_backup_dir()?;
                self.create_backup()
            }
            Err(e) => Err(StorageError::BackupFailed {
                path: backup_path,
                source: e,
            }),
            Ok(bytes) => Ok(bytes),
        }
    }

    fn cleanup_old_backups(&self) -> Result<(), StorageError> {
        let backup_dir = self.get_backup_dir();
        let backup_dir_exists =
            fs::exists(&backup_dir).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        if !backup_dir_exists {
            return Ok(());
        }

        let mut file_entries = fs::read_dir(&backup_dir)
            .map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?
            .flatten()
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect::<Vec<_>>();

        file_entries.sort();

        let number_of_files_to_delete = match file_entries.len() {
            x if x > 5 => x - 5,
            _ => 0,
        };

        if number_of_files_to_delete == 0 {
            return Ok(());
        }

        for file_path in &file_entries[0..number_of_files_to_delete] {
            fs::remove_file(file_path).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    fn get_backup_dir(&self) -> PathBuf {
        self.dir.join("backups")
    }

    fn get_backup_path(&self) -> PathBuf {
        let backups_dir = self.get_backup_dir();

        let timestamp = jiff::Timestamp::now().to_string();
        let filename = format!("{}-{}", CURRENT_FILE, timestamp);

        backups_dir.join(filename)
    }
}

impl Storage for JsonFileStorage {
    /// Reads the current record, falling back to the legacy record and then
    /// to an empty store. Never writes: a migrated or recovered store only
    /// reaches disk when the caller saves it.
    fn load(&self) -> Result<LoadOutcome, StorageError> {
        let path = self.current_path();
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Store>(&content) {
                Ok(store) => Ok(LoadOutcome {
                    store,
                    migrated: false,
                }),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse '{}': {} (starting with empty collections)",
                        path.display(),
                        e
                    );
                    Ok(LoadOutcome {
                        store: Store::default(),
                        migrated: false,
                    })
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.load_legacy(),
            Err(e) => Err(StorageError::LoadFailed { path, source: e }),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json =
            to_string_pretty(store).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let current_path = self.current_path();
        let unique_temp = format!("{}.tmp.{}", current_path.display(), Uuid::new_v4());
        let temp_path = PathBuf::from(&unique_temp);
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        let lock_file_path = current_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;

        self.create_backup()?;
        self.cleanup_old_backups()?;

        rename(&temp_path, &current_path).map_err(|e| StorageError::SaveFailed {
            path: current_path.clone(),
            source: e,
        })?;

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: current_path,
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use serde_json::Value;
    use uuid::Uuid;

    use crate::models::{
        material::Material,
        project::{Project, ProjectStatus},
        store::Store,
    };
    use crate::storage::migrations::MIGRATED_GOAL_PLACEHOLDER;

    fn sample_store() -> Store {
        let project = Project {
            title: String::from("Birdhouse"),
            category: String::from("Woodworking"),
            status: ProjectStatus::InProgress,
            progress: 40,
            end_goal: String::from("Finish before spring"),
            ..Project::default()
        };
        let material = Material {
            project_id: project.id,
            name: String::from("Cedar plank"),
            price: 12.5,
            ..Material::default()
        };
        Store {
            projects: Vec::from([project]),
            materials: Vec::from([material]),
            has_seen_tutorial: true,
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let store = sample_store();

        storage.save(&store).unwrap();
        let outcome = storage.load().unwrap();

        assert!(!outcome.migrated);
        assert_eq!(outcome.store.projects[0].id, store.projects[0].id);
        assert_eq!(outcome.store.projects[0].progress, 40);
        assert_eq!(outcome.store.materials[0].id, store.materials[0].id);
        assert_eq!(outcome.store.materials[0].price, 12.5);
        assert!(outcome.store.has_seen_tutorial);
    }

    #[test]
    fn missing_files_load_an_empty_store_without_creating_any() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        let outcome = storage.load().unwrap();

        assert!(!outcome.migrated);
        assert!(outcome.store.projects.is_empty());
        assert!(outcome.store.materials.is_empty());
        assert!(!outcome.store.has_seen_tutorial);
        assert!(!storage.current_path().exists());
        assert!(!storage.legacy_path().exists());
    }

    #[test]
    fn corrupt_current_record_loads_defaults_and_is_left_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        fs::write(storage.current_path(), "{ this is not valid json }").unwrap();

        let outcome = storage.load().unwrap();

        assert!(!outcome.migrated);
        assert!(outcome.store.projects.is_empty());
        let on_disk = fs::read_to_string(storage.current_path()).unwrap();
        assert_eq!(on_disk, "{ this is not valid json }");
    }

    #[test]
    fn legacy_record_is_migrated_on_load_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let legacy_json = r#"{
            "projects": [{
                "id": "7f9c40f4-4d4e-4a0f-9a5a-111111111111",
                "title": "Sourdough starter",
                "notes": "Feed twice daily",
                "createdAt": 1700000000000
            }],
            "materials": []
        }"#;
        fs::write(storage.legacy_path(), legacy_json).unwrap();

        let outcome = storage.load().unwrap();

        assert!(outcome.migrated);
        let project = &outcome.store.projects[0];
        assert_eq!(project.title, "Sourdough starter");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.end_goal, MIGRATED_GOAL_PLACEHOLDER);
        assert_eq!(project.notes[0].content, "Feed twice daily");
        assert!(!storage.current_path().exists());
    }

    #[test]
    fn current_record_wins_over_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        let mut store = Store::default();
        store.add_project(Project {
            title: String::from("From current"),
            ..Project::default()
        });
        storage.save(&store).unwrap();
        fs::write(
            storage.legacy_path(),
            r#"{"projects": [{"id": "7f9c40f4-4d4e-4a0f-9a5a-222222222222", "title": "From legacy", "createdAt": 1700000000000}], "materials": []}"#,
        )
        .unwrap();

        let outcome = storage.load().unwrap();

        assert!(!outcome.migrated);
        assert_eq!(outcome.store.projects[0].title, "From current");
    }

    #[test]
    fn corrupt_legacy_record_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        fs::write(storage.legacy_path(), "not json at all").unwrap();

        let outcome = storage.load().unwrap();

        assert!(!outcome.migrated);
        assert!(outcome.store.projects.is_empty());
    }

    #[test]
    fn on_disk_record_uses_camel_case_and_millisecond_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        storage.save(&sample_store()).unwrap();

        let raw = fs::read_to_string(storage.current_path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        let project = &value["projects"][0];
        assert!(project["imageUrl"].is_string());
        assert!(project["endGoal"].is_string());
        assert!(project["createdAt"].is_i64());
        let material = &value["materials"][0];
        assert!(material["projectId"].is_string());
        assert!(material["isBought"].is_boolean());
        assert!(value["hasSeenTutorial"].is_boolean());
    }

    #[test]
    fn record_with_null_price_parses_with_price_zero() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let project_id = Uuid::new_v4();
        let json = format!(
            r#"{{
                "projects": [],
                "materials": [{{
                    "id": "{}",
                    "projectId": "{}",
                    "name": "Mystery yarn",
                    "price": null,
                    "isBought": false
                }}],
                "hasSeenTutorial": false
            }}"#,
            Uuid::new_v4(),
            project_id
        );
        fs::write(storage.current_path(), json).unwrap();

        let outcome = storage.load().unwrap();

        assert_eq!(outcome.store.materials[0].price, 0.0);
    }

    #[test]
    fn record_with_epoch_timestamp_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let created_at = Timestamp::from_millisecond(1700000000000).unwrap();
        let store = Store {
            projects: Vec::from([Project {
                created_at,
                ..Project::default()
            }]),
            ..Store::default()
        };

        storage.save(&store).unwrap();
        let outcome = storage.load().unwrap();

        assert_eq!(outcome.store.projects[0].created_at, created_at);
    }

    #[test]
    fn backup_creation_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        for _ in 1..=7 {
            storage.save(&sample_store()).unwrap();

            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let backups_dir = dir.path().join("backups");
        let backup_count = fs::read_dir(&backups_dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .count();

        assert_eq!(backup_count, 5, "Should keep exactly 5 backups");
    }

    #[test]
    fn backup_directory_created_on_second_save() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        let backups_dir = dir.path().join("backups");
        assert!(!backups_dir.exists(), "Backups dir should not exist yet");

        storage.save(&Store::default()).unwrap();

        assert!(
            !backups_dir.exists(),
            "Backups dir should not exist after first save"
        );

        storage.save(&sample_store()).unwrap();

        assert!(
            backups_dir.exists(),
            "Backups dir should be created on second save"
        );
        assert!(backups_dir.is_dir(), "Backups path should be a directory");
    }
}
