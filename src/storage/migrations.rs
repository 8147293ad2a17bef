use jiff::Timestamp;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::material::Material;
use crate::models::project::{Note, Project, ProjectStatus};
use crate::models::store::Store;

/// Goal text given to migrated projects. The old record had no goal field,
/// so every migrated project starts with this placeholder.
pub const MIGRATED_GOAL_PLACEHOLDER: &str = "No goal set yet.";

/// The shape of the original single-notes record. Only ever deserialized;
/// nothing writes this format anymore.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyStore {
    #[serde(default)]
    pub projects: Vec<LegacyProject>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// A project as the original record stored it: one free-form notes string
/// instead of a note list, and no status, progress or goal.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProject {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}

/// Converts a legacy record into the current shape. Materials carry over
/// unchanged; each project gains the fields the old record lacked. Anything
/// already worked on once is assumed to still be in progress.
pub fn legacy_to_current(legacy: LegacyStore) -> Store {
    Store {
        projects: legacy
            .projects
            .into_iter()
            .map(project_to_current)
            .collect(),
        materials: legacy.materials,
        has_seen_tutorial: false,
    }
}

fn project_to_current(legacy: LegacyProject) -> Project {
    let notes = match legacy.notes {
        Some(content) if !content.is_empty() => vec![Note {
            id: Uuid::new_v4(),
            content,
            image_url: None,
            created_at: Timestamp::now(),
        }],
        _ => Vec::new(),
    };

    Project {
        id: legacy.id,
        title: legacy.title,
        description: legacy.description,
        category: legacy.category,
        image_url: legacy.image_url,
        notes,
        status: ProjectStatus::InProgress,
        progress: 0,
        end_goal: MIGRATED_GOAL_PLACEHOLDER.to_string(),
        created_at: legacy.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrates_notes_string_into_a_single_note() {
        let legacy: LegacyStore = serde_json::from_str(
            r#"{
                "projects": [{
                    "id": "7f9c40f4-4d4e-4a0f-9a5a-111111111111",
                    "title": "Birdhouse",
                    "description": "A cedar birdhouse",
                    "category": "Woodworking",
                    "imageUrl": "https://example.com/bird.jpg",
                    "notes": "hi",
                    "createdAt": 1700000000000
                }],
                "materials": []
            }"#,
        )
        .unwrap();

        let store = legacy_to_current(legacy);
        let project = &store.projects[0];

        assert_eq!(project.title, "Birdhouse");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.progress, 0);
        assert_eq!(project.end_goal, MIGRATED_GOAL_PLACEHOLDER);
        assert_eq!(project.notes.len(), 1);
        assert_eq!(project.notes[0].content, "hi");
        assert!(project.notes[0].image_url.is_none());
        assert_eq!(project.created_at.as_millisecond(), 1700000000000);
        assert!(!store.has_seen_tutorial);
    }

    #[test]
    fn empty_or_missing_notes_become_no_notes() {
        let legacy: LegacyStore = serde_json::from_str(
            r#"{
                "projects": [
                    {
                        "id": "7f9c40f4-4d4e-4a0f-9a5a-222222222222",
                        "title": "Empty notes",
                        "notes": "",
                        "createdAt": 1700000000000
                    },
                    {
                        "id": "7f9c40f4-4d4e-4a0f-9a5a-333333333333",
                        "title": "No notes field",
                        "createdAt": 1700000000000
                    }
                ]
            }"#,
        )
        .unwrap();

        let store = legacy_to_current(legacy);
        assert!(store.projects[0].notes.is_empty());
        assert!(store.projects[1].notes.is_empty());
    }

    #[test]
    fn materials_carry_over_unchanged() {
        let legacy: LegacyStore = serde_json::from_str(
            r#"{
                "projects": [],
                "materials": [{
                    "id": "7f9c40f4-4d4e-4a0f-9a5a-444444444444",
                    "projectId": "7f9c40f4-4d4e-4a0f-9a5a-111111111111",
                    "name": "Cedar plank",
                    "price": 12.5,
                    "isBought": true
                }]
            }"#,
        )
        .unwrap();

        let store = legacy_to_current(legacy);
        assert_eq!(store.materials.len(), 1);
        assert_eq!(store.materials[0].name, "Cedar plank");
        assert_eq!(store.materials[0].price, 12.5);
        assert!(store.materials[0].is_bought);
    }

    #[test]
    fn preserves_project_order() {
        let legacy: LegacyStore = serde_json::from_str(
            r#"{
                "projects": [
                    {"id": "7f9c40f4-4d4e-4a0f-9a5a-555555555555", "title": "First", "createdAt": 1700000000000},
                    {"id": "7f9c40f4-4d4e-4a0f-9a5a-666666666666", "title": "Second", "createdAt": 1700000000001}
                ]
            }"#,
        )
        .unwrap();

        let store = legacy_to_current(legacy);
        assert_eq!(store.projects[0].title, "First");
        assert_eq!(store.projects[1].title, "Second");
    }
}
