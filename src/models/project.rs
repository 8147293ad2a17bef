use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a project currently stands. Stored as `planned`, `in_progress` or
/// `completed` on the wire.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseStatusError {
    #[error("Unknown status '{0}'. Expected one of: planned, in-progress, completed")]
    UnknownStatus(String),
}

impl std::str::FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "planned" => Ok(ProjectStatus::Planned),
            "in_progress" | "inprogress" => Ok(ProjectStatus::InProgress),
            "completed" | "done" => Ok(ProjectStatus::Completed),
            _ => Err(ParseStatusError::UnknownStatus(s.to_string())),
        }
    }
}

/// A journal entry embedded in its project. Notes only exist inside a
/// project's feed and are kept newest first.
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the note was posted, as epoch milliseconds on the wire
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}

#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// UUID of the project
    pub id: Uuid,
    /// Title of the project
    pub title: String,
    /// Short description of the project
    #[serde(default)]
    pub description: String,
    /// Free-form category (e.g. "Woodworking")
    #[serde(default)]
    pub category: String,
    /// Display image for the project card
    #[serde(default)]
    pub image_url: String,
    /// Journal of the project, newest note first
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Current status of the project
    pub status: ProjectStatus,
    /// Progress percentage. The store does not clamp this; the frontend owns
    /// keeping it within 0-100
    pub progress: u8,
    /// What finishing this project looks like
    pub end_goal: String,
    /// When the project was created, as epoch milliseconds on the wire
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}

/// Partial update for a project. Only fields carrying `Some` are applied;
/// everything else is left untouched.
///
/// `notes` replaces the whole feed; there is no operation to edit or
/// remove a single note.
#[derive(Default, Clone)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<Vec<Note>>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
    pub end_goal: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.notes.is_none()
            && self.status.is_none()
            && self.progress.is_none()
            && self.end_goal.is_none()
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(category) = self.category {
            project.category = category;
        }
        if let Some(image_url) = self.image_url {
            project.image_url = image_url;
        }
        if let Some(notes) = self.notes {
            project.notes = notes;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if let Some(end_goal) = self.end_goal {
            project.end_goal = end_goal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_common_spellings() {
        assert!(matches!(
            "planned".parse::<ProjectStatus>(),
            Ok(ProjectStatus::Planned)
        ));
        assert!(matches!(
            "in-progress".parse::<ProjectStatus>(),
            Ok(ProjectStatus::InProgress)
        ));
        assert!(matches!(
            "IN_PROGRESS".parse::<ProjectStatus>(),
            Ok(ProjectStatus::InProgress)
        ));
        assert!(matches!(
            "done".parse::<ProjectStatus>(),
            Ok(ProjectStatus::Completed)
        ));
        assert!(matches!(
            "finished".parse::<ProjectStatus>(),
            Err(ParseStatusError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: ProjectStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(matches!(parsed, ProjectStatus::Completed));
    }

    #[test]
    fn test_patch_applies_only_given_fields() {
        let mut project = Project {
            title: String::from("Birdhouse"),
            category: String::from("Woodworking"),
            progress: 40,
            ..Project::default()
        };

        let patch = ProjectPatch {
            progress: Some(65),
            ..ProjectPatch::default()
        };
        patch.apply(&mut project);

        assert_eq!(project.progress, 65);
        assert_eq!(project.title, "Birdhouse");
        assert_eq!(project.category, "Woodworking");
    }

    #[test]
    fn test_empty_patch_is_empty() {
        assert!(ProjectPatch::default().is_empty());
        assert!(
            !ProjectPatch {
                title: Some(String::from("x")),
                ..ProjectPatch::default()
            }
            .is_empty()
        );
    }
}
