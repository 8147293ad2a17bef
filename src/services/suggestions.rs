use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        project::{Note, Project, ProjectStatus},
        store::Store,
    },
    storage::{Storage, StorageError},
};

/// A project idea sourced from outside the store.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_cost: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Suggestions are unavailable: {0}")]
    Unavailable(String),

    #[error("Suggestion source returned something unusable: {0}")]
    MalformedResponse(String),
}

/// Where project ideas come from. Implementations own their transport and
/// credentials; the store only consumes the result. Current projects are
/// passed along so a source can avoid suggesting what the user already has.
pub trait SuggestionSource {
    fn suggestions(
        &self,
        current_projects: &[Project],
    ) -> Result<Vec<Suggestion>, SuggestionError>;
}

/// Reads canned suggestions from a JSON file holding a `Suggestion` list.
/// Stands in for a live idea source; the file can come from anywhere.
pub struct JsonFileSuggestionSource {
    path: PathBuf,
}

impl JsonFileSuggestionSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SuggestionSource for JsonFileSuggestionSource {
    fn suggestions(
        &self,
        _current_projects: &[Project],
    ) -> Result<Vec<Suggestion>, SuggestionError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SuggestionError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| SuggestionError::MalformedResponse(e.to_string()))
    }
}

/// Builds the project a suggestion turns into when the user picks it up:
/// the first tag becomes the category, difficulty and estimated cost land
/// in a starter note, and the goal is fixed.
pub fn project_from_suggestion(suggestion: &Suggestion) -> Project {
    let category = suggestion
        .tags
        .first()
        .cloned()
        .unwrap_or_else(|| String::from("General"));

    // Seed the placeholder artwork with the title, whitespace stripped
    let seed: String = suggestion.title.split_whitespace().collect();
    let now = jiff::Timestamp::now();

    Project {
        id: Uuid::new_v4(),
        title: suggestion.title.clone(),
        description: suggestion.description.clone(),
        category,
        image_url: format!("https://picsum.photos/seed/{}/600/400", seed),
        notes: vec![Note {
            id: Uuid::new_v4(),
            content: format!(
                "Difficulty: {}\nEstimated Cost: {}",
                suggestion.difficulty, suggestion.estimated_cost
            ),
            image_url: None,
            created_at: now,
        }],
        status: ProjectStatus::Planned,
        progress: 0,
        end_goal: String::from("Complete this project"),
        created_at: now,
    }
}

#[derive(Debug, Error)]
pub enum AddSuggestedProjectError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn add_suggested_project(
    store: &mut Store,
    storage: &impl Storage,
    suggestion: &Suggestion,
) -> Result<Project, AddSuggestedProjectError> {
    let project = project_from_suggestion(suggestion);
    let project_id = project.id;

    store.add_project(project);

    storage.save(store)?;

    Ok(store.get_project(project_id).unwrap().clone())
}
