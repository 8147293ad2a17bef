use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        project::{Note, Project, ProjectPatch},
        store::Store,
    },
    storage::{Storage, StorageError},
};

/// Goal text for projects created without one. The project screen shows it
/// as an editable prompt.
pub const DEFAULT_GOAL: &str = "Set a goal for this project...";

/// Placeholder artwork for projects created without an image, seeded by
/// creation time so each project gets a stable, distinct picture.
pub fn seeded_image_url(created_at: jiff::Timestamp) -> String {
    format!(
        "https://picsum.photos/seed/{}/600/400",
        created_at.as_millisecond()
    )
}

#[derive(Debug, Error)]
pub enum AddProjectError {
    #[error("Project title cannot be empty")]
    EmptyTitle,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddProjectParameters {
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub end_goal: Option<String>,
    pub image_url: Option<String>,
}

pub fn add_project(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddProjectParameters,
) -> Result<Project, AddProjectError> {
    if parameters.title.trim().is_empty() {
        return Err(AddProjectError::EmptyTitle);
    }

    let created_at = jiff::Timestamp::now();

    let project = Project {
        id: Uuid::new_v4(),
        title: parameters.title,
        description: parameters.description.unwrap_or_default(),
        category: parameters
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| String::from("General")),
        image_url: parameters
            .image_url
            .unwrap_or_else(|| seeded_image_url(created_at)),
        end_goal: parameters
            .end_goal
            .unwrap_or_else(|| DEFAULT_GOAL.to_string()),
        created_at,
        ..Project::default()
    };

    let project_id = project.id;

    store.add_project(project);

    storage.save(store)?;

    Ok(store.get_project(project_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum UpdateProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("Nothing to change: no fields were given")]
    EmptyPatch,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct UpdateProjectParameters {
    pub name: String,
    pub patch: ProjectPatch,
}

pub fn update_project(
    store: &mut Store,
    storage: &impl Storage,
    parameters: UpdateProjectParameters,
) -> Result<Project, UpdateProjectError> {
    if parameters.patch.is_empty() {
        return Err(UpdateProjectError::EmptyPatch);
    }

    // Fuzzy match to find project
    let matching_projects: Vec<_> = store
        .projects
        .iter()
        .filter(|p| {
            p.title
                .to_lowercase()
                .contains(&parameters.name.to_lowercase())
        })
        .collect();

    let project_id = match matching_projects.len() {
        0 => return Err(UpdateProjectError::ProjectNotFound(parameters.name)),
        1 => matching_projects[0].id,
        _ => {
            let titles: Vec<String> = matching_projects.iter().map(|p| p.title.clone()).collect();
            return Err(UpdateProjectError::AmbiguousProjectName(titles));
        }
    };

    // Resolution guarantees the id is present.
    store.update_project(project_id, parameters.patch);

    // Persist to storage
    storage.save(store)?;

    Ok(store.get_project(project_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum DeleteProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteProjectParameters {
    pub name: String,
}

pub struct DeleteProjectResult {
    pub project: Project,
    pub cascaded_materials_count: usize,
}

pub fn delete_project(
    store: &mut Store,
    storage: &impl Storage,
    parameters: DeleteProjectParameters,
) -> Result<DeleteProjectResult, DeleteProjectError> {
    // Fuzzy match to find project
    let matching_projects: Vec<_> = store
        .projects
        .iter()
        .filter(|p| {
            p.title
                .to_lowercase()
                .contains(&parameters.name.to_lowercase())
        })
        .collect();

    let project_id = match matching_projects.len() {
        0 => return Err(DeleteProjectError::ProjectNotFound(parameters.name)),
        1 => matching_projects[0].id,
        _ => {
            let titles: Vec<String> = matching_projects.iter().map(|p| p.title.clone()).collect();
            return Err(DeleteProjectError::AmbiguousProjectName(titles));
        }
    };

    // Cascade delete removes the project's materials with it. Resolution
    // guarantees the id is present.
    let (project, cascaded_materials_count) = store.delete_project(project_id).unwrap();

    // Persist to storage
    storage.save(store)?;

    Ok(DeleteProjectResult {
        project,
        cascaded_materials_count,
    })
}

#[derive(Debug, Error)]
pub enum AddNoteError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("A note needs some content or an image")]
    EmptyNote,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddNoteParameters {
    pub project: String,
    pub content: String,
    pub image_url: Option<String>,
}

pub fn add_note(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddNoteParameters,
) -> Result<Note, AddNoteError> {
    // A note is allowed to be image-only, but not fully blank
    let has_image = parameters
        .image_url
        .as_deref()
        .map(str::trim)
        .map(|url| !url.is_empty())
        .unwrap_or(false);
    if parameters.content.trim().is_empty() && !has_image {
        return Err(AddNoteError::EmptyNote);
    }

    // Fuzzy match to find project
    let matching_projects: Vec<_> = store
        .projects
        .iter()
        .filter(|p| {
            p.title
                .to_lowercase()
                .contains(&parameters.project.to_lowercase())
        })
        .collect();

    let project_id = match matching_projects.len() {
        0 => return Err(AddNoteError::ProjectNotFound(parameters.project)),
        1 => matching_projects[0].id,
        _ => {
            let titles: Vec<String> = matching_projects.iter().map(|p| p.title.clone()).collect();
            return Err(AddNoteError::AmbiguousProjectName(titles));
        }
    };

    let note = Note {
        id: Uuid::new_v4(),
        content: parameters.content,
        image_url: parameters.image_url.filter(|url| !url.trim().is_empty()),
        created_at: jiff::Timestamp::now(),
    };
    let returned = note.clone();

    // Resolution guarantees the id is present.
    store.add_note(project_id, note);

    // Persist to storage
    storage.save(store)?;

    Ok(returned)
}
