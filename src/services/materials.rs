use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        material::{Material, MaterialPatch},
        store::Store,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddMaterialError {
    #[error("Material name cannot be empty")]
    EmptyName,

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddMaterialParameters {
    pub project: String,
    pub name: String,
    pub price: Option<f64>,
    pub link: Option<String>,
}

pub fn add_material(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddMaterialParameters,
) -> Result<Material, AddMaterialError> {
    if parameters.name.trim().is_empty() {
        return Err(AddMaterialError::EmptyName);
    }

    // Fuzzy match to find the owning project
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
        0 => return Err(AddMaterialError::ProjectNotFound(parameters.project)),
        1 => matching_projects[0].id,
        _ => {
            let titles: Vec<String> = matching_projects.iter().map(|p| p.title.clone()).collect();
            return Err(AddMaterialError::AmbiguousProjectName(titles));
        }
    };

    let material = Material {
        id: Uuid::new_v4(),
        project_id,
        name: parameters.name,
        price: parameters.price.unwrap_or(0.0),
        is_bought: false,
        link: parameters.link,
    };

    let material_id = material.id;

    store.add_material(material);

    // Persist to storage
    storage.save(store)?;

    Ok(store.get_material(material_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum UpdateMaterialError {
    #[error("Material '{0}' not found")]
    MaterialNotFound(String),

    #[error("Material name is ambiguous. Multiple materials found: {}", .0.join(", "))]
    AmbiguousMaterialName(Vec<String>),

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("Nothing to change: no fields were given")]
    EmptyPatch,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct UpdateMaterialParameters {
    pub name: String,
    /// Narrows the search to one project's materials when names collide.
    pub project: Option<String>,
    pub patch: MaterialPatch,
}

pub fn update_material(
    store: &mut Store,
    storage: &impl Storage,
    parameters: UpdateMaterialParameters,
) -> Result<Material, UpdateMaterialError> {
    if parameters.patch.is_empty() {
        return Err(UpdateMaterialError::EmptyPatch);
    }

    // Resolve the optional project scope first
    let scope_id = if let Some(project_name) = parameters.project {
        let matching_projects: Vec<_> = store
            .projects
            .iter()
            .filter(|p| {
                p.title
                    .to_lowercase()
                    .contains(&project_name.to_lowercase())
            })
            .collect();

        match matching_projects.len() {
            0 => return Err(UpdateMaterialError::ProjectNotFound(project_name)),
            1 => Some(matching_projects[0].id),
            _ => {
                let titles: Vec<String> =
                    matching_projects.iter().map(|p| p.title.clone()).collect();
                return Err(UpdateMaterialError::AmbiguousProjectName(titles));
            }
        }
    } else {
        None
    };

    // Fuzzy match to find the material within the scope
    let matching_materials: Vec<_> = store
        .materials
        .iter()
        .filter(|m| scope_id.is_none_or(|id| m.project_id == id))
        .filter(|m| {
            m.name
                .to_lowercase()
                .contains(&parameters.name.to_lowercase())
        })
        .collect();

    let material_id = match matching_materials.len() {
        0 => return Err(UpdateMaterialError::MaterialNotFound(parameters.name)),
        1 => matching_materials[0].id,
        _ => {
            let names = qualified_names(store, &matching_materials);
            return Err(UpdateMaterialError::AmbiguousMaterialName(names));
        }
    };

    // Resolution guarantees the id is present.
    store.update_material(material_id, parameters.patch);

    // Persist to storage
    storage.save(store)?;

    Ok(store.get_material(material_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum DeleteMaterialError {
    #[error("Material '{0}' not found")]
    MaterialNotFound(String),

    #[error("Material name is ambiguous. Multiple materials found: {}", .0.join(", "))]
    AmbiguousMaterialName(Vec<String>),

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Project name is ambiguous. Multiple projects found: {}", .0.join(", "))]
    AmbiguousProjectName(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteMaterialParameters {
    pub name: String,
    pub project: Option<String>,
}

pub fn delete_material(
    store: &mut Store,
    storage: &impl Storage,
    parameters: DeleteMaterialParameters,
) -> Result<Material, DeleteMaterialError> {
    // Resolve the optional project scope first
    let scope_id = if let Some(project_name) = parameters.project {
        let matching_projects: Vec<_> = store
            .projects
            .iter()
            .filter(|p| {
                p.title
                    .to_lowercase()
                    .contains(&project_name.to_lowercase())
            })
            .collect();

        match matching_projects.len() {
            0 => return Err(DeleteMaterialError::ProjectNotFound(project_name)),
            1 => Some(matching_projects[0].id),
            _ => {
                let titles: Vec<String> =
                    matching_projects.iter().map(|p| p.title.clone()).collect();
                return Err(DeleteMaterialError::AmbiguousProjectName(titles));
            }
        }
    } else {
        None
    };

    // Fuzzy match to find the material within the scope
    let matching_materials: Vec<_> = store
        .materials
        .iter()
        .filter(|m| scope_id.is_none_or(|id| m.project_id == id))
        .filter(|m| {
            m.name
                .to_lowercase()
                .contains(&parameters.name.to_lowercase())
        })
        .collect();

    let material_id = match matching_materials.len() {
        0 => return Err(DeleteMaterialError::MaterialNotFound(parameters.name)),
        1 => matching_materials[0].id,
        _ => {
            let names = qualified_names(store, &matching_materials);
            return Err(DeleteMaterialError::AmbiguousMaterialName(names));
        }
    };

    // Resolution guarantees the id is present.
    let material = store.delete_material(material_id).unwrap();

    // Persist to storage
    storage.save(store)?;

    Ok(material)
}

/// "name (project title)" labels for ambiguity errors, since the same
/// material name can appear in several projects.
fn qualified_names(store: &Store, materials: &[&Material]) -> Vec<String> {
    materials
        .iter()
        .map(|m| {
            let project_title = store
                .get_project(m.project_id)
                .map(|p| p.title.as_str())
                .unwrap_or("Unknown Project");
            format!("{} ({})", m.name, project_title)
        })
        .collect()
}
