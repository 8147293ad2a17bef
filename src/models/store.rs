use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    material::{Material, MaterialPatch},
    project::{Note, Project, ProjectPatch},
};

/// The persisted aggregate: everything the app knows about, in one record.
///
/// Serializes to the same JSON document the stored record and the backup
/// file use: camelCase keys, epoch-millisecond timestamps, no envelope.
/// Every field tolerates absence on load.
#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub has_seen_tutorial: bool,
}

impl Store {
    // Projects keep newest-first order, materials keep insertion order. The
    // asymmetry is intentional: the overview reads newest first, while a
    // shopping list is re-sorted by whoever displays it.

    pub fn add_project(&mut self, project: Project) {
        self.projects.insert(0, project);
    }

    pub fn get_project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Shallow-merges the patch into the matching project. An unknown id is
    /// a no-op, not an error.
    pub fn update_project(&mut self, id: Uuid, patch: ProjectPatch) -> Option<&Project> {
        let project = self.projects.iter_mut().find(|p| p.id == id)?;
        patch.apply(project);
        Some(&*project)
    }

    /// Removes the project and every material referencing it, so no orphaned
    /// materials survive. Returns the removed project together with the
    /// number of materials that went with it.
    pub fn delete_project(&mut self, id: Uuid) -> Option<(Project, usize)> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        let project = self.projects.remove(index);

        let before = self.materials.len();
        self.materials.retain(|m| m.project_id != id);

        Some((project, before - self.materials.len()))
    }

    /// Prepends a note to the owning project's feed (newest first).
    pub fn add_note(&mut self, project_id: Uuid, note: Note) -> Option<&Note> {
        let project = self.projects.iter_mut().find(|p| p.id == project_id)?;
        project.notes.insert(0, note);
        project.notes.first()
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    pub fn get_material(&self, id: Uuid) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Shallow-merges the patch into the matching material. An unknown id is
    /// a no-op, not an error.
    pub fn update_material(&mut self, id: Uuid, patch: MaterialPatch) -> Option<&Material> {
        let material = self.materials.iter_mut().find(|m| m.id == id)?;
        patch.apply(material);
        Some(&*material)
    }

    pub fn delete_material(&mut self, id: Uuid) -> Option<Material> {
        let index = self.materials.iter().position(|m| m.id == id)?;
        Some(self.materials.remove(index))
    }

    pub fn get_materials_for_project(
        &self,
        project_id: Uuid,
    ) -> impl Iterator<Item = &Material> + '_ {
        self.materials
            .iter()
            .filter(move |m| m.project_id == project_id)
    }

    pub fn get_unbought_materials(&self) -> impl Iterator<Item = &Material> + '_ {
        self.materials.iter().filter(|m| !m.is_bought)
    }

    /// Total price of everything still to buy, NaN-safe.
    pub fn outstanding_cost(&self) -> f64 {
        self.get_unbought_materials()
            .map(Material::effective_price)
            .sum()
    }

    /// Price of what a single project still needs, NaN-safe.
    pub fn outstanding_cost_for_project(&self, project_id: Uuid) -> f64 {
        self.get_materials_for_project(project_id)
            .filter(|m| !m.is_bought)
            .map(Material::effective_price)
            .sum()
    }

    /// Marks the tutorial as seen. One-way: there is no operation to reset
    /// the flag. Returns whether anything changed.
    pub fn complete_tutorial(&mut self) -> bool {
        if self.has_seen_tutorial {
            return false;
        }
        self.has_seen_tutorial = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectStatus;

    fn sample_project(title: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: String::from(title),
            category: String::from("General"),
            end_goal: String::from("Finish it"),
            ..Project::default()
        }
    }

    fn sample_material(project_id: Uuid, name: &str, price: f64) -> Material {
        Material {
            id: Uuid::new_v4(),
            project_id,
            name: String::from(name),
            price,
            ..Material::default()
        }
    }

    #[test]
    fn test_add_project_prepends() {
        let mut store = Store::default();
        let first = sample_project("Birdhouse");
        let second = sample_project("Scarf");
        let second_id = second.id;

        store.add_project(first);
        store.add_project(second);

        assert_eq!(store.projects[0].id, second_id);
        assert_eq!(store.projects.len(), 2);
    }

    #[test]
    fn test_add_material_appends() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        store.add_project(project);

        let glue = sample_material(project_id, "Wood Glue", 4.5);
        let nails = sample_material(project_id, "Nails", 2.0);
        let nails_id = nails.id;

        store.add_material(glue);
        store.add_material(nails);

        assert_eq!(store.materials.last().unwrap().id, nails_id);
    }

    #[test]
    fn test_update_project_merges_only_given_fields() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        let other = sample_project("Scarf");
        let other_id = other.id;
        store.add_project(project);
        store.add_project(other);

        let updated = store
            .update_project(
                project_id,
                ProjectPatch {
                    progress: Some(80),
                    status: Some(ProjectStatus::InProgress),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.progress, 80);
        assert!(matches!(updated.status, ProjectStatus::InProgress));
        assert_eq!(updated.title, "Birdhouse");
        assert_eq!(updated.category, "General");

        let untouched = store.get_project(other_id).unwrap();
        assert_eq!(untouched.progress, 0);
        assert!(matches!(untouched.status, ProjectStatus::Planned));
    }

    #[test]
    fn test_update_project_unknown_id_is_noop() {
        let mut store = Store::default();
        store.add_project(sample_project("Birdhouse"));
        let snapshot = serde_json::to_value(&store).unwrap();

        let result = store.update_project(
            Uuid::new_v4(),
            ProjectPatch {
                progress: Some(99),
                ..ProjectPatch::default()
            },
        );

        assert!(result.is_none());
        assert_eq!(serde_json::to_value(&store).unwrap(), snapshot);
    }

    #[test]
    fn test_delete_project_cascades_materials() {
        let mut store = Store::default();
        let birdhouse = sample_project("Birdhouse");
        let birdhouse_id = birdhouse.id;
        let scarf = sample_project("Scarf");
        let scarf_id = scarf.id;
        store.add_project(birdhouse);
        store.add_project(scarf);

        store.add_material(sample_material(birdhouse_id, "Wood Glue", 4.5));
        store.add_material(sample_material(birdhouse_id, "Nails", 2.0));
        store.add_material(sample_material(scarf_id, "Yarn", 8.0));

        let (removed, cascaded) = store.delete_project(birdhouse_id).unwrap();

        assert_eq!(removed.id, birdhouse_id);
        assert_eq!(cascaded, 2);
        assert!(store.get_project(birdhouse_id).is_none());
        assert!(
            store
                .materials
                .iter()
                .all(|m| m.project_id != birdhouse_id)
        );
        assert_eq!(store.materials.len(), 1);
        assert_eq!(store.materials[0].name, "Yarn");
    }

    #[test]
    fn test_delete_project_unknown_id_is_noop() {
        let mut store = Store::default();
        store.add_project(sample_project("Birdhouse"));
        let snapshot = serde_json::to_value(&store).unwrap();

        assert!(store.delete_project(Uuid::new_v4()).is_none());
        assert_eq!(serde_json::to_value(&store).unwrap(), snapshot);
    }

    #[test]
    fn test_add_note_prepends() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        store.add_project(project);

        let first = Note {
            id: Uuid::new_v4(),
            content: String::from("Cut the panels"),
            ..Note::default()
        };
        let second = Note {
            id: Uuid::new_v4(),
            content: String::from("Glued the roof"),
            ..Note::default()
        };
        let second_id = second.id;

        store.add_note(project_id, first).unwrap();
        store.add_note(project_id, second).unwrap();

        let notes = &store.get_project(project_id).unwrap().notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, second_id);
    }

    #[test]
    fn test_add_note_unknown_project_is_noop() {
        let mut store = Store::default();
        let result = store.add_note(Uuid::new_v4(), Note::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_patch_notes_replaces_whole_feed() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        store.add_project(project);

        store
            .add_note(
                project_id,
                Note {
                    id: Uuid::new_v4(),
                    content: String::from("old"),
                    ..Note::default()
                },
            )
            .unwrap();

        let replacement = Note {
            id: Uuid::new_v4(),
            content: String::from("only note now"),
            ..Note::default()
        };

        store.update_project(
            project_id,
            ProjectPatch {
                notes: Some(vec![replacement]),
                ..ProjectPatch::default()
            },
        );

        let notes = &store.get_project(project_id).unwrap().notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "only note now");
    }

    #[test]
    fn test_delete_material() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        store.add_project(project);

        let glue = sample_material(project_id, "Wood Glue", 4.5);
        let glue_id = glue.id;
        store.add_material(glue);

        let removed = store.delete_material(glue_id).unwrap();
        assert_eq!(removed.id, glue_id);
        assert!(store.materials.is_empty());
        assert!(store.delete_material(glue_id).is_none());
    }

    #[test]
    fn test_complete_tutorial_is_one_way() {
        let mut store = Store::default();
        assert!(!store.has_seen_tutorial);

        assert!(store.complete_tutorial());
        assert!(store.has_seen_tutorial);

        assert!(!store.complete_tutorial());
        assert!(store.has_seen_tutorial);
    }

    #[test]
    fn test_outstanding_cost_skips_bought_and_nan() {
        let mut store = Store::default();
        let project = sample_project("Birdhouse");
        let project_id = project.id;
        store.add_project(project);

        store.add_material(sample_material(project_id, "Wood Glue", 4.5));
        store.add_material(sample_material(project_id, "Poison", f64::NAN));

        let mut bought = sample_material(project_id, "Nails", 100.0);
        bought.is_bought = true;
        store.add_material(bought);

        assert_eq!(store.outstanding_cost(), 4.5);
        assert_eq!(store.outstanding_cost_for_project(project_id), 4.5);
    }
}
