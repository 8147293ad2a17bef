use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use uuid::Uuid;

use crate::{
    models::{
        material::MaterialPatch,
        project::{ProjectPatch, ProjectStatus},
    },
    services::{
        backup::{ExportError, ImportError, export_data, import_data},
        materials::{
            AddMaterialError, AddMaterialParameters, DeleteMaterialError,
            DeleteMaterialParameters, UpdateMaterialError, UpdateMaterialParameters, add_material,
            delete_material, update_material,
        },
        projects::{
            AddNoteError, AddNoteParameters, AddProjectError, AddProjectParameters,
            DeleteProjectError, DeleteProjectParameters, UpdateProjectError,
            UpdateProjectParameters, add_note, add_project, delete_project, update_project,
        },
        suggestions::{
            AddSuggestedProjectError, JsonFileSuggestionSource, SuggestionError, SuggestionSource,
            add_suggested_project,
        },
        tutorial::{CompleteTutorialError, complete_tutorial},
    },
    storage::{Storage, json::JsonFileStorage},
};

mod models;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "hobbyhop",
    about = "A local-first tracker for your hobby projects, notes and materials"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all projects
    List,

    /// Start a new project
    Add {
        /// Project title
        title: String,

        /// Category (defaults to "General")
        #[arg(short, long)]
        category: Option<String>,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// What finishing this project looks like
        #[arg(short, long)]
        goal: Option<String>,

        /// Cover image URL (a placeholder is generated when omitted)
        #[arg(long)]
        image_url: Option<String>,
    },

    /// View one project in detail
    View {
        /// Project name (fuzzy matched)
        project: String,
    },

    /// Edit a project's fields
    Edit {
        /// Project name (fuzzy matched)
        project: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New cover image URL
        #[arg(long)]
        image_url: Option<String>,

        /// New goal
        #[arg(long)]
        goal: Option<String>,

        /// New status: planned, in-progress or completed
        #[arg(long)]
        status: Option<String>,

        /// Progress percentage (0-100)
        #[arg(long)]
        progress: Option<u8>,
    },

    /// Jot a note down on a project
    Note {
        /// Project name (fuzzy matched)
        project: String,

        /// Note text
        content: String,

        /// Attach an image URL
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a project and its materials
    Delete {
        /// Project name (fuzzy matched)
        project: String,
    },

    /// Manage materials
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Show the shopping list (unbought materials)
    Shop {
        /// One flat list, most expensive first
        #[arg(long)]
        by_price: bool,
    },

    /// Browse project ideas from a file and pick one up
    Explore {
        /// JSON file holding a list of suggestions
        file: PathBuf,

        /// Add the named suggestion (fuzzy matched) as a project
        #[arg(long)]
        add: Option<String>,
    },

    /// Export everything to a backup file
    Export {
        /// Directory to write the backup into (defaults to the current one)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replace everything with the contents of a backup file
    Import {
        /// Backup file produced by export
        file: PathBuf,
    },

    /// Show the quick tour
    Tutorial,
}

#[derive(Debug, Subcommand)]
enum MaterialCommands {
    /// Add a material to a project
    New {
        /// Project name (fuzzy matched)
        project: String,

        /// Material name
        name: String,

        /// Price
        #[arg(short, long)]
        price: Option<f64>,

        /// Where to buy it
        #[arg(short, long)]
        link: Option<String>,
    },

    /// Mark a material as bought
    Bought {
        /// Material name (fuzzy matched)
        name: String,

        /// Narrow the search to one project
        #[arg(short, long)]
        project: Option<String>,

        /// Put it back on the shopping list instead
        #[arg(long)]
        undo: bool,
    },

    /// Edit a material
    Edit {
        /// Material name (fuzzy matched)
        name: String,

        /// Narrow the search to one project
        #[arg(long)]
        project: Option<String>,

        /// New name
        #[arg(long)]
        rename: Option<String>,

        /// New price
        #[arg(long)]
        price: Option<f64>,

        /// New shop link
        #[arg(long)]
        link: Option<String>,
    },

    /// Remove a material
    Delete {
        /// Material name (fuzzy matched)
        name: String,

        /// Narrow the search to one project
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List all materials by project
    List,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hobbyhop=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing();

    // Initialize storage
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hobbyhop");

    std::fs::create_dir_all(&data_dir).unwrap_or_else(|e| {
        eprintln!("Error: Failed to create data directory: {}", e);
        std::process::exit(1);
    });

    let storage = JsonFileStorage::new(data_dir);

    let (mut store, migrated) = match storage.load() {
        Ok(outcome) => (outcome.store, outcome.migrated),
        Err(e) => {
            eprintln!("Error: Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    // A migrated store only exists in memory so far. Write it back once so
    // the generated note ids stay stable across runs.
    if migrated {
        if let Err(e) = storage.save(&store) {
            tracing::warn!("Failed to persist the migrated store: {}", e);
        }
    }

    match cli.command {
        Some(Commands::List) => {
            if store.projects.is_empty() {
                println!("No projects yet. Start one with: hobbyhop add <title>");
            } else {
                ui::render_view_header("My Hobbies", store.projects.len(), "project");
                for project in &store.projects {
                    ui::render_project_line(project, &store);
                }
            }

            if !store.has_seen_tutorial {
                println!(
                    "\n  {}",
                    "New here? `hobbyhop tutorial` gives you a quick tour.".dimmed()
                );
            }
        }
        Some(Commands::Add {
            title,
            category,
            description,
            goal,
            image_url,
        }) => {
            // Build parameters
            let params = AddProjectParameters {
                title,
                category,
                description,
                end_goal: goal,
                image_url,
            };

            // Call service
            match add_project(&mut store, &storage, params) {
                Ok(project) => {
                    println!("✓ Project started: {}", project.title);
                    println!("  Category: {}", project.category);
                    println!("  Goal: {}", project.end_goal);
                }
                Err(AddProjectError::EmptyTitle) => {
                    eprintln!("Error: Project title cannot be empty");
                    std::process::exit(1);
                }
                Err(AddProjectError::Storage(e)) => {
                    eprintln!("Error: Failed to save project: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::View { project }) => {
            // Fuzzy match to find project
            let matching_projects: Vec<_> = store
                .projects
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&project.to_lowercase()))
                .collect();

            let resolved = match matching_projects.len() {
                0 => {
                    eprintln!("Error: Project '{}' not found", project);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for p in &store.projects {
                            eprintln!("  - {}", p.title);
                        }
                    }
                    std::process::exit(1);
                }
                1 => matching_projects[0],
                _ => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for p in matching_projects {
                        eprintln!("  - {}", p.title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
            };

            println!("\n  {}", resolved.title.cyan().bold());

            let mut meta = vec![ui::status_label(resolved.status).to_string()];
            if !resolved.category.is_empty() {
                meta.push(resolved.category.clone());
            }
            meta.push(format!("{}%", resolved.progress));
            println!("  {}", meta.join(" · ").dimmed());

            if !resolved.description.is_empty() {
                println!("\n  {}", resolved.description);
            }

            println!("\n  {} {}", "Goal:".bold(), resolved.end_goal);

            if !resolved.notes.is_empty() {
                ui::render_section_header(&format!("Notes ({})", resolved.notes.len()));
                for note in &resolved.notes {
                    let date = ui::format_note_date(note.created_at);
                    let mut lines = note.content.lines();
                    if let Some(first) = lines.next() {
                        println!("  {}  {}", date.dimmed(), first);
                        for line in lines {
                            println!("  {}  {}", " ".repeat(date.chars().count()), line);
                        }
                    } else {
                        // Image-only note
                        println!("  {}", date.dimmed());
                    }
                    if let Some(url) = &note.image_url {
                        println!("      {}", url.dimmed());
                    }
                }
            }

            let materials: Vec<_> = store.get_materials_for_project(resolved.id).collect();
            if !materials.is_empty() {
                ui::render_section_header(&format!("Materials ({})", materials.len()));
                for material in &materials {
                    ui::render_material_line(material);
                }

                let outstanding = store.outstanding_cost_for_project(resolved.id);
                if outstanding > 0.0 {
                    println!(
                        "\n  {} {}",
                        "Still to buy:".dimmed(),
                        ui::format_price(outstanding)
                    );
                }
            }

            ui::render_section_separator();
        }
        Some(Commands::Edit {
            project,
            title,
            description,
            category,
            image_url,
            goal,
            status,
            progress,
        }) => {
            // Parse the status flag before touching anything
            let status = match status {
                Some(raw) => match raw.parse::<ProjectStatus>() {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        eprintln!("\nValid statuses:");
                        eprintln!("  planned       Not started yet");
                        eprintln!("  in-progress   Actively being worked on");
                        eprintln!("  completed     Done");
                        std::process::exit(1);
                    }
                },
                None => None,
            };

            // Build parameters
            let params = UpdateProjectParameters {
                name: project,
                patch: ProjectPatch {
                    title,
                    description,
                    category,
                    image_url,
                    notes: None,
                    status,
                    progress,
                    end_goal: goal,
                },
            };

            // Call service
            match update_project(&mut store, &storage, params) {
                Ok(project) => {
                    println!("✓ Project updated: {}", project.title);
                    println!(
                        "  {} · {}%",
                        ui::status_label(project.status),
                        project.progress
                    );
                }
                Err(UpdateProjectError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(UpdateProjectError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(UpdateProjectError::EmptyPatch) => {
                    eprintln!("Error: Nothing to change");
                    eprintln!("\nPass at least one of:");
                    eprintln!(
                        "  --title, --description, --category, --image-url, --goal, --status, --progress"
                    );
                    std::process::exit(1);
                }
                Err(UpdateProjectError::Storage(e)) => {
                    eprintln!("Error: Failed to save project: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Note {
            project,
            content,
            image_url,
        }) => {
            // Build parameters
            let params = AddNoteParameters {
                project,
                content,
                image_url,
            };

            // Call service
            match add_note(&mut store, &storage, params) {
                Ok(note) => {
                    println!("✓ Note added");
                    if !note.content.is_empty() {
                        println!("  {}", note.content);
                    }
                }
                Err(AddNoteError::EmptyNote) => {
                    eprintln!("Error: A note needs some content or an image");
                    std::process::exit(1);
                }
                Err(AddNoteError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(AddNoteError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(AddNoteError::Storage(e)) => {
                    eprintln!("Error: Failed to save note: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { project }) => {
            let params = DeleteProjectParameters { name: project };

            match delete_project(&mut store, &storage, params) {
                Ok(result) => {
                    println!("✓ Project deleted: {}", result.project.title);
                    if result.cascaded_materials_count > 0 {
                        println!(
                            "  └─ {} material(s) also deleted",
                            result.cascaded_materials_count
                        );
                    }
                }
                Err(DeleteProjectError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteProjectError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(DeleteProjectError::Storage(e)) => {
                    eprintln!("Error: Failed to delete project: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Material(MaterialCommands::New {
            project,
            name,
            price,
            link,
        })) => {
            let params = AddMaterialParameters {
                project,
                name,
                price,
                link,
            };

            match add_material(&mut store, &storage, params) {
                Ok(material) => {
                    println!("✓ Material added: {}", material.name);
                    if material.price > 0.0 {
                        println!("  {}", ui::format_price(material.price));
                    }
                }
                Err(AddMaterialError::EmptyName) => {
                    eprintln!("Error: Material name cannot be empty");
                    std::process::exit(1);
                }
                Err(AddMaterialError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    } else {
                        eprintln!("\nNo projects exist yet. Start one with: hobbyhop add <title>");
                    }
                    std::process::exit(1);
                }
                Err(AddMaterialError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(AddMaterialError::Storage(e)) => {
                    eprintln!("Error: Failed to save material: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Material(MaterialCommands::Bought {
            name,
            project,
            undo,
        })) => {
            let params = UpdateMaterialParameters {
                name,
                project,
                patch: MaterialPatch {
                    is_bought: Some(!undo),
                    ..MaterialPatch::default()
                },
            };

            match update_material(&mut store, &storage, params) {
                Ok(material) => {
                    if material.is_bought {
                        println!("✓ Bought: {}", material.name);
                    } else {
                        println!("✓ Back on the list: {}", material.name);
                    }
                }
                Err(UpdateMaterialError::MaterialNotFound(name)) => {
                    eprintln!("Error: Material '{}' not found", name);

                    if !store.materials.is_empty() {
                        eprintln!("\nAvailable materials:");
                        for material in &store.materials {
                            eprintln!("  - {}", material.name);
                        }
                    }
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::AmbiguousMaterialName(names)) => {
                    eprintln!("Error: Material name is ambiguous. Multiple materials found:");
                    for name in names {
                        eprintln!("  - {}", name);
                    }
                    eprintln!("\nNarrow it down with --project.");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::EmptyPatch) => {
                    eprintln!("Error: Nothing to change");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::Storage(e)) => {
                    eprintln!("Error: Failed to save material: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Material(MaterialCommands::Edit {
            name,
            project,
            rename,
            price,
            link,
        })) => {
            let params = UpdateMaterialParameters {
                name,
                project,
                patch: MaterialPatch {
                    name: rename,
                    price,
                    is_bought: None,
                    link,
                },
            };

            match update_material(&mut store, &storage, params) {
                Ok(material) => {
                    println!("✓ Material updated: {}", material.name);
                    if material.price > 0.0 {
                        println!("  {}", ui::format_price(material.price));
                    }
                }
                Err(UpdateMaterialError::MaterialNotFound(name)) => {
                    eprintln!("Error: Material '{}' not found", name);

                    if !store.materials.is_empty() {
                        eprintln!("\nAvailable materials:");
                        for material in &store.materials {
                            eprintln!("  - {}", material.name);
                        }
                    }
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::AmbiguousMaterialName(names)) => {
                    eprintln!("Error: Material name is ambiguous. Multiple materials found:");
                    for name in names {
                        eprintln!("  - {}", name);
                    }
                    eprintln!("\nNarrow it down with --project.");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::EmptyPatch) => {
                    eprintln!("Error: Nothing to change");
                    eprintln!("\nPass at least one of: --rename, --price, --link");
                    std::process::exit(1);
                }
                Err(UpdateMaterialError::Storage(e)) => {
                    eprintln!("Error: Failed to save material: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Material(MaterialCommands::Delete { name, project })) => {
            let params = DeleteMaterialParameters { name, project };

            match delete_material(&mut store, &storage, params) {
                Ok(material) => {
                    println!("✓ Material deleted: {}", material.name);
                }
                Err(DeleteMaterialError::MaterialNotFound(name)) => {
                    eprintln!("Error: Material '{}' not found", name);

                    if !store.materials.is_empty() {
                        eprintln!("\nAvailable materials:");
                        for material in &store.materials {
                            eprintln!("  - {}", material.name);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteMaterialError::AmbiguousMaterialName(names)) => {
                    eprintln!("Error: Material name is ambiguous. Multiple materials found:");
                    for name in names {
                        eprintln!("  - {}", name);
                    }
                    eprintln!("\nNarrow it down with --project.");
                    std::process::exit(1);
                }
                Err(DeleteMaterialError::ProjectNotFound(name)) => {
                    eprintln!("Error: Project '{}' not found", name);

                    if !store.projects.is_empty() {
                        eprintln!("\nAvailable projects:");
                        for project in &store.projects {
                            eprintln!("  - {}", project.title);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteMaterialError::AmbiguousProjectName(titles)) => {
                    eprintln!("Error: Project name is ambiguous. Multiple projects found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(DeleteMaterialError::Storage(e)) => {
                    eprintln!("Error: Failed to delete material: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Material(MaterialCommands::List)) => {
            if store.materials.is_empty() {
                println!("No materials yet");
            } else {
                ui::render_view_header("Materials", store.materials.len(), "material");

                // Group by project, in the order materials appear
                let mut group_order: Vec<Uuid> = Vec::new();
                for material in &store.materials {
                    if !group_order.contains(&material.project_id) {
                        group_order.push(material.project_id);
                    }
                }

                for project_id in group_order {
                    let title = store
                        .get_project(project_id)
                        .map(|p| p.title.clone())
                        .unwrap_or_else(|| String::from("Unknown Project"));

                    ui::render_section_header(&title);
                    for material in store.get_materials_for_project(project_id) {
                        ui::render_material_line(material);
                    }
                }

                ui::render_section_separator();
            }
        }
        Some(Commands::Shop { by_price }) => {
            let to_buy: Vec<_> = store.get_unbought_materials().collect();

            if to_buy.is_empty() {
                println!("Nothing on the shopping list");
            } else {
                ui::render_view_header("Shopping List", to_buy.len(), "item");

                if by_price {
                    // One flat list, most expensive first
                    let mut items = to_buy;
                    items.sort_by(|a, b| {
                        b.effective_price()
                            .partial_cmp(&a.effective_price())
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });

                    for material in items {
                        ui::render_material_line(material);
                    }
                } else {
                    // Group by project, in the order materials appear
                    let mut group_order: Vec<Uuid> = Vec::new();
                    for material in &to_buy {
                        if !group_order.contains(&material.project_id) {
                            group_order.push(material.project_id);
                        }
                    }

                    for project_id in group_order {
                        let title = store
                            .get_project(project_id)
                            .map(|p| p.title.clone())
                            .unwrap_or_else(|| String::from("Unknown Project"));

                        ui::render_section_header(&title);

                        let mut group_total = 0.0;
                        for material in to_buy.iter().filter(|m| m.project_id == project_id) {
                            ui::render_material_line(material);
                            group_total += material.effective_price();
                        }
                        println!("      {}", ui::format_price(group_total).dimmed());
                    }
                }

                println!(
                    "\n  {} {}",
                    "Total:".bold(),
                    ui::format_price(store.outstanding_cost()).bold()
                );
                ui::render_section_separator();
            }
        }
        Some(Commands::Explore { file, add }) => {
            let source = JsonFileSuggestionSource::new(file);

            let ideas = match source.suggestions(&store.projects) {
                Ok(ideas) => ideas,
                Err(SuggestionError::Unavailable(reason)) => {
                    eprintln!("Error: Suggestions are unavailable: {}", reason);
                    std::process::exit(1);
                }
                Err(SuggestionError::MalformedResponse(reason)) => {
                    eprintln!("Error: Could not read those suggestions: {}", reason);
                    std::process::exit(1);
                }
            };

            if ideas.is_empty() {
                println!("No ideas in that file");
            } else if let Some(pick) = add {
                // Fuzzy match to find the suggestion
                let matching: Vec<_> = ideas
                    .iter()
                    .filter(|s| s.title.to_lowercase().contains(&pick.to_lowercase()))
                    .collect();

                match matching.len() {
                    0 => {
                        eprintln!("Error: No suggestion matches '{}'", pick);
                        eprintln!("\nAvailable suggestions:");
                        for idea in &ideas {
                            eprintln!("  - {}", idea.title);
                        }
                        std::process::exit(1);
                    }
                    1 => match add_suggested_project(&mut store, &storage, matching[0]) {
                        Ok(project) => {
                            println!("✓ Project started: {}", project.title);
                            println!("  Category: {}", project.category);
                            println!("  Goal: {}", project.end_goal);
                        }
                        Err(AddSuggestedProjectError::Storage(e)) => {
                            eprintln!("Error: Failed to save project: {}", e);
                            std::process::exit(1);
                        }
                    },
                    _ => {
                        eprintln!("Error: Several suggestions match '{}':", pick);
                        for suggestion in matching {
                            eprintln!("  - {}", suggestion.title);
                        }
                        eprintln!("\nPlease be more specific.");
                        std::process::exit(1);
                    }
                }
            } else {
                ui::render_view_header("Explore", ideas.len(), "idea");

                for idea in &ideas {
                    println!(
                        "  {} {}  {}",
                        "•".green(),
                        idea.title.bold(),
                        ui::colored_difficulty(&idea.difficulty)
                    );
                    if !idea.description.is_empty() {
                        println!("    {}", idea.description.dimmed());
                    }

                    let mut meta: Vec<String> = Vec::new();
                    if !idea.estimated_cost.is_empty() {
                        meta.push(idea.estimated_cost.clone());
                    }
                    if !idea.tags.is_empty() {
                        meta.push(idea.tags.join(", "));
                    }
                    if !meta.is_empty() {
                        println!("    {}", meta.join(" · ").dimmed());
                    }
                    println!();
                }

                println!(
                    "  {}",
                    "Pick one up with: hobbyhop explore <file> --add <title>".dimmed()
                );
            }
        }
        Some(Commands::Export { out }) => {
            let out_dir = out.unwrap_or_else(|| PathBuf::from("."));

            match export_data(&store, &out_dir) {
                Ok(path) => {
                    println!(
                        "✓ Exported {} project(s) and {} material(s)",
                        store.projects.len(),
                        store.materials.len()
                    );
                    println!("  {}", path.display());
                }
                Err(ExportError::SerializeFailed(e)) => {
                    eprintln!("Error: Failed to serialize backup: {}", e);
                    std::process::exit(1);
                }
                Err(ExportError::WriteFailed { path, source }) => {
                    eprintln!("Error: Failed to write '{}': {}", path.display(), source);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Import { file }) => {
            let blob = match std::fs::read_to_string(&file) {
                Ok(blob) => blob,
                Err(e) => {
                    eprintln!("Error: Failed to read '{}': {}", file.display(), e);
                    std::process::exit(1);
                }
            };

            match import_data(&mut store, &storage, &blob) {
                Ok(summary) => {
                    println!(
                        "✓ Imported {} project(s) and {} material(s)",
                        summary.projects, summary.materials
                    );
                }
                Err(ImportError::ParseFailed(e)) => {
                    eprintln!("Error: That file is not valid JSON: {}", e);
                    eprintln!("\nNothing was changed.");
                    std::process::exit(1);
                }
                Err(ImportError::MissingCollection(key)) => {
                    eprintln!("Error: Backup has no '{}' list", key);
                    eprintln!(
                        "\nExpected a file produced by `hobbyhop export`. Nothing was changed."
                    );
                    std::process::exit(1);
                }
                Err(ImportError::InvalidShape(e)) => {
                    eprintln!("Error: Backup does not match the expected shape: {}", e);
                    eprintln!("\nNothing was changed.");
                    std::process::exit(1);
                }
                Err(ImportError::Storage(e)) => {
                    eprintln!("Error: Failed to save imported data: {}", e);
                    eprintln!("\nYour previous data is untouched.");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Tutorial) => {
            println!("\n  {}\n", "Welcome to hobbyhop!".cyan().bold());
            println!("  Track hobby projects, keep a journal, and never lose a shopping list.\n");
            println!("  {}", "Start a project".bold());
            println!("    hobbyhop add \"Birdhouse\" --category Woodworking\n");
            println!("  {}", "Keep a journal".bold());
            println!("    hobbyhop note birdhouse \"Cut all the side panels\"\n");
            println!("  {}", "Track materials".bold());
            println!("    hobbyhop material new birdhouse \"Cedar plank\" --price 12.50");
            println!("    hobbyhop material bought cedar\n");
            println!("  {}", "See where everything stands".bold());
            println!("    hobbyhop list");
            println!("    hobbyhop view birdhouse");
            println!("    hobbyhop shop\n");

            match complete_tutorial(&mut store, &storage) {
                Ok(_) => {}
                Err(CompleteTutorialError::Storage(e)) => {
                    eprintln!("Error: Failed to save: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // Default: show the project overview (same as `hobbyhop list`)
            if store.projects.is_empty() {
                println!("No projects yet. Start one with: hobbyhop add <title>");
            } else {
                ui::render_view_header("My Hobbies", store.projects.len(), "project");
                for project in &store.projects {
                    ui::render_project_line(project, &store);
                }
            }

            if !store.has_seen_tutorial {
                println!(
                    "\n  {}",
                    "New here? `hobbyhop tutorial` gives you a quick tour.".dimmed()
                );
            }
        }
    }
}
