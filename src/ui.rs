use colored::*;

use crate::models::{
    material::Material,
    project::{Project, ProjectStatus},
    store::Store,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a project
pub fn get_status_glyph(project: &Project) -> ColoredString {
    match project.status {
        ProjectStatus::Planned => "○".normal(),
        ProjectStatus::InProgress => "◐".blue(),
        ProjectStatus::Completed => "✓".green(),
    }
}

/// Human label for a status ("in_progress" reads as "in progress")
pub fn status_label(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planned => "planned",
        ProjectStatus::InProgress => "in progress",
        ProjectStatus::Completed => "completed",
    }
}

/// Build the context string for a project line: category plus note and
/// material counts. Returns None when there is nothing worth showing.
pub fn get_project_context(project: &Project, store: &Store) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if !project.category.is_empty() {
        parts.push(project.category.clone());
    }

    let note_count = project.notes.len();
    if note_count == 1 {
        parts.push("1 note".to_string());
    } else if note_count > 1 {
        parts.push(format!("{} notes", note_count));
    }

    let material_count = store.get_materials_for_project(project.id).count();
    if material_count == 1 {
        parts.push("1 material".to_string());
    } else if material_count > 1 {
        parts.push(format!("{} materials", material_count));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

/// Render a single project line with glyph, title, progress, and
/// right-aligned context
pub fn render_project_line(project: &Project, store: &Store) {
    let terminal_width = get_terminal_width();

    let glyph = get_status_glyph(project);
    let title = &project.title;
    let progress = format!("{}%", project.progress);

    let context = get_project_context(project, store);

    let left_section = format!("  {}  {}  {}", glyph, title, progress.dimmed());

    let styled_left = if project.status == ProjectStatus::Completed {
        left_section.dimmed()
    } else {
        left_section.normal()
    };

    if let Some(right_section) = context {
        let right_dimmed = right_section.dimmed();

        // Measure without ANSI codes: rebuild the left side plain
        let left_visible_len = format!("  {}  {}  {}", " ", title, progress).len();
        let right_visible_len = right_section.chars().count();

        let total_content = left_visible_len + right_visible_len;

        if total_content + 4 < terminal_width {
            let padding = terminal_width - total_content - 2;
            println!("{}{}{}", styled_left, " ".repeat(padding), right_dimmed);
        } else {
            // Not enough space for right alignment, just print normally
            println!("{}", styled_left);
        }
    } else {
        println!("{}", styled_left);
    }
}

/// Render a single material line with a bought glyph, name and price
pub fn render_material_line(material: &Material) {
    let glyph = if material.is_bought {
        "✓".green()
    } else {
        "○".normal()
    };

    let price = format_price(material.effective_price());

    if material.is_bought {
        println!(
            "  {}  {}  {}",
            glyph,
            material.name.dimmed(),
            price.dimmed()
        );
    } else {
        println!("  {}  {}  {}", glyph, material.name, price.dimmed());
    }

    if let Some(link) = &material.link {
        println!("      {}", link.dimmed());
    }
}

/// Format a note timestamp for display (e.g., "Feb 15", "Today", "Yesterday")
pub fn format_note_date(timestamp: jiff::Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let date = zoned.date();
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if today
        .yesterday()
        .map(|yesterday| date == yesterday)
        .unwrap_or(false)
    {
        "Yesterday".to_string()
    } else {
        // Format as "Feb 15"
        date.strftime("%b %d").to_string()
    }
}

/// Format a price the way the shopping list shows it, two decimals
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Color a difficulty label: beginner green, intermediate yellow,
/// advanced red. Unknown labels pass through unstyled.
pub fn colored_difficulty(difficulty: &str) -> ColoredString {
    let d = difficulty.to_lowercase();
    if d.contains("beginner") {
        difficulty.green()
    } else if d.contains("intermediate") {
        difficulty.yellow()
    } else if d.contains("advanced") {
        difficulty.red()
    } else {
        difficulty.normal()
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, noun: &str) {
    let word = if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

/// Render a section header (e.g., "Notes", "Materials")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render a section separator
pub fn render_section_separator() {
    println!();
}
