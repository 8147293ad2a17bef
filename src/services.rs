pub mod backup;
pub mod materials;
pub mod projects;
pub mod suggestions;
pub mod tutorial;
