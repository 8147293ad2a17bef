pub mod material;
pub mod project;
pub mod store;
