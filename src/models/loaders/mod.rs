pub mod catalog_loader;
pub mod dir_loader;

pub use catalog_loader::{load_catalog, parse_catalog, plan_downloads};
pub use dir_loader::{list_files, plan_extractions};
