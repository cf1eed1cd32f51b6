pub mod filename;
pub mod fs;
pub mod logging;

pub use filename::{extension_from_url, sanitize_filename, validate_reference};
