//! Schema catalog: persisted, deduplicated collection of table schemas.

#[allow(clippy::module_inception)]
mod catalog;
mod io_utils;
mod schema;

pub use catalog::{Inserted, SchemaCatalog};
pub use io_utils::{backup_path, classify_io_error, read_file, retry_io_operation};
pub use schema::{Schema, SchemaLayout};
