pub mod config;
pub mod error;
pub mod types;

pub use config::{load_metadata_table, load_project_config};
pub use error::{Error, Result};
pub use types::*;
