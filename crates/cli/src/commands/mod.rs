pub mod init;
pub mod prerender;
pub mod validate;

use anyhow::{Context, Result};
use clap::Args;
use prerender_kit_core::{MetadataTable, PrerenderConfig, load_metadata_table, load_project_config};
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over prerender.toml
#[derive(Args, Debug, Default, Clone)]
pub struct ProjectOverrides {
    /// Build output directory, relative to the project (overrides build_dir)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Metadata table file, .toml or .json, relative to the project (overrides metadata)
    #[arg(long)]
    pub metadata: Option<PathBuf>,
}

/// Resolve the configuration and load the metadata table for a project
pub fn load_project(path: &Path, overrides: &ProjectOverrides) -> Result<(PrerenderConfig, MetadataTable)> {
    if !path.is_dir() {
        anyhow::bail!("Project directory does not exist: {}", path.display());
    }

    let mut config = load_project_config(path).context("Failed to parse prerender.toml")?;
    if let Some(build_dir) = &overrides.build_dir {
        config.build_dir = project_relative(path, build_dir);
    }
    if let Some(metadata) = &overrides.metadata {
        config.metadata = project_relative(path, metadata);
    }

    let table = load_metadata_table(&config.metadata).with_context(|| {
        format!("Failed to load metadata table {}", config.metadata.display())
    })?;

    Ok((config, table))
}

/// Relative overrides resolve like the same keys in prerender.toml
fn project_relative(project: &Path, value: &Path) -> PathBuf {
    if value.is_relative() {
        project.join(value)
    } else {
        value.to_path_buf()
    }
}
