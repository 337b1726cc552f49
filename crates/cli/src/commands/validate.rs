use prerender_kit_validator::validate_project;
use std::path::PathBuf;

use super::{ProjectOverrides, load_project};

pub async fn run(path: PathBuf, overrides: ProjectOverrides) -> anyhow::Result<()> {
    println!("Validating prerender project at: {}", path.display());

    let (config, table) = load_project(&path, &overrides)?;
    println!("✓ prerender.toml valid");
    println!("  Template: {}", config.template_path().display());
    println!("  Routes:   {}", table.len());

    let report = validate_project(&config, &table);

    for info in &report.info {
        println!("  ℹ {}", info);
    }
    for warning in &report.warnings {
        eprintln!("  ⚠ Warning: {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }

    if !report.is_valid() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✓ Ready to prerender ({} warning(s))", report.warnings.len());
    Ok(())
}
