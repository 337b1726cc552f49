use anyhow::{Context, Result};
use prerender_kit_generator::{
    FsSink, MANIFEST_FILE, PageStatus, Prerenderer, RenderOptions, Template, plan, write_manifest,
};
use std::path::PathBuf;
use std::sync::Arc;

use super::{ProjectOverrides, load_project};

/// Rewrite the built template into one static HTML file per route.
///
/// The template is read and checked before anything is written; a missing
/// template, a missing placeholder or two routes sharing an output file stop
/// the run with nothing written. A page that fails to write is reported and
/// the remaining pages are still written, but the command exits with an
/// error so CI notices the gap.
pub async fn run(path: PathBuf, overrides: ProjectOverrides, dry_run: bool) -> Result<()> {
    println!("🔨 Begin prerender of HTML pages");

    let (config, table) = load_project(&path, &overrides)?;
    println!("   Build:    {}", config.build_dir.display());
    println!("   Metadata: {} ({} routes)", config.metadata.display(), table.len());
    println!();

    let options = RenderOptions::from_config(&config);
    let template = Template::load(config.template_path(), &options)
        .context("Template cannot be prerendered")?;
    println!("📄 Read in {}", template.path().display());

    let plan = plan(&table).context("Metadata table cannot be prerendered")?;
    let prerenderer = Prerenderer::new(template, options);

    if dry_run {
        println!("🔍 Dry run, nothing will be written:");
        for page in prerenderer.render_all(&plan) {
            println!("   • {} -> {} ({} bytes)", page.url, page.file_name, page.html.len());
        }
        return Ok(());
    }

    println!("✍️  Writing {} pages...", plan.len());
    let sink = Arc::new(FsSink::new(&config.build_dir));
    let report = prerenderer.write_all(&plan, Arc::clone(&sink)).await;

    for page in &report.pages {
        match &page.status {
            PageStatus::Saved => println!("   ✓ Saved {}", page.file_name),
            PageStatus::Failed(err) => eprintln!("   ✗ Failed {}: {}", page.file_name, err),
        }
    }

    let mut manifest_failed = false;
    if config.write_manifest {
        match write_manifest(&report, sink.as_ref()).await {
            Ok(()) => println!("   ✓ Saved {}", MANIFEST_FILE),
            Err(err) => {
                eprintln!("   ✗ Failed {}: {}", MANIFEST_FILE, err);
                manifest_failed = true;
            }
        }
    }

    println!();
    let failed = report.pages.len() - report.saved_count();
    if failed > 0 || manifest_failed {
        anyhow::bail!(
            "{} of {} pages failed to write{}",
            failed,
            report.pages.len(),
            if manifest_failed { " (manifest not written)" } else { "" }
        );
    }

    println!("✅ Prerender complete!");
    println!("   {} pages in {}", report.saved_count(), config.build_dir.display());

    Ok(())
}
