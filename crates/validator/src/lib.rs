// Dry-run checks of a prerender project: template, metadata table, assets

use prerender_kit_core::{MetadataTable, PrerenderConfig};
use prerender_kit_generator::{RenderOptions, Template, find_collisions};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Smallest width/height link unfurlers reliably accept for a preview image
pub const MIN_PREVIEW_IMAGE_SIDE: u32 = 200;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check everything a prerender run depends on without writing anything.
///
/// Errors are conditions that would make a run fail or clobber output;
/// warnings are pages that would be written but likely unfurl badly.
pub fn validate_project(config: &PrerenderConfig, table: &MetadataTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_template(config, &mut report);
    check_entries(config, table, &mut report);

    for collision in find_collisions(table) {
        report.errors.push(format!("Output collision: {}", collision));
    }

    check_images(config, table, &mut report);

    report.info.push(format!("{} route(s) in metadata table", table.len()));
    report
}

fn check_template(config: &PrerenderConfig, report: &mut ValidationReport) {
    let options = RenderOptions::from_config(config);
    if let Err(err) = Template::load(config.template_path(), &options) {
        report.errors.push(err.to_string());
    }
}

fn check_entries(config: &PrerenderConfig, table: &MetadataTable, report: &mut ValidationReport) {
    if table.is_empty() {
        report
            .warnings
            .push("Metadata table is empty; nothing would be written".to_string());
    }

    for entry in table {
        if !entry.url.starts_with('/') {
            report
                .errors
                .push(format!("Route '{}': url must start with '/'", entry.url));
        }
        if entry.url.len() > 1 && entry.url.ends_with('/') {
            report.warnings.push(format!(
                "Route '{}': trailing slash produces {}",
                entry.url,
                entry.output_file_name()
            ));
        }
        if entry.title.trim().is_empty() {
            report
                .errors
                .push(format!("Route '{}': title is empty", entry.url));
        }
        if entry.description.trim().is_empty() {
            report
                .warnings
                .push(format!("Route '{}': description is empty", entry.url));
        }
        if let Some(favicon) = local_asset(&entry.favicon)
            && !config.build_dir.join(favicon).is_file()
        {
            report.warnings.push(format!(
                "Route '{}': favicon {} not found in build directory",
                entry.url, entry.favicon
            ));
        }
    }
}

/// Build-relative path of a site-relative asset reference, if it is one
fn local_asset(reference: &str) -> Option<&str> {
    if reference.starts_with("//") || !reference.starts_with('/') {
        return None;
    }
    Some(reference.trim_start_matches('/'))
}

fn check_images(config: &PrerenderConfig, table: &MetadataTable, report: &mut ValidationReport) {
    let image_dir = config.image_dir();
    let referenced: BTreeSet<&str> = table.iter().map(|e| e.og_image.as_str()).collect();

    for name in &referenced {
        if leaves_dir(name) {
            report.warnings.push(format!(
                "Preview image {} points outside {}; not checked",
                name,
                image_dir.display()
            ));
            continue;
        }

        let path = image_dir.join(name);
        if !path.is_file() {
            report.warnings.push(format!(
                "Preview image {}{} not found in {}",
                config.image_prefix,
                name,
                image_dir.display()
            ));
            continue;
        }

        match image::image_dimensions(&path) {
            Ok((width, height))
                if width < MIN_PREVIEW_IMAGE_SIDE || height < MIN_PREVIEW_IMAGE_SIDE =>
            {
                report.warnings.push(format!(
                    "Preview image {} is {}x{}; link previews need at least {}x{}",
                    name, width, height, MIN_PREVIEW_IMAGE_SIDE, MIN_PREVIEW_IMAGE_SIDE
                ));
            }
            Ok(_) => {}
            Err(err) => report
                .warnings
                .push(format!("Preview image {} could not be read: {}", name, err)),
        }
    }

    for unused in unreferenced_images(&image_dir, &referenced) {
        report
            .info
            .push(format!("Preview image {} is not used by any route", unused));
    }
}

/// True for absolute names and names that climb with `..`
fn leaves_dir(name: &str) -> bool {
    let path = Path::new(name);
    path.is_absolute() || path.components().any(|c| c == Component::ParentDir)
}

/// Files under the image directory that no route points at
fn unreferenced_images(image_dir: &Path, referenced: &BTreeSet<&str>) -> Vec<String> {
    if !image_dir.is_dir() {
        return Vec::new();
    }

    let mut unused: Vec<String> = WalkDir::new(image_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let relative = e.path().strip_prefix(image_dir).ok()?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            (!name.starts_with('.') && !referenced.contains(name.as_str())).then_some(name)
        })
        .collect();
    unused.sort();
    unused
}
