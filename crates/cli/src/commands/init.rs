use anyhow::{Context, Result};
use prerender_kit_core::config::CONFIG_FILE;
use prerender_kit_core::{
    DEFAULT_BUILD_DIR, DEFAULT_FAVICON, DEFAULT_IMAGE_PREFIX, DEFAULT_METADATA, DEFAULT_TEMPLATE,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Escape a string for safe inclusion in a TOML basic string
///
/// The files are generated by hand rather than serialized so they can carry
/// explanatory comments.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Human title from a directory name: "growth-lab_tools" -> "Growth Lab Tools"
fn site_title(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let words: Vec<String> = name
        .split(['-', '_', ' ', '.'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "My Site".to_string()
    } else {
        words.join(" ")
    }
}

/// Scaffold a prerender project.
///
/// Writes `prerender.toml` with every option at its default and, unless one
/// already exists, a `metadata.toml` holding a single root route.
///
/// # Errors
///
/// Returns an error if prerender.toml already exists or a file cannot be
/// written.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("🎬 Initializing prerender project...");
    println!("   Path: {}", path.display());

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists in {}\nEdit it directly or remove it first",
            CONFIG_FILE,
            path.display()
        );
    }

    fs::write(&config_path, generate_prerender_toml()).context("Failed to write prerender.toml")?;
    println!("   ✓ Created {}", CONFIG_FILE);

    let metadata_path = path.join(DEFAULT_METADATA);
    if metadata_path.exists() {
        println!("   • Keeping existing {}", DEFAULT_METADATA);
    } else {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        fs::write(&metadata_path, generate_metadata_toml(&site_title(&canonical)))
            .context("Failed to write metadata.toml")?;
        println!("   ✓ Created {}", DEFAULT_METADATA);
    }

    println!();
    println!("✅ Project ready!");
    println!();
    println!("Next steps:");
    println!("   1. Build your site so {}/{} exists", DEFAULT_BUILD_DIR, DEFAULT_TEMPLATE);
    println!("   2. Add $OG_TITLE, $OG_DESCRIPTION and $OG_IMAGE to its <head>");
    println!("   3. Add a [[route]] to {} for every page", DEFAULT_METADATA);
    println!("   4. Run: prerender-kit validate {}", path.display());
    println!("   5. Run: prerender-kit prerender {}", path.display());

    Ok(())
}

fn generate_prerender_toml() -> String {
    format!(
        r#"# prerender-kit configuration
# Paths are relative to this file's directory.

# Directory produced by the front-end build; pages are written here
build_dir = "{build_dir}"

# Built page carrying the $OG_TITLE, $OG_DESCRIPTION and $OG_IMAGE tokens
template = "{template}"

# Route metadata table (.toml with [[route]] entries, or a .json array)
metadata = "{metadata}"

# URL prefix of social-preview images
image_prefix = "{image_prefix}"

# Favicon reference in the template that each route replaces
default_favicon = "{favicon}"

# HTML-escape titles and descriptions before inserting them
escape_html = false

# Write prerender-manifest.json listing every page and its checksum
write_manifest = true
"#,
        build_dir = DEFAULT_BUILD_DIR,
        template = DEFAULT_TEMPLATE,
        metadata = DEFAULT_METADATA,
        image_prefix = DEFAULT_IMAGE_PREFIX,
        favicon = DEFAULT_FAVICON,
    )
}

fn generate_metadata_toml(title: &str) -> String {
    format!(
        r#"# One [[route]] per page of the site.
# url "/" writes index.html; "/a/b" writes a-b.html.

[[route]]
url = "/"
title = "{title}"
description = "{description}"
og_image = "landing.png"
favicon = "{favicon}"
"#,
        title = toml_escape_string(title),
        description = toml_escape_string(&format!("{} home page", title)),
        favicon = DEFAULT_FAVICON,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use prerender_kit_core::config::{parse_metadata_toml_str, parse_prerender_toml_str};
    use prerender_kit_core::PrerenderConfig;
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"Say "hi""#), r#"Say \"hi\""#);
        assert_eq!(toml_escape_string("a\\b"), "a\\\\b");
        assert_eq!(toml_escape_string("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_site_title() {
        assert_eq!(site_title(Path::new("/work/growth-lab_tools")), "Growth Lab Tools");
        assert_eq!(site_title(Path::new("ALBANIA")), "Albania");
        assert_eq!(site_title(Path::new("/")), "My Site");
    }

    #[test]
    fn test_generated_config_matches_defaults() {
        let project = Path::new("proj");
        let config = parse_prerender_toml_str(&generate_prerender_toml(), project).unwrap();

        let expected = PrerenderConfig {
            build_dir: project.join(DEFAULT_BUILD_DIR),
            metadata: project.join(DEFAULT_METADATA),
            ..PrerenderConfig::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_generated_metadata_parses() {
        let table = parse_metadata_toml_str(&generate_metadata_toml("Say \"Growth\"")).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries[0].url, "/");
        assert_eq!(table.entries[0].title, "Say \"Growth\"");
        assert_eq!(table.entries[0].output_file_name(), "index.html");
    }

    #[tokio::test]
    async fn test_init_creates_files() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("growth-lab");

        run(project.clone()).await.unwrap();

        assert!(project.join(CONFIG_FILE).exists());
        let metadata = fs::read_to_string(project.join(DEFAULT_METADATA)).unwrap();
        assert!(metadata.contains("title = \"Growth Lab\""));
    }

    #[tokio::test]
    async fn test_init_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "build_dir = \"dist\"\n").unwrap();

        let err = run(dir.path().to_path_buf()).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            "build_dir = \"dist\"\n"
        );
    }

    #[tokio::test]
    async fn test_init_keeps_existing_metadata() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_METADATA), "# mine\n").unwrap();

        run(dir.path().to_path_buf()).await.unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(DEFAULT_METADATA)).unwrap(),
            "# mine\n"
        );
    }
}
