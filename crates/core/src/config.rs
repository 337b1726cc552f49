use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "prerender.toml";

/// Raw TOML configuration structure
/// This matches the prerender.toml file structure exactly; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    build_dir: Option<String>,
    template: Option<String>,
    metadata: Option<String>,
    image_prefix: Option<String>,
    default_favicon: Option<String>,
    escape_html: Option<bool>,
    write_manifest: Option<bool>,
}

/// Load the configuration for a project directory.
///
/// A missing `prerender.toml` yields the defaults. Relative paths in the file
/// are resolved against `project_dir`.
pub fn load_project_config<P: AsRef<Path>>(project_dir: P) -> Result<PrerenderConfig> {
    let project_dir = project_dir.as_ref();
    let config_path = project_dir.join(CONFIG_FILE);

    let raw = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        RawConfig::default()
    };

    resolve(raw, project_dir)
}

/// Parse prerender.toml from a string (useful for testing)
pub fn parse_prerender_toml_str(content: &str, project_dir: &Path) -> Result<PrerenderConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    resolve(raw, project_dir)
}

fn resolve(raw: RawConfig, project_dir: &Path) -> Result<PrerenderConfig> {
    let defaults = PrerenderConfig::default();

    let build_dir = match raw.build_dir {
        Some(dir) => project_dir.join(validate_path(&dir, "build_dir")?),
        None => project_dir.join(&defaults.build_dir),
    };
    let template = match raw.template {
        Some(template) => validate_path(&template, "template")?,
        None => defaults.template,
    };
    let metadata = match raw.metadata {
        Some(metadata) => project_dir.join(validate_path(&metadata, "metadata")?),
        None => project_dir.join(&defaults.metadata),
    };

    let image_prefix = raw.image_prefix.unwrap_or(defaults.image_prefix);
    if !image_prefix.starts_with('/') || !image_prefix.ends_with('/') {
        return Err(Error::ConfigParse(format!(
            "image_prefix must start and end with '/': '{}'",
            image_prefix
        )));
    }

    let default_favicon = raw.default_favicon.unwrap_or(defaults.default_favicon);
    if default_favicon.trim().is_empty() {
        return Err(Error::ConfigParse(
            "default_favicon must not be empty".to_string(),
        ));
    }

    Ok(PrerenderConfig {
        build_dir,
        template,
        metadata,
        image_prefix,
        default_favicon,
        escape_html: raw.escape_html.unwrap_or(defaults.escape_html),
        write_manifest: raw.write_manifest.unwrap_or(defaults.write_manifest),
    })
}

/// Load the metadata table from a `.toml` or `.json` file.
///
/// TOML tables list routes as `[[route]]` entries; JSON files hold a bare
/// array of entry objects.
pub fn load_metadata_table<P: AsRef<Path>>(path: P) -> Result<MetadataTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_metadata_toml_str(&content),
        Some("json") => parse_metadata_json_str(&content),
        _ => Err(Error::ConfigParse(format!(
            "Unsupported metadata table format: {} (expected .toml or .json)",
            path.display()
        ))),
    }
}

pub fn parse_metadata_toml_str(content: &str) -> Result<MetadataTable> {
    let table: MetadataTable = toml::from_str(content)?;
    check_entries(&table)?;
    Ok(table)
}

pub fn parse_metadata_json_str(content: &str) -> Result<MetadataTable> {
    let entries: Vec<MetadataEntry> = serde_json::from_str(content)?;
    let table = MetadataTable::new(entries);
    check_entries(&table)?;
    Ok(table)
}

/// Reject entries whose url cannot name a route
fn check_entries(table: &MetadataTable) -> Result<()> {
    for (index, entry) in table.iter().enumerate() {
        if !entry.url.starts_with('/') {
            return Err(Error::InvalidData(format!(
                "route #{} url must start with '/': '{}'",
                index + 1,
                entry.url
            )));
        }
    }
    Ok(())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so a
/// project file cannot point reads or writes outside the project directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_path_valid_relative() {
        assert!(validate_path("build", "build_dir").is_ok());
        assert!(validate_path("dist/site", "build_dir").is_ok());
        assert!(validate_path("src/metadata.json", "metadata").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_absolute_unix() {
        let result = validate_path("/etc/passwd", "template");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Absolute paths not allowed")
        );
    }

    #[test]
    fn test_validate_path_rejects_parent_dir() {
        let result = validate_path("../build", "build_dir");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );

        assert!(validate_path("build/../../secret", "build_dir").is_err());
    }

    #[test]
    fn test_validate_path_rejects_empty() {
        let result = validate_path("  ", "metadata");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty path"));
    }

    #[test]
    fn test_defaults_when_config_missing() {
        let dir = TempDir::new().unwrap();
        let config = load_project_config(dir.path()).unwrap();

        assert_eq!(config.build_dir, dir.path().join("build"));
        assert_eq!(config.template_path(), dir.path().join("build/index.html"));
        assert_eq!(config.metadata, dir.path().join("metadata.toml"));
        assert_eq!(config.image_prefix, "/og-images/");
        assert_eq!(config.default_favicon, "/favicon.svg");
        assert!(!config.escape_html);
        assert!(config.write_manifest);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
build_dir = "dist"
template = "shell.html"
metadata = "src/metadata.json"
image_prefix = "/social/"
default_favicon = "/icon.png"
escape_html = true
write_manifest = false
        "#;

        let config = parse_prerender_toml_str(toml, Path::new("proj")).unwrap();
        assert_eq!(config.build_dir, PathBuf::from("proj/dist"));
        assert_eq!(config.template_path(), PathBuf::from("proj/dist/shell.html"));
        assert_eq!(config.metadata, PathBuf::from("proj/src/metadata.json"));
        assert_eq!(config.image_prefix, "/social/");
        assert_eq!(config.default_favicon, "/icon.png");
        assert!(config.escape_html);
        assert!(!config.write_manifest);
    }

    #[test]
    fn test_config_rejects_unknown_key() {
        let result = parse_prerender_toml_str("buld_dir = \"x\"", Path::new("."));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_bad_image_prefix() {
        let result = parse_prerender_toml_str("image_prefix = \"og-images\"", Path::new("."));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("image_prefix"));
    }

    #[test]
    fn test_config_rejects_traversal_in_build_dir() {
        let result = parse_prerender_toml_str("build_dir = \"../../tmp\"", Path::new("."));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_metadata_toml() {
        let toml = r#"
[[route]]
url = "/"
title = "Growth Lab Tools"
description = "Interactive economic complexity tools"
og_image = "landing.png"
favicon = "/favicon.svg"

[[route]]
url = "/albania-tool"
title = "Albania Tool"
description = "Industry targeting for Albania"
og_image = "albania.png"
favicon = "/albania-favicon.svg"
        "#;

        let table = parse_metadata_toml_str(toml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries[1].url, "/albania-tool");
        assert_eq!(table.entries[1].og_image, "albania.png");
    }

    #[test]
    fn test_parse_metadata_json() {
        let json = r#"[
            {"url": "/namibia/industry/123", "title": "Namibia", "description": "D",
             "og_image": "namibia.png", "favicon": "/n.svg"}
        ]"#;

        let table = parse_metadata_json_str(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries[0].title, "Namibia");
    }

    #[test]
    fn test_parse_metadata_rejects_relative_url() {
        let json = r#"[{"url": "albania", "title": "A", "description": "D",
                        "og_image": "a.png", "favicon": "/a.svg"}]"#;

        let result = parse_metadata_json_str(json);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("route #1"));
        assert!(message.contains("albania"));
    }

    #[test]
    fn test_parse_metadata_rejects_missing_field() {
        let toml = r#"
[[route]]
url = "/"
title = "T"
        "#;
        assert!(parse_metadata_toml_str(toml).is_err());
    }

    #[test]
    fn test_load_metadata_table_by_extension() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("metadata.json");
        fs::write(
            &json_path,
            r#"[{"url": "/", "title": "T", "description": "D", "og_image": "i.png", "favicon": "/f.svg"}]"#,
        )
        .unwrap();
        assert_eq!(load_metadata_table(&json_path).unwrap().len(), 1);

        let yaml_path = dir.path().join("metadata.yaml");
        fs::write(&yaml_path, "- url: /").unwrap();
        let result = load_metadata_table(&yaml_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unsupported"));
    }
}
