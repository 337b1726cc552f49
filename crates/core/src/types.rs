use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Token replaced with the route title
pub const TITLE_PLACEHOLDER: &str = "$OG_TITLE";
/// Token replaced with the route description
pub const DESCRIPTION_PLACEHOLDER: &str = "$OG_DESCRIPTION";
/// Token replaced with the social-preview image URL
pub const IMAGE_PLACEHOLDER: &str = "$OG_IMAGE";

pub const DEFAULT_IMAGE_PREFIX: &str = "/og-images/";
pub const DEFAULT_FAVICON: &str = "/favicon.svg";
pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_TEMPLATE: &str = "index.html";
pub const DEFAULT_METADATA: &str = "metadata.toml";

/// Output name reserved for the root route
pub const INDEX_FILE: &str = "index.html";

/// Social/SEO metadata for one route of the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Site-relative path, always starting with `/`
    pub url: String,
    pub title: String,
    pub description: String,
    /// File name under the image prefix directory
    pub og_image: String,
    pub favicon: String,
}

impl MetadataEntry {
    /// Name of the static HTML file this route is written to.
    ///
    /// The root route maps to `index.html`. Every other route drops its
    /// leading slash, turns the remaining slashes into hyphens, and gets an
    /// `.html` suffix: `/namibia/industry/123` -> `namibia-industry-123.html`.
    pub fn output_file_name(&self) -> String {
        let stripped = self.url.strip_prefix('/').unwrap_or(&self.url);
        if stripped.is_empty() {
            INDEX_FILE.to_string()
        } else {
            format!("{}.html", stripped.replace('/', "-"))
        }
    }
}

/// Ordered route-to-metadata table, read-only for the duration of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataTable {
    #[serde(default, rename = "route")]
    pub entries: Vec<MetadataEntry>,
}

impl MetadataTable {
    pub fn new(entries: Vec<MetadataEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MetadataTable {
    type Item = &'a MetadataEntry;
    type IntoIter = std::slice::Iter<'a, MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Resolved project configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerenderConfig {
    /// Directory holding the built site; outputs are written here
    pub build_dir: PathBuf,
    /// Template file inside `build_dir`
    pub template: PathBuf,
    /// Metadata table file (`.toml` or `.json`)
    pub metadata: PathBuf,
    pub image_prefix: String,
    /// Favicon reference in the template that each route overrides
    pub default_favicon: String,
    /// HTML-escape titles and descriptions before substitution
    pub escape_html: bool,
    pub write_manifest: bool,
}

impl PrerenderConfig {
    /// Full path of the template file
    pub fn template_path(&self) -> PathBuf {
        self.build_dir.join(&self.template)
    }

    /// Directory social-preview images are served from, on disk
    pub fn image_dir(&self) -> PathBuf {
        self.build_dir.join(self.image_prefix.trim_matches('/'))
    }
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            metadata: PathBuf::from(DEFAULT_METADATA),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            default_favicon: DEFAULT_FAVICON.to_string(),
            escape_html: false,
            write_manifest: true,
        }
    }
}
