use prerender_kit_core::{
    DESCRIPTION_PLACEHOLDER, IMAGE_PLACEHOLDER, MetadataEntry, PrerenderConfig,
    TITLE_PLACEHOLDER,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Why a template was not accepted
#[derive(Debug)]
pub enum TemplateError {
    Read { path: PathBuf, source: std::io::Error },
    MissingPlaceholder { path: PathBuf, missing: Vec<String> },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Read { path, source } => {
                write!(f, "Failed to read template {}: {}", path.display(), source)
            }
            TemplateError::MissingPlaceholder { path, missing } => write!(
                f,
                "Template {} is missing placeholder(s): {}",
                path.display(),
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Read { source, .. } => Some(source),
            TemplateError::MissingPlaceholder { .. } => None,
        }
    }
}

/// How metadata values are placed into the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub image_prefix: String,
    pub default_favicon: String,
    pub escape_html: bool,
}

impl RenderOptions {
    pub fn from_config(config: &PrerenderConfig) -> Self {
        Self {
            image_prefix: config.image_prefix.clone(),
            default_favicon: config.default_favicon.clone(),
            escape_html: config.escape_html,
        }
    }

    fn placeholders(&self) -> [&str; 4] {
        [
            TITLE_PLACEHOLDER,
            DESCRIPTION_PLACEHOLDER,
            IMAGE_PLACEHOLDER,
            self.default_favicon.as_str(),
        ]
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&PrerenderConfig::default())
    }
}

/// Built HTML document carrying the placeholder tokens.
///
/// The text is read once and shared between renders; cloning a `Template`
/// only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    text: Arc<str>,
}

impl Template {
    /// Read and check a template file.
    pub fn load<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(path, text, options)
    }

    /// Accept template text only if every placeholder is present, so a
    /// misconfigured build fails instead of silently emitting generic pages.
    pub fn from_text(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        options: &RenderOptions,
    ) -> Result<Self, TemplateError> {
        let path = path.into();
        let text = text.into();

        let missing: Vec<String> = options
            .placeholders()
            .iter()
            .filter(|token| !text.contains(*token))
            .map(|token| token.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::MissingPlaceholder { path, missing });
        }

        Ok(Self {
            path,
            text: Arc::from(text),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute one route's metadata into a fresh copy of the template.
    ///
    /// Replacements run in a fixed order on the running result: title,
    /// description, image, then favicon. Values are inserted literally.
    pub fn render(&self, entry: &MetadataEntry, options: &RenderOptions) -> String {
        let (title, description) = if options.escape_html {
            (html_escape(&entry.title), html_escape(&entry.description))
        } else {
            (entry.title.clone(), entry.description.clone())
        };
        let image = format!("{}{}", options.image_prefix, entry.og_image);

        self.text
            .replace(TITLE_PLACEHOLDER, &title)
            .replace(DESCRIPTION_PLACEHOLDER, &description)
            .replace(IMAGE_PLACEHOLDER, &image)
            .replace(&options.default_favicon, &entry.favicon)
    }
}

/// HTML-escape a string for use inside text or attribute values
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
