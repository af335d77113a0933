//! Page publishing — writes and removes the static page for a generator.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::substitute::escape_html;
use crate::schema::config::{ConfigError, GeneratorConfig};

/// Page skeleton. `{{TITLE}}` and `{{CONFIG_JSON}}` are filled in per generator.
const PAGE_TEMPLATE: &str = include_str!("../assets/page.html");

const TITLE_SLOT: &str = "{{TITLE}}";
const CONFIG_SLOT: &str = "{{CONFIG_JSON}}";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid page id '{0}'")]
    InvalidId(String),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes one artifact per generator, addressed by a stable id.
pub trait Publisher {
    /// Write (or overwrite) the artifact for `config`. Returns where it went.
    fn publish(&self, config: &GeneratorConfig, id: &str) -> Result<PathBuf, PublishError>;

    /// Remove the artifact previously written for `id`.
    fn remove(&self, id: &str) -> Result<(), PublishError>;
}

/// Publishes generators as `<out_dir>/<id>.html`.
#[derive(Debug, Clone)]
pub struct PagePublisher {
    out_dir: PathBuf,
}

impl PagePublisher {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of the page for `id`. Ids are restricted to a single path
    /// component so a page can never land outside `out_dir`.
    pub fn page_path(&self, id: &str) -> Result<PathBuf, PublishError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PublishError::InvalidId(id.to_string()));
        }
        Ok(self.out_dir.join(format!("{}.html", id)))
    }
}

/// Fill the page template for `config`.
///
/// Both slots are filled in a single pass over the template, so text from one
/// value is never scanned for the other slot.
pub fn render_page(config: &GeneratorConfig) -> Result<String, PublishError> {
    let title = escape_html(&config.name);
    let json = script_safe_json(&config.to_json()?);

    let mut page = String::with_capacity(PAGE_TEMPLATE.len() + json.len());
    let mut rest = PAGE_TEMPLATE;
    while let Some(start) = rest.find("{{") {
        page.push_str(&rest[..start]);
        let tail = &rest[start..];
        if tail.starts_with(TITLE_SLOT) {
            page.push_str(&title);
            rest = &tail[TITLE_SLOT.len()..];
        } else if tail.starts_with(CONFIG_SLOT) {
            page.push_str(&json);
            rest = &tail[CONFIG_SLOT.len()..];
        } else {
            page.push_str("{{");
            rest = &tail[2..];
        }
    }
    page.push_str(rest);
    Ok(page)
}

/// JSON that can sit inside a `<script>` element. `<` only occurs inside
/// strings, where `\u003c` decodes to the same character.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

impl Publisher for PagePublisher {
    fn publish(&self, config: &GeneratorConfig, id: &str) -> Result<PathBuf, PublishError> {
        let path = self.page_path(id)?;
        let page = render_page(config)?;
        std::fs::write(&path, page).map_err(|source| PublishError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(id, path = %path.display(), "published generator page");
        Ok(path)
    }

    fn remove(&self, id: &str) -> Result<(), PublishError> {
        let path = self.page_path(id)?;
        std::fs::remove_file(&path).map_err(|source| PublishError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(id, path = %path.display(), "removed generator page");
        Ok(())
    }
}
