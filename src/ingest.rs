//! Issue ingestion — turns an issue event into a publish or remove action.
//!
//! Generator definitions are written by users as a fenced TOML block inside
//! an issue body. Only issues carrying the generator label are published.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::schema::config::{ConfigError, GeneratorConfig};

const BLOCK_OPEN: &str = "```toml";
const BLOCK_CLOSE: &str = "```";

/// Label marking an issue as a generator definition.
pub const DEFAULT_LABEL: &str = "generator";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot find toml code block in issue body")]
    MissingDefinitionBlock,
    #[error("invalid generator definition: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid event payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub title: String,
    pub number: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
}

impl Issue {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.name == label)
    }

    /// Identifier the published page is addressed by.
    pub fn page_id(&self) -> String {
        self.number.to_string()
    }
}

/// The subset of an issue webhook payload we act on.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    pub action: String,
    pub issue: Issue,
}

impl IssueEvent {
    pub fn from_json_str(input: &str) -> Result<IssueEvent, IngestError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<IssueEvent, IngestError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// What the publisher should do for an event.
#[derive(Debug, Clone)]
pub enum IngestAction {
    /// Write (or overwrite) the page for this definition.
    Publish(GeneratorConfig),
    /// Remove the page with this id.
    Remove(String),
    /// Nothing to do.
    Skip,
}

/// The text of the first fenced TOML block in `body`.
pub fn extract_definition(body: &str) -> Result<&str, IngestError> {
    let begin = body
        .find(BLOCK_OPEN)
        .ok_or(IngestError::MissingDefinitionBlock)?
        + BLOCK_OPEN.len();
    let len = body[begin..]
        .find(BLOCK_CLOSE)
        .ok_or(IngestError::MissingDefinitionBlock)?;
    Ok(&body[begin..begin + len])
}

/// Decide what to do with `event`, treating issues labelled `label` as
/// generator definitions.
pub fn plan(event: &IssueEvent, label: &str) -> Result<IngestAction, IngestError> {
    let issue = &event.issue;

    match event.action.as_str() {
        "opened" | "edited" | "reopened" | "labeled" => {
            let definition = extract_definition(issue.body.as_deref().unwrap_or_default())?;
            if !issue.has_label(label) {
                tracing::info!(issue = issue.number, "not a generator issue, skipping");
                return Ok(IngestAction::Skip);
            }

            let mut config = GeneratorConfig::from_toml_str(definition)?;
            config.name = issue.title.clone();
            config.id = issue.page_id();
            config.validate()?;
            Ok(IngestAction::Publish(config))
        }
        "deleted" | "closed" | "unlabeled" => {
            if event.action == "unlabeled" && issue.has_label(label) {
                tracing::info!(issue = issue.number, "still a generator issue, skipping");
                return Ok(IngestAction::Skip);
            }
            Ok(IngestAction::Remove(issue.page_id()))
        }
        other => {
            tracing::debug!(action = other, "ignoring issue action");
            Ok(IngestAction::Skip)
        }
    }
}
