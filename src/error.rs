//! Error types shared across the dashboard.
//!
//! Only [`ConfigError`] is fatal; template and executor errors are recovered inside
//! the event loop and shown as the inline status message.

use std::path::PathBuf;

use thiserror::Error;

use crate::templates::Namespace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("no command template named '{0}'")]
    UnknownTemplate(String),
    #[error("'{template}' needs a selected {namespace}")]
    MissingBinding {
        template: String,
        namespace: Namespace,
    },
    #[error("'{template}' uses unknown placeholder '{token}'")]
    UnknownPlaceholder { template: String, token: String },
    #[error("'{template}' has an unterminated '{{{{' at byte {offset}")]
    Unterminated { template: String, offset: usize },
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("terminal handoff failed: {0}")]
    Terminal(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
