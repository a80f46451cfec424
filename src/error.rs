use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template name must not be empty")]
    EmptyName,

    #[error("Message content must not be empty")]
    EmptyBody,

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config '{path}': {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recipient #{index} is not a JSON object")]
    InvalidRecipient { index: usize },
}

impl TemplateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
