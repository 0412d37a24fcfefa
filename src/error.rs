// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error: {source} (path: {})", .path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Python grammar rejected by tree-sitter: {0}")]
    Grammar(String),

    #[error("Parse failed: {0}")]
    Parse(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

// Allow `?` on std::io::Error by converting to ProbeError::Io with unknown path.
impl From<std::io::Error> for ProbeError {
    fn from(source: std::io::Error) -> Self {
        ProbeError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for ProbeError {
    fn from(e: walkdir::Error) -> Self {
        ProbeError::Config(e.to_string())
    }
}

impl From<toml::de::Error> for ProbeError {
    fn from(e: toml::de::Error) -> Self {
        ProbeError::Config(e.to_string())
    }
}

impl ProbeError {
    /// Attaches a concrete path to a bare I/O error.
    #[must_use]
    pub fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            ProbeError::Io { source, .. } => ProbeError::Io {
                source,
                path: path.to_path_buf(),
            },
            other => other,
        }
    }
}
