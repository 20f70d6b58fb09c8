use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("'{path}' - cannot open {what} file: {source}")]
    Open {
        path: PathBuf,
        what: &'static str,
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid netlist {path}: {source}")]
    NetlistToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("netlist {path}: block {name} declared twice")]
    DuplicateNetlistBlock { path: PathBuf, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlaceError>;
