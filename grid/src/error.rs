use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("unknown tile type {0}")]
    UnknownTileType(String),

    #[error("tile type {0} declared twice")]
    DuplicateTileType(String),

    #[error("column of {tile} at {start}: {reason}")]
    BadColumn {
        tile: String,
        start: usize,
        reason: &'static str,
    },

    #[error("grid of {width}x{height} exceeds the largest supported size")]
    TooLarge { width: usize, height: usize },

    #[error("cannot read grid layout {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid grid layout {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, GridError>;
