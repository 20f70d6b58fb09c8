use std::path::PathBuf;

use rrforge_rrgraph::RrGraphError;
use thiserror::Error;

use crate::ClockType;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("clock network {network}: {kind} networks are not supported")]
    UnsupportedTopology { network: String, kind: ClockType },

    #[error("clock network {network}: {reason}")]
    InconsistentConfig { network: String, reason: String },

    #[error("clock network {network}: {source}")]
    Graph {
        network: String,
        source: RrGraphError,
    },

    #[error("clock architecture: {0}")]
    Switch(#[from] RrGraphError),

    #[error("cannot read clock architecture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid clock architecture {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ClockError {
    pub(crate) fn inconsistent(network: &str, reason: impl Into<String>) -> Self {
        ClockError::InconsistentConfig {
            network: network.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClockError>;
