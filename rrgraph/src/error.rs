use thiserror::Error;

use crate::{RrNodeId, SwitchId};

#[derive(Debug, Error)]
pub enum RrGraphError {
    #[error("unknown switch {0}")]
    UnknownSwitch(String),

    #[error("switch {0} redefined with a different kind")]
    SwitchRedefined(String),

    #[error("node {0} does not exist")]
    NoSuchNode(RrNodeId),

    #[error("switch {0} does not exist")]
    NoSuchSwitch(SwitchId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode routing graph: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("cannot decode routing graph: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, RrGraphError>;
