//! Unified Engine Error Model
use crate::data_model::JobStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("INPUT/{0}")]
    InvalidInput(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("STATUS/cannot move job from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Engine API error [{status}]: {body}")]
    Upstream { status: u16, body: String },

    #[error("TRANSPORT/{0}")]
    Transport(String),

    #[error("DECODE/{0}")]
    Decode(String),

    #[error("CONFIG/{0}")]
    Config(String),
}

impl EngineError {
    /// True for "no such job", whether reported locally or by the upstream engine.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::JobNotFound(_) | Self::Upstream { status: 404, .. }
        )
    }
}
