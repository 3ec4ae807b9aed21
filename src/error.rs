use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Request,
    Generation,
    Parse,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Request => "request",
            PipelineStage::Generation => "generation",
            PipelineStage::Parse => "parse",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("nothing to analyze: {0}")]
    EmptyInput(String),
    #[error("malformed extraction: {0}")]
    MalformedExtraction(String),
    #[error("invalid ticket at position {index}: {reason}")]
    InvalidTicketSchema { index: usize, reason: String },
    #[error("could not reach {service}: {message}")]
    TransportFailure {
        service: &'static str,
        message: String,
    },
    #[error("{service} responded with {status}: {body}")]
    RemoteRejection {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        source: Box<AppError>,
    },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        AppError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            AppError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The failure underneath any stage tags.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
