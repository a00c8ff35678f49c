pub use plant_shared::{ANALYSIS_FAILED_MESSAGE, MODEL_LOAD_FAILED_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Model load error: {0}")]
    ModelLoad(String),
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Inference error: {0}")]
    Inference(String),
    #[error("Explanation fetch error: {0}")]
    ExplanationFetch(String),
    #[error("Label table has {expected} entries but the model produced {actual} scores")]
    LabelMismatch { expected: usize, actual: usize },
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Failure tag without payload, for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    ModelLoad,
    Decode,
    Inference,
    ExplanationFetch,
    LabelMismatch,
    Persistence,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::ModelLoad(_) => ErrorKind::ModelLoad,
            PipelineError::Decode(_) => ErrorKind::Decode,
            PipelineError::Inference(_) => ErrorKind::Inference,
            PipelineError::ExplanationFetch(_) => ErrorKind::ExplanationFetch,
            PipelineError::LabelMismatch { .. } => ErrorKind::LabelMismatch,
            PipelineError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Text the page renders for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::ModelLoad(_) => MODEL_LOAD_FAILED_MESSAGE,
            _ => ANALYSIS_FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("Failed to read model config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
