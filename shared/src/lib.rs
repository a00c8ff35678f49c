use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

/// Message shown on the page for any failed upload, whatever the cause.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "An error occurred while analyzing the image. Please try again.";

/// Message shown once when the model could not be loaded at startup.
pub const MODEL_LOAD_FAILED_MESSAGE: &str =
    "Failed to load the prediction model. Please try again later.";

/// Classes the plant model distinguishes, in model output order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    EnumCountMacro,
)]
pub enum DiseaseLabel {
    #[strum(serialize = "Healthy")]
    #[serde(rename = "Healthy")]
    Healthy,
    #[strum(serialize = "Powdery Mildew")]
    #[serde(rename = "Powdery Mildew")]
    PowderyMildew,
    #[strum(serialize = "Rust")]
    #[serde(rename = "Rust")]
    Rust,
    #[strum(serialize = "Scab")]
    #[serde(rename = "Scab")]
    Scab,
}

impl DiseaseLabel {
    pub fn label_table() -> Vec<DiseaseLabel> {
        Self::iter().collect()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn count() -> usize {
        Self::COUNT
    }
}

/// What the page should render. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success {
        prediction: DiseaseLabel,
        explanation: Option<String>,
    },
    Error {
        message: String,
    },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn prediction(&self) -> Option<DiseaseLabel> {
        match self {
            ViewState::Success { prediction, .. } => Some(*prediction),
            _ => None,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            ViewState::Success { explanation, .. } => explanation.as_deref(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// View state together with the upload generation that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub generation: u64,
    pub state: ViewState,
    pub image_url: Option<String>,
    pub model_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePredictionRequest {
    pub image_url: String,
    pub prediction: String,
}
