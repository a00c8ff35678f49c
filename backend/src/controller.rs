use plant_shared::{DiseaseLabel, ViewSnapshot, ViewState};

use crate::error::{MODEL_LOAD_FAILED_MESSAGE, PipelineError};
use crate::storage::UploadedImage;
use crate::storage::uploaded_image::image_path;
use crate::vision::LoadedModel;

pub enum ModelState {
    Loading,
    Ready(LoadedModel),
    Failed(String),
}

/// Everything one upload's pipeline run needs, tagged with its generation.
#[derive(Clone)]
pub struct UploadTicket {
    pub generation: u64,
    pub model: LoadedModel,
    pub image: UploadedImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub prediction: DiseaseLabel,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Owns the loaded model and the view state. Every transition goes through here.
pub struct Controller {
    model: ModelState,
    view: ViewState,
    generation: u64,
    image: Option<UploadedImage>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            model: ModelState::Loading,
            view: ViewState::Idle,
            generation: 0,
            image: None,
        }
    }

    pub fn model_loaded(&mut self, result: Result<LoadedModel, PipelineError>) {
        match result {
            Ok(model) => {
                log::info!("Prediction model ready");
                self.model = ModelState::Ready(model);
            }
            Err(e) => {
                log::error!("Error loading model: {}", e);
                self.model = ModelState::Failed(e.to_string());
                self.view = ViewState::Error {
                    message: MODEL_LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        }
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model
    }

    pub fn is_model_ready(&self) -> bool {
        matches!(self.model, ModelState::Ready(_))
    }

    /// Starts a new upload. Returns `None`, leaving the view untouched, when
    /// the model is not ready.
    pub fn begin_upload(&mut self, image: UploadedImage) -> Option<UploadTicket> {
        let model = match &self.model {
            ModelState::Ready(model) => model.clone(),
            ModelState::Loading => {
                log::warn!("Upload ignored: model still loading");
                return None;
            }
            ModelState::Failed(reason) => {
                log::warn!("Upload ignored: model failed to load ({})", reason);
                return None;
            }
        };

        self.generation += 1;
        self.image = Some(image.clone());
        self.view = ViewState::Loading;
        log::info!(
            "Upload {} accepted ({} bytes, {})",
            self.generation,
            image.data.len(),
            image.mime_type
        );

        Some(UploadTicket {
            generation: self.generation,
            model,
            image,
        })
    }

    /// Applies a pipeline result unless a newer upload has started since.
    pub fn finish_upload(
        &mut self,
        generation: u64,
        result: Result<Analysis, PipelineError>,
    ) -> Completion {
        if generation != self.generation {
            log::info!(
                "Discarding stale result for upload {} (current is {})",
                generation,
                self.generation
            );
            return Completion::Stale;
        }

        self.view = match result {
            Ok(analysis) => {
                log::info!("Upload {} classified as {}", generation, analysis.prediction);
                ViewState::Success {
                    prediction: analysis.prediction,
                    explanation: analysis.explanation,
                }
            }
            Err(e) => {
                log::error!("Error analyzing image ({}): {}", e.kind(), e);
                ViewState::Error {
                    message: e.user_message().to_string(),
                }
            }
        };
        Completion::Applied
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn image_by_hash(&self, image_hash: &str) -> Option<&UploadedImage> {
        self.image
            .as_ref()
            .filter(|image| image.image_hash == image_hash)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            generation: self.generation,
            state: self.view.clone(),
            image_url: self.image.as_ref().map(|image| image_path(&image.image_hash)),
            model_ready: self.is_model_ready(),
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
