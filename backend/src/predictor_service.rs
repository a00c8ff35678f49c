use actix_web::web;
use plant_shared::{DiseaseLabel, ViewSnapshot};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::controller::{Analysis, Completion, Controller, UploadTicket};
use crate::error::PipelineError;
use crate::explain::ExplanationService;
use crate::storage::{PredictionStore, UploadedImage};
use crate::vision::{LoadedModel, ModelConfig, Preprocessor, load_model, select_label};

/// Runs uploads through preprocess, inference, persistence and explanation,
/// reporting every outcome to the shared controller.
#[derive(Clone)]
pub struct PredictorService {
    controller: Arc<Mutex<Controller>>,
    preprocessor: Preprocessor,
    labels: Arc<Vec<DiseaseLabel>>,
    explainer: Arc<dyn ExplanationService>,
    store: Arc<dyn PredictionStore>,
}

impl PredictorService {
    pub fn new(
        preprocessor: Preprocessor,
        explainer: Arc<dyn ExplanationService>,
        store: Arc<dyn PredictionStore>,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(Controller::new())),
            preprocessor,
            labels: Arc::new(DiseaseLabel::label_table()),
            explainer,
            store,
        }
    }

    /// Replaces the label table the score vector is mapped onto.
    pub fn with_labels(mut self, labels: Vec<DiseaseLabel>) -> Self {
        self.labels = Arc::new(labels);
        self
    }

    fn controller(&self) -> MutexGuard<'_, Controller> {
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Loads the model on the blocking pool and publishes the outcome.
    pub async fn load_model(&self, model_path: PathBuf, config: ModelConfig) {
        log::info!("Loading model from {}", model_path.display());
        let result = web::block(move || load_model(&model_path, &config))
            .await
            .map_err(|e| PipelineError::ModelLoad(e.to_string()))
            .and_then(|loaded| loaded);
        self.model_loaded(result);
    }

    pub fn model_loaded(&self, result: Result<LoadedModel, PipelineError>) {
        self.controller().model_loaded(result);
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.controller().snapshot()
    }

    pub fn current_image(&self, image_hash: &str) -> Option<UploadedImage> {
        self.controller().image_by_hash(image_hash).cloned()
    }

    /// Handles one upload event end to end and returns the resulting view.
    ///
    /// The pipeline runs on its own task so a dropped request cannot leave
    /// the view stuck in `Loading`.
    pub async fn handle_upload(&self, image: UploadedImage) -> ViewSnapshot {
        let ticket = self.controller().begin_upload(image);
        let Some(ticket) = ticket else {
            return self.snapshot();
        };
        let generation = ticket.generation;

        let service = self.clone();
        let task = actix_web::rt::spawn(async move {
            let result = service.run_pipeline(&ticket).await;
            let completion = service.controller().finish_upload(ticket.generation, result);
            completion
        });

        if let Err(e) = task.await {
            log::error!("Analysis task for upload {} failed: {}", generation, e);
            let result = Err(PipelineError::Inference(format!("analysis task failed: {}", e)));
            if self.controller().finish_upload(generation, result) == Completion::Stale {
                log::debug!("Upload {} was superseded before its task failed", generation);
            }
        }

        self.snapshot()
    }

    pub async fn run_pipeline(&self, ticket: &UploadTicket) -> Result<Analysis, PipelineError> {
        let prediction = self
            .classify(ticket.model.clone(), ticket.image.data.clone())
            .await?;

        // Persistence is fire-and-forget; the view never waits on the store.
        let store = self.store.clone();
        let image_url = ticket.image.url.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = store.save(&image_url, prediction).await {
                log::error!("Error saving to the database: {}", e);
            }
        });

        let explanation = self.explainer.explain(prediction).await;
        let explanation = match explanation {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!(
                    "Explanation unavailable for upload {}: {}",
                    ticket.generation,
                    e
                );
                None
            }
        };

        Ok(Analysis {
            prediction,
            explanation,
        })
    }

    /// Preprocess, forward pass and top-class selection, on the blocking pool.
    pub async fn classify(
        &self,
        model: LoadedModel,
        image_data: Vec<u8>,
    ) -> Result<DiseaseLabel, PipelineError> {
        let preprocessor = self.preprocessor;
        let labels = self.labels.clone();
        web::block(move || {
            let tensor = preprocessor.preprocess(&image_data)?;
            let scores = model.predict(&tensor)?;
            log::debug!("Model scores: {:?}", scores);
            select_label(&scores, &labels)
        })
        .await
        .map_err(|e| PipelineError::Inference(e.to_string()))?
    }
}
