#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use plant_predictor::PipelineError;
use plant_predictor::explain::ExplanationService;
use plant_predictor::predictor_service::PredictorService;
use plant_predictor::storage::{PredictionStore, UploadedImage};
use plant_predictor::vision::{Classifier, InputTensor, Preprocessor};
use plant_shared::DiseaseLabel;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://localhost:8081";

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode png");
    buffer
}

pub fn upload(data: Vec<u8>) -> UploadedImage {
    UploadedImage::new(data, Some("image/png".into()), BASE_URL).expect("valid upload")
}

/// Returns the same scores for every input and counts calls.
pub struct FixedScores {
    scores: Vec<f32>,
    pub calls: AtomicUsize,
}

impl FixedScores {
    pub fn new(scores: Vec<f32>) -> Arc<Self> {
        Arc::new(Self {
            scores,
            calls: AtomicUsize::new(0),
        })
    }
}

impl Classifier for FixedScores {
    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, PipelineError> {
        assert_eq!(input.shape(), &[1, 224, 224, 3]);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores.clone())
    }
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _input: &InputTensor) -> Result<Vec<f32>, PipelineError> {
        Err(PipelineError::Inference("forward pass failed".into()))
    }
}

#[derive(Default)]
pub struct RecordingExplainer {
    pub fail: bool,
    pub requests: Mutex<Vec<DiseaseLabel>>,
}

impl RecordingExplainer {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl ExplanationService for RecordingExplainer {
    async fn explain(&self, prediction: DiseaseLabel) -> Result<String, PipelineError> {
        self.requests.lock().unwrap().push(prediction);
        if self.fail {
            Err(PipelineError::ExplanationFetch("503 Service Unavailable".into()))
        } else {
            Ok(format!("{} detected. Isolate the plant and treat it.", prediction))
        }
    }
}

#[derive(Default)]
pub struct RecordingStore {
    pub fail: bool,
    pub saved: Mutex<Vec<(String, DiseaseLabel)>>,
}

impl RecordingStore {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl PredictionStore for RecordingStore {
    async fn save(&self, image_url: &str, prediction: DiseaseLabel) -> Result<(), PipelineError> {
        self.saved
            .lock()
            .unwrap()
            .push((image_url.to_string(), prediction));
        if self.fail {
            Err(PipelineError::Persistence("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl RecordingStore {
    /// Saves run on their own task; give them a chance to land.
    pub async fn wait_for_saves(&self, count: usize) {
        for _ in 0..200 {
            if self.saved.lock().unwrap().len() >= count {
                return;
            }
            actix_web::rt::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// A store whose requests never get an answer.
pub struct HangingStore {
    pub calls: AtomicUsize,
}

impl HangingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PredictionStore for HangingStore {
    async fn save(&self, _image_url: &str, _prediction: DiseaseLabel) -> Result<(), PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::pending::<()>().await;
        Ok(())
    }
}

pub fn service_with(
    explainer: Arc<dyn ExplanationService>,
    store: Arc<dyn PredictionStore>,
) -> PredictorService {
    PredictorService::new(Preprocessor::default(), explainer, store)
}

pub fn ready_service(
    classifier: Arc<dyn Classifier>,
    explainer: Arc<dyn ExplanationService>,
    store: Arc<dyn PredictionStore>,
) -> PredictorService {
    let service = service_with(explainer, store);
    service.model_loaded(Ok(classifier));
    service
}
