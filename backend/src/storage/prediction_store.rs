use async_trait::async_trait;
use plant_shared::{DiseaseLabel, SavePredictionRequest};
use url::Url;

use crate::error::PipelineError;

/// Remote record of which image produced which prediction.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn save(&self, image_url: &str, prediction: DiseaseLabel) -> Result<(), PipelineError>;
}

/// Forwards `{imageUrl, prediction}` to an external storage endpoint.
/// The response body is ignored.
#[derive(Clone)]
pub struct HttpPredictionStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPredictionStore {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl PredictionStore for HttpPredictionStore {
    async fn save(&self, image_url: &str, prediction: DiseaseLabel) -> Result<(), PipelineError> {
        let request = SavePredictionRequest {
            image_url: image_url.to_string(),
            prediction: prediction.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Persistence(format!(
                "endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
