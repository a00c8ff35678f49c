use async_trait::async_trait;
use plant_shared::{DiseaseLabel, ExplanationRequest, ExplanationResponse};
use url::Url;

use crate::error::PipelineError;

/// Produces prose about a predicted disease.
#[async_trait]
pub trait ExplanationService: Send + Sync {
    async fn explain(&self, prediction: DiseaseLabel) -> Result<String, PipelineError>;
}

pub fn explanation_prompt(prediction: DiseaseLabel) -> String {
    format!(
        "Generate a response for the plant disease prediction: {}",
        prediction
    )
}

/// Calls an external text-generation endpoint: `POST {prompt}` -> `{text}`.
#[derive(Clone)]
pub struct HttpExplanationService {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpExplanationService {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl ExplanationService for HttpExplanationService {
    async fn explain(&self, prediction: DiseaseLabel) -> Result<String, PipelineError> {
        let request = ExplanationRequest {
            prompt: explanation_prompt(prediction),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::ExplanationFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExplanationFetch(format!(
                "endpoint returned {}: {}",
                status, body
            )));
        }

        let body: ExplanationResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ExplanationFetch(format!("unexpected response body: {}", e)))?;
        Ok(body.text)
    }
}
