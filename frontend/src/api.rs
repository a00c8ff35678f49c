use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use plant_shared::ViewSnapshot;
use serde::Deserialize;

pub const ANALYZE_ENDPOINT: &str = "/api/analyze";
pub const STATE_ENDPOINT: &str = "/api/state";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Failure talking to the backend, already worded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError(pub String);

pub async fn fetch_state() -> Result<ViewSnapshot, ApiError> {
    let resp = Request::get(STATE_ENDPOINT)
        .send()
        .await
        .map_err(|e| ApiError(format!("Network error: {}", e)))?;

    if !resp.ok() {
        return Err(ApiError(format!("Server error: HTTP {}", resp.status())));
    }

    resp.json::<ViewSnapshot>()
        .await
        .map_err(|e| ApiError(format!("Invalid state response: {}", e)))
}

pub async fn analyze_image(file: &GlooFile) -> Result<ViewSnapshot, ApiError> {
    let form_data = web_sys::FormData::new()
        .map_err(|_| ApiError("Failed to create form data".into()))?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|_| ApiError("Failed to attach image".into()))?;

    let request = Request::post(ANALYZE_ENDPOINT)
        .body(form_data)
        .map_err(|e| ApiError(format!("Failed to build request: {}", e)))?;

    let resp = request
        .send()
        .await
        .map_err(|e| ApiError(format!("Network error: {}", e)))?;

    if !resp.ok() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("Server error: HTTP {}", status));
        return Err(ApiError(message));
    }

    resp.json::<ViewSnapshot>()
        .await
        .map_err(|e| ApiError(format!("Invalid analysis response: {}", e)))
}
