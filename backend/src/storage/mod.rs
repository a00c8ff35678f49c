pub mod prediction_store;
pub mod uploaded_image;

pub use prediction_store::{HttpPredictionStore, PredictionStore};
pub use uploaded_image::{MAX_SIZE, UploadError, UploadedImage};
