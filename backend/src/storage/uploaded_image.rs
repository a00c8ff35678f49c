use sha2::{Digest, Sha256};

/// Largest accepted upload, in bytes.
pub const MAX_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No image data in upload")]
    Empty,
    #[error("File too large")]
    FileTooLarge,
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}

/// One uploaded file plus the URL the page and the store use to refer to it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub image_hash: String,
    pub url: String,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, mime_type: Option<String>, base_url: &str) -> Result<Self, UploadError> {
        validate_image_size(&data)?;
        let mime_type = match mime_type {
            Some(mime) => {
                if !mime.starts_with("image/") && mime != "application/octet-stream" {
                    return Err(UploadError::InvalidFormat(mime));
                }
                mime
            }
            None => "application/octet-stream".to_string(),
        };
        let image_hash = calculate_image_hash(&data);
        let url = image_url(base_url, &image_hash);
        Ok(Self {
            data,
            mime_type,
            image_hash,
            url,
        })
    }
}

pub fn calculate_image_hash(image_data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_data);
    hex::encode(hasher.finalize())
}

pub fn image_path(image_hash: &str) -> String {
    format!("/api/images/{}", image_hash)
}

pub fn image_url(base_url: &str, image_hash: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), image_path(image_hash))
}

pub fn validate_image_size(image_data: &[u8]) -> Result<(), UploadError> {
    if image_data.is_empty() {
        return Err(UploadError::Empty);
    }
    if image_data.len() > MAX_SIZE {
        return Err(UploadError::FileTooLarge);
    }
    Ok(())
}
