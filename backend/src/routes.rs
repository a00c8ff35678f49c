use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::predictor_service::PredictorService;
use crate::storage::{MAX_SIZE, UploadError, UploadedImage};

/// Absolute base used when forwarding image references to the store.
#[derive(Clone)]
pub struct BaseUrl(pub String);

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/analyze").route(web::post().to(handle_analyze)))
        .service(web::resource("/api/state").route(web::get().to(get_state)))
        .service(web::resource("/api/images/{image_hash}").route(web::get().to(get_image)));
}

async fn handle_analyze(
    service: web::Data<PredictorService>,
    base_url: web::Data<BaseUrl>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(mut field) = payload.try_next().await? {
        if upload.is_some() {
            // Only the first file counts; drain the rest unbuffered.
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let mime_type = field.content_type().map(|mime| mime.to_string());
        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > MAX_SIZE {
                return Ok(bad_upload(UploadError::FileTooLarge));
            }
            image_data.extend_from_slice(&data);
        }
        if !image_data.is_empty() {
            upload = Some((image_data, mime_type));
        }
    }

    let Some((image_data, mime_type)) = upload else {
        return Ok(bad_upload(UploadError::Empty));
    };

    let image = match UploadedImage::new(image_data, mime_type, &base_url.0) {
        Ok(image) => image,
        Err(e) => return Ok(bad_upload(e)),
    };

    info!("Received upload {}", image.image_hash);
    let snapshot = service.handle_upload(image).await;
    Ok(HttpResponse::Ok().json(snapshot))
}

fn bad_upload(err: UploadError) -> HttpResponse {
    warn!("Rejected upload: {}", err);
    let resp = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        UploadError::FileTooLarge => HttpResponse::PayloadTooLarge().json(resp),
        UploadError::InvalidFormat(_) => HttpResponse::UnsupportedMediaType().json(resp),
        UploadError::Empty => HttpResponse::BadRequest().json(resp),
    }
}

async fn get_state(service: web::Data<PredictorService>) -> HttpResponse {
    HttpResponse::Ok().json(service.snapshot())
}

async fn get_image(service: web::Data<PredictorService>, path: web::Path<String>) -> HttpResponse {
    let image_hash = path.into_inner();
    match service.current_image(&image_hash) {
        Some(image) => HttpResponse::Ok()
            .content_type(image.mime_type.clone())
            .body(image.data),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Image not found".into(),
        }),
    }
}
