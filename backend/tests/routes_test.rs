//! HTTP surface: multipart upload, state polling and image references.

mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use common::*;
use plant_predictor::predictor_service::PredictorService;
use plant_predictor::routes::{BaseUrl, configure_api};
use plant_predictor::storage::MAX_SIZE;
use plant_shared::{DiseaseLabel, ViewSnapshot, ViewState};

const BOUNDARY: &str = "----plant-upload-boundary";

fn multipart_body(content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"leaf.png\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn analyze_request(content_type: &str, data: &[u8]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(content_type, data))
}

fn ready() -> PredictorService {
    ready_service(
        FixedScores::new(vec![0.1, 0.9, 0.05, 0.05]),
        RecordingExplainer::ok(),
        RecordingStore::ok(),
    )
}

macro_rules! init_app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service.clone()))
                .app_data(web::Data::new(BaseUrl(BASE_URL.to_string())))
                .configure(configure_api),
        )
        .await
    };
}

#[actix_web::test]
async fn upload_returns_success_snapshot() {
    let service = ready();
    let app = init_app!(service);

    let png = solid_png(224, 224, [30, 160, 60]);
    let req = analyze_request("image/png", &png).to_request();
    let snapshot: ViewSnapshot = test::call_and_read_body_json(&app, req).await;

    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.state.prediction(), Some(DiseaseLabel::PowderyMildew));
    assert!(snapshot.image_url.is_some());
}

#[actix_web::test]
async fn state_and_image_reflect_last_upload() {
    let service = ready();
    let app = init_app!(service);

    let png = solid_png(40, 40, [200, 10, 10]);
    let req = analyze_request("image/png", &png).to_request();
    let uploaded: ViewSnapshot = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/api/state").to_request();
    let state: ViewSnapshot = test::call_and_read_body_json(&app, req).await;
    assert_eq!(state, uploaded);

    let image_url = state.image_url.expect("image reference");
    let req = test::TestRequest::get().uri(&image_url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), png.as_slice());
}

#[actix_web::test]
async fn superseded_image_is_no_longer_served() {
    let service = ready();
    let app = init_app!(service);

    let req = analyze_request("image/png", &solid_png(8, 8, [1, 1, 1])).to_request();
    let first: ViewSnapshot = test::call_and_read_body_json(&app, req).await;
    let req = analyze_request("image/png", &solid_png(8, 8, [2, 2, 2])).to_request();
    let second: ViewSnapshot = test::call_and_read_body_json(&app, req).await;
    assert_ne!(first.image_url, second.image_url);

    let req = test::TestRequest::get()
        .uri(&first.image_url.unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn state_starts_idle_while_model_loads() {
    let service = service_with(RecordingExplainer::ok(), RecordingStore::ok());
    let app = init_app!(service);

    let req = analyze_request("image/png", &solid_png(8, 8, [1, 1, 1])).to_request();
    let snapshot: ViewSnapshot = test::call_and_read_body_json(&app, req).await;
    assert_eq!(snapshot.state, ViewState::Idle);
    assert!(!snapshot.model_ready);
    assert_eq!(snapshot.image_url, None);
}

#[actix_web::test]
async fn non_image_part_is_rejected() {
    let service = ready();
    let app = init_app!(service);

    let req = analyze_request("text/plain", b"hello").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(service.snapshot().generation, 0);
}

#[actix_web::test]
async fn empty_upload_is_a_bad_request() {
    let service = ready();
    let app = init_app!(service);

    let req = analyze_request("image/png", b"").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn oversized_upload_is_rejected_while_streaming() {
    let service = ready();
    let app = init_app!(service);

    let oversized = vec![0u8; MAX_SIZE + 1];
    let req = analyze_request("image/png", &oversized).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(service.snapshot().generation, 0);
}

#[actix_web::test]
async fn only_the_first_file_is_analyzed() {
    let service = ready();
    let app = init_app!(service);

    let first = solid_png(12, 12, [10, 200, 10]);
    let mut body = Vec::new();
    for (name, data) in [("leaf.png", first.as_slice()), ("other.png", b"not an image".as_slice())] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();
    let snapshot: ViewSnapshot = test::call_and_read_body_json(&app, req).await;

    assert_eq!(snapshot.state.prediction(), Some(DiseaseLabel::PowderyMildew));
    let req = test::TestRequest::get()
        .uri(&snapshot.image_url.unwrap())
        .to_request();
    let served = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(served.as_ref(), first.as_slice());
}

#[actix_web::test]
async fn unknown_image_hash_is_not_found() {
    let service = ready();
    let app = init_app!(service);

    let req = test::TestRequest::get()
        .uri("/api/images/0000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
