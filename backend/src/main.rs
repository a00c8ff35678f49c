use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use plant_predictor::config::AppConfig;
use plant_predictor::explain::HttpExplanationService;
use plant_predictor::predictor_service::PredictorService;
use plant_predictor::routes::{BaseUrl, configure_routes};
use plant_predictor::storage::HttpPredictionStore;
use plant_predictor::vision::Preprocessor;
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let preprocessor = Preprocessor::new(&config.model_config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let client = config
        .http_client()
        .map_err(|e| std::io::Error::other(format!("HTTP client setup failed: {}", e)))?;

    log::info!("Explanation endpoint: {}", config.explanation_endpoint);
    log::info!("Persistence endpoint: {}", config.persistence_endpoint);

    let explainer = HttpExplanationService::new(client.clone(), config.explanation_endpoint.clone());
    let store = HttpPredictionStore::new(client, config.persistence_endpoint.clone());
    let service = PredictorService::new(preprocessor, Arc::new(explainer), Arc::new(store));

    // The page is served while the model loads; uploads are ignored until it is ready.
    {
        let service = service.clone();
        let model_path = config.model_path.clone();
        let model_config = config.model_config.clone();
        actix_web::rt::spawn(async move {
            service.load_model(model_path, model_config).await;
        });
    }

    let bind_address = config.bind_address();
    let frontend_dir = config.frontend_dir.clone();
    let base_url = BaseUrl(config.base_url.clone());

    log::info!("Serving frontend from {}", frontend_dir.display());
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(base_url.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
