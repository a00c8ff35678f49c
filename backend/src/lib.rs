pub mod config;
pub mod controller;
pub mod error;
pub mod explain;
pub mod predictor_service;
pub mod routes;
pub mod storage;
pub mod vision;

pub use controller::{Analysis, Completion, Controller, ModelState, UploadTicket};
pub use error::{ErrorKind, PipelineError};
pub use predictor_service::PredictorService;
