pub mod explanation_service;

pub use explanation_service::{ExplanationService, HttpExplanationService, explanation_prompt};
