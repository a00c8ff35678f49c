pub mod config;
pub mod model;
pub mod postprocess;
pub mod preprocess;

pub use config::ModelConfig;
pub use model::{Classifier, LoadedModel, load_model};
pub use postprocess::select_label;
pub use preprocess::{InputTensor, Preprocessor};
