use std::path::Path;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::vision::config::ModelConfig;
use crate::vision::preprocess::InputTensor;

/// A loaded model: one forward pass from input tensor to per-class scores.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, PipelineError>;
}

pub type LoadedModel = Arc<dyn Classifier>;

/// Loads the model artifact at `model_path`. Called once at startup.
pub fn load_model(model_path: &Path, config: &ModelConfig) -> Result<LoadedModel, PipelineError> {
    if !model_path.exists() {
        return Err(PipelineError::ModelLoad(format!(
            "model file not found: {}",
            model_path.display()
        )));
    }
    load_backend(model_path, config)
}

#[cfg(feature = "torch")]
fn load_backend(model_path: &Path, config: &ModelConfig) -> Result<LoadedModel, PipelineError> {
    let model = torch::TorchClassifier::new(model_path, config.image.layout)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "torch"))]
fn load_backend(model_path: &Path, _config: &ModelConfig) -> Result<LoadedModel, PipelineError> {
    Err(PipelineError::ModelLoad(format!(
        "cannot load {}: built without the `torch` feature",
        model_path.display()
    )))
}

#[cfg(feature = "torch")]
mod torch {
    use std::path::Path;
    use std::sync::Mutex;

    use tch::nn::ModuleT;
    use tch::{CModule, Device, Kind, Tensor};

    use super::Classifier;
    use crate::error::PipelineError;
    use crate::vision::config::TensorLayout;
    use crate::vision::preprocess::InputTensor;

    pub struct TorchClassifier {
        model: Mutex<CModule>,
        device: Device,
        layout: TensorLayout,
    }

    impl TorchClassifier {
        pub fn new(model_path: &Path, layout: TensorLayout) -> Result<Self, PipelineError> {
            let device = Device::cuda_if_available();
            let model = CModule::load_on_device(model_path, device)
                .map_err(|e| PipelineError::ModelLoad(e.to_string()))?;
            log::info!("Loaded TorchScript model on {:?}", device);
            Ok(Self {
                model: Mutex::new(model),
                device,
                layout,
            })
        }

        fn to_tensor(&self, input: &InputTensor) -> Result<Tensor, PipelineError> {
            let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
            let data: Vec<f32> = input.iter().copied().collect();
            let tensor = Tensor::from_slice(&data).view(shape.as_slice());
            let tensor = match self.layout {
                TensorLayout::Nhwc => tensor,
                TensorLayout::Nchw => tensor.permute([0, 3, 1, 2]).contiguous(),
            };
            Ok(tensor.to_device(self.device))
        }
    }

    impl Classifier for TorchClassifier {
        fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, PipelineError> {
            let tensor = self.to_tensor(input)?;
            let model = self
                .model
                .lock()
                .map_err(|_| PipelineError::Inference("model lock poisoned".into()))?;
            let output = tch::no_grad(|| model.forward_t(&tensor, false));
            let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
            Vec::<f32>::try_from(&output_flat).map_err(|e| PipelineError::Inference(e.to_string()))
        }
    }
}
