use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::error::{ConfigError, PipelineError};
use crate::vision::config::ModelConfig;

/// Model input: `[1, height, width, 3]`, raw 0-255 channel values as `f32`.
pub type InputTensor = Array4<f32>;

/// Turns uploaded image bytes into the fixed-shape tensor the model expects.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Preprocessor {
    pub fn new(config: &ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            width: config.width(),
            height: config.height(),
            filter: config.filter_type()?,
        })
    }

    pub fn input_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }

    pub fn preprocess(&self, image_data: &[u8]) -> Result<InputTensor, PipelineError> {
        let img = image::load_from_memory(image_data)?.to_rgb8();
        let resized = imageops::resize(&img, self.width, self.height, self.filter);

        let shape = (1, self.height as usize, self.width as usize, 3);
        let tensor = Array4::from_shape_fn(shape, |(_, y, x, c)| {
            resized.get_pixel(x as u32, y as u32)[c] as f32
        });
        Ok(tensor)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            width: 224,
            height: 224,
            filter: FilterType::Nearest,
        }
    }
}
