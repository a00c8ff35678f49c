use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub version: f32,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub size: Vec<u32>,
    pub channels: u32,
    #[serde(default)]
    pub layout: TensorLayout,
    pub preprocessing: PreprocessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    pub resize_method: String,
}

/// Memory order the model expects for its rank-4 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    #[default]
    Nhwc,
    Nchw,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: 1.0,
            image: ImageConfig {
                size: vec![224, 224],
                channels: 3,
                layout: TensorLayout::Nhwc,
                preprocessing: PreprocessingConfig {
                    resize_method: "nearest".to_string(),
                },
            },
        }
    }
}

impl ModelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image.size.len() != 2 || self.image.size.iter().any(|&s| s == 0) {
            return Err(ConfigError::InvalidValue {
                name: "image.size",
                reason: format!("expected [height, width], got {:?}", self.image.size),
            });
        }
        if self.image.channels != 3 {
            return Err(ConfigError::InvalidValue {
                name: "image.channels",
                reason: format!("only RGB input is supported, got {}", self.image.channels),
            });
        }
        self.filter_type()?;
        Ok(())
    }

    pub fn height(&self) -> u32 {
        self.image.size[0]
    }

    pub fn width(&self) -> u32 {
        self.image.size[1]
    }

    pub fn filter_type(&self) -> Result<FilterType, ConfigError> {
        match self.image.preprocessing.resize_method.to_lowercase().as_str() {
            "nearest" => Ok(FilterType::Nearest),
            "bilinear" | "triangle" => Ok(FilterType::Triangle),
            "bicubic" | "catmullrom" => Ok(FilterType::CatmullRom),
            "lanczos" | "lanczos3" => Ok(FilterType::Lanczos3),
            other => Err(ConfigError::InvalidValue {
                name: "image.preprocessing.resize_method",
                reason: format!("unknown resize method '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_224_nearest_nhwc() {
        let config = ModelConfig::default();
        assert_eq!((config.height(), config.width()), (224, 224));
        assert_eq!(config.filter_type().unwrap(), FilterType::Nearest);
        assert_eq!(config.image.layout, TensorLayout::Nhwc);
    }

    #[test]
    fn parses_yaml_with_layout_override() {
        let yaml = r#"
version: 1.0
image:
  size: [256, 192]
  channels: 3
  layout: nchw
  preprocessing:
    resize_method: bilinear
"#;
        let config = ModelConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.height(), 256);
        assert_eq!(config.width(), 192);
        assert_eq!(config.image.layout, TensorLayout::Nchw);
        assert_eq!(config.filter_type().unwrap(), FilterType::Triangle);
    }

    #[test]
    fn rejects_unknown_resize_method() {
        let yaml = r#"
version: 1.0
image:
  size: [224, 224]
  channels: 3
  preprocessing:
    resize_method: sinc
"#;
        assert!(matches!(
            ModelConfig::from_yaml(yaml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_non_rgb_input() {
        let mut config = ModelConfig::default();
        config.image.channels = 1;
        assert!(config.validate().is_err());
    }
}
