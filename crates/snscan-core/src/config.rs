//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the snscan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Label photo preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// Serial number validation configuration.
    pub serial: SerialConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            preprocess: PreprocessConfig::default(),
            serial: SerialConfig::default(),
            models: ModelConfig::default(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Maximum image dimension (longer side) fed to text detection.
    pub detection_side_limit: u32,

    /// Recognition confidence threshold (0.0 - 1.0). Regions below it are dropped.
    pub recognition_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            detection_side_limit: 1920,
            recognition_threshold: 0.5,
        }
    }
}

/// Label photo preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Images whose longer side is below this are upscaled before OCR.
    pub upscale_trigger: u32,

    /// Target longer side when upscaling.
    pub upscale_target: u32,

    /// Upper bound on the upscale factor.
    pub upscale_cap: f32,

    /// Gaussian sigma for the unsharp-mask sharpening pass.
    pub sharpen_sigma: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            upscale_trigger: 1100,
            upscale_target: 1600,
            upscale_cap: 3.0,
            sharpen_sigma: 1.0,
        }
    }
}

/// Serial number validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Accepted 2-letter serial prefixes.
    pub allowed_prefixes: Vec<String>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: vec!["PC".to_string(), "CE".to_string()],
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes_are_pc_and_ce() {
        let config = ScanConfig::default();
        assert_eq!(config.serial.allowed_prefixes, vec!["PC", "CE"]);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"serial": {"allowed_prefixes": ["QA"]}}"#).unwrap();
        assert_eq!(config.serial.allowed_prefixes, vec!["QA"]);
        assert_eq!(config.ocr.detection_side_limit, 1920);
        assert_eq!(config.preprocess.upscale_trigger, 1100);
    }
}
