//! Core library for equipment label scanning.
//!
//! This crate provides:
//! - Label photo preprocessing (upscaling small photos, unsharp-mask sharpening)
//! - An OCR pipeline seam with a pure Rust engine implementation
//! - Serial number extraction from noisy recognized text
//! - Deterministic BIOS password derivation from a validated serial

pub mod analyzer;
pub mod config;
pub mod error;
pub mod ocr;
pub mod serial;

pub use analyzer::{AnalysisResult, LabelAnalyzer};
pub use config::{ModelConfig, OcrConfig, PreprocessConfig, ScanConfig, SerialConfig};
pub use error::{OcrError, Result, SerialError, SnscanError};
pub use ocr::{LabelPreprocessor, OcrResult, TextBox, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureLabelOcr;
pub use serial::{derive_password, SerialExtractor, SerialNumber, SerialValidator};
