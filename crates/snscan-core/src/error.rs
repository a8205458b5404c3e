//! Error types for the snscan-core library.

use thiserror::Error;

/// Main error type for the snscan library.
#[derive(Error, Debug)]
pub enum SnscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Serial number error.
    #[error("serial error: {0}")]
    Serial(#[from] SerialError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to serial number handling.
///
/// `derive_password` can only be called on an already-validated
/// [`SerialNumber`](crate::serial::SerialNumber), so these surface when a
/// caller submits a raw string (e.g. a serial typed by hand).
#[derive(Error, Debug)]
pub enum SerialError {
    /// The candidate does not have the 5-letter + 9-digit shape.
    #[error("malformed serial number {0:?}: expected 5 uppercase letters followed by 9 digits")]
    Malformed(String),

    /// The 2-letter prefix is not in the configured allow-list.
    #[error("serial number {serial:?} has disallowed prefix {prefix:?}")]
    DisallowedPrefix { serial: String, prefix: String },
}

/// Result type for the snscan library.
pub type Result<T> = std::result::Result<T, SnscanError>;
