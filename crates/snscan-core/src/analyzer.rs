//! Top-level label analysis: image bytes in, serial and password out.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::{OcrError, Result};
use crate::ocr::{LabelPreprocessor, TextRecognizer};
use crate::serial::{derive_password, SerialExtractor, SerialNumber, SerialValidator};

/// Number of recognized lines listed in a "no serial found" diagnostic.
const DIAGNOSTIC_LINE_CAP: usize = 10;

/// Outcome of analyzing one label photo.
///
/// Analysis never fails outright: decode errors, empty recognition and
/// internal faults all surface as `found == false` with a diagnostic, since
/// the caller's only recovery is asking for the photo to be retaken.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Whether a valid serial was recognized.
    pub found: bool,

    /// The validated serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<SerialNumber>,

    /// The derived BIOS password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Human-readable troubleshooting text when no serial was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl AnalysisResult {
    fn matched(serial: SerialNumber, password: String) -> Self {
        Self {
            found: true,
            serial: Some(serial),
            password: Some(password),
            diagnostic: None,
        }
    }

    fn not_found(diagnostic: impl Into<String>) -> Self {
        Self {
            found: false,
            serial: None,
            password: None,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Analyzes label photos: preprocess, recognize, extract, derive password.
///
/// The extraction pipeline is pure and stateless; the recognizer is a
/// heavyweight non-reentrant resource, so it sits behind a mutex and exactly
/// one recognition call is in flight at a time.
pub struct LabelAnalyzer<R: TextRecognizer> {
    recognizer: Mutex<R>,
    preprocessor: LabelPreprocessor,
    extractor: SerialExtractor,
}

impl<R: TextRecognizer> LabelAnalyzer<R> {
    /// Create an analyzer around a recognition engine.
    pub fn new(recognizer: R, config: &ScanConfig) -> Self {
        Self {
            recognizer: Mutex::new(recognizer),
            preprocessor: LabelPreprocessor::from_config(&config.preprocess),
            extractor: SerialExtractor::new(SerialValidator::new(
                config.serial.allowed_prefixes.clone(),
            )),
        }
    }

    /// Analyze a photographed label.
    ///
    /// Never returns an error: every failure mode is folded into a
    /// `found == false` result carrying a diagnostic.
    pub fn analyze_bytes(&self, image_bytes: &[u8]) -> AnalysisResult {
        self.try_analyze(image_bytes)
            .unwrap_or_else(|e| AnalysisResult::not_found(format!("analysis failed: {e}")))
    }

    fn try_analyze(&self, image_bytes: &[u8]) -> Result<AnalysisResult> {
        let image = match image::load_from_memory(image_bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("image decode failed: {e}");
                return Ok(AnalysisResult::not_found(format!(
                    "failed to decode image: {e}"
                )));
            }
        };

        let prepared = self.preprocessor.prepare(&image);

        let recognized = {
            let mut recognizer = self
                .recognizer
                .lock()
                .map_err(|_| OcrError::Recognition("recognizer mutex poisoned".to_string()))?;
            recognizer.recognize(&prepared)?
        };

        if let Some(serial) = self.extractor.extract(&recognized.full_text()) {
            let password = derive_password(&serial);
            info!("serial {serial} recognized, password derived");
            return Ok(AnalysisResult::matched(serial, password));
        }

        if recognized.is_empty() {
            return Ok(AnalysisResult::not_found(
                "no text was recognized in the image",
            ));
        }

        Ok(AnalysisResult::not_found(no_serial_diagnostic(
            &recognized.lines,
        )))
    }
}

/// List the first few recognized lines so a human can see what the OCR saw.
fn no_serial_diagnostic(lines: &[String]) -> String {
    let mut text = String::from("no serial number found; recognized lines:");
    for (i, line) in lines.iter().take(DIAGNOSTIC_LINE_CAP).enumerate() {
        text.push_str(&format!("\n[{:02}] {}", i + 1, line));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::{OcrResult, TextBox};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Recognizer that replays scripted lines instead of running a model.
    struct ScriptedRecognizer {
        lines: Vec<String>,
        fail: bool,
    }

    impl ScriptedRecognizer {
        fn with_lines(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                lines: Vec::new(),
                fail: true,
            }
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&mut self, _image: &image::DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            if self.fail {
                return Err(OcrError::Recognition("scripted failure".to_string()));
            }
            let boxes = self
                .lines
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let y = i as f32 * 30.0;
                    TextBox {
                        bbox: [0.0, y, 100.0, y, 100.0, y + 20.0, 0.0, y + 20.0],
                        text: text.clone(),
                        confidence: 0.9,
                    }
                })
                .collect();
            Ok(OcrResult::from_boxes(boxes, 1, (100, 100)))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([200, 200, 200]),
        ));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn analyzer(recognizer: ScriptedRecognizer) -> LabelAnalyzer<ScriptedRecognizer> {
        LabelAnalyzer::new(recognizer, &ScanConfig::default())
    }

    #[test]
    fn recognized_serial_yields_password() {
        let analyzer = analyzer(ScriptedRecognizer::with_lines(&[
            "MODEL X-200",
            "S/N: PCABC123000012",
        ]));
        let result = analyzer.analyze_bytes(&png_bytes());
        assert!(result.found);
        assert_eq!(
            result.serial.as_ref().map(|s| s.as_str()),
            Some("PCABC123000012")
        );
        assert_eq!(result.password.as_deref(), Some("PC1476"));
        assert_eq!(result.diagnostic, None);
    }

    #[test]
    fn undecodable_bytes_degrade_gracefully() {
        let analyzer = analyzer(ScriptedRecognizer::with_lines(&[]));
        let result = analyzer.analyze_bytes(b"not an image");
        assert!(!result.found);
        assert!(result.diagnostic.unwrap().contains("failed to decode image"));
    }

    #[test]
    fn empty_recognition_reports_no_text() {
        let analyzer = analyzer(ScriptedRecognizer::with_lines(&[]));
        let result = analyzer.analyze_bytes(&png_bytes());
        assert!(!result.found);
        assert_eq!(
            result.diagnostic.as_deref(),
            Some("no text was recognized in the image")
        );
    }

    #[test]
    fn diagnostic_lists_lines_capped_at_ten() {
        let lines: Vec<String> = (1..=11).map(|i| format!("LINE {i}")).collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let analyzer = analyzer(ScriptedRecognizer::with_lines(&line_refs));

        let result = analyzer.analyze_bytes(&png_bytes());
        assert!(!result.found);
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("[01] LINE 1"));
        assert!(diagnostic.contains("[10] LINE 10"));
        assert!(!diagnostic.contains("LINE 11"));
    }

    #[test]
    fn recognizer_fault_becomes_not_found() {
        let analyzer = analyzer(ScriptedRecognizer::failing());
        let result = analyzer.analyze_bytes(&png_bytes());
        assert!(!result.found);
        assert!(result.diagnostic.unwrap().contains("scripted failure"));
    }
}
