//! OCR collaborator seam and result types.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::LabelPreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureLabelOcr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A text recognition engine.
///
/// The engine is a heavyweight, non-reentrant resource; the method takes
/// `&mut self` so callers serialize access (the analyzer holds it behind a
/// mutex). Implementations return zero or more non-empty detections per
/// image in reading order.
pub trait TextRecognizer {
    /// Recognize text regions in an image.
    fn recognize(&mut self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// A detected text region with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of text recognition on one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected text boxes in reading order.
    pub boxes: Vec<TextBox>,

    /// Recognized lines (non-empty box texts, reading order preserved).
    pub lines: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            lines: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Build a result from detected boxes: sorts into reading order and
    /// collects the non-empty line texts.
    pub fn from_boxes(
        mut boxes: Vec<TextBox>,
        processing_time_ms: u64,
        image_size: (u32, u32),
    ) -> Self {
        // Group rows by approximate vertical position, then left to right.
        boxes.sort_by(|a, b| {
            let (_, ay, _, _) = a.rect();
            let (_, by, _, _) = b.rect();
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                let (ax, _, _, _) = a.rect();
                let (bx, _, _, _) = b.rect();
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let lines = boxes
            .iter()
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            boxes,
            lines,
            processing_time_ms,
            image_size,
        }
    }

    /// Whether no text was recognized at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Full text blob for extraction: lines joined with newlines.
    pub fn full_text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boxed(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn boxes_sort_into_reading_order() {
        let result = OcrResult::from_boxes(
            vec![
                boxed("THIRD", 10.0, 120.0),
                boxed("SECOND", 200.0, 5.0),
                boxed("FIRST", 10.0, 8.0),
            ],
            0,
            (640, 480),
        );
        assert_eq!(result.lines, vec!["FIRST", "SECOND", "THIRD"]);
        assert_eq!(result.full_text(), "FIRST\nSECOND\nTHIRD");
    }

    #[test]
    fn blank_boxes_are_dropped_from_lines() {
        let result = OcrResult::from_boxes(
            vec![boxed("  ", 0.0, 0.0), boxed("S/N PC", 0.0, 30.0)],
            0,
            (100, 100),
        );
        assert_eq!(result.lines, vec!["S/N PC"]);
        assert!(!result.is_empty());
    }

    #[test]
    fn empty_result_is_empty() {
        assert!(OcrResult::empty(10, 10).is_empty());
        assert_eq!(OcrResult::empty(10, 10).full_text(), "");
    }
}
