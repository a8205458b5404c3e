//! Serial number search strategies over recognized text.

use tracing::debug;

use super::normalize::{compact, fix_digit_confusions, normalize};
use super::patterns::{
    ALNUM_RUN, MARKED_COMPACT, MARKED_LOOSE, MARKED_STRICT, MARKER, SERIAL_LOOSE, SERIAL_STRICT,
};
use super::{SerialNumber, SerialValidator};

/// Characters scanned after each marker occurrence. OCR inserts spurious line
/// breaks and stray tokens between the marker and the serial on some labels.
const MARKER_WINDOW: usize = 80;

/// Extracts serial numbers from recognized label text.
///
/// Two strategies are tried in order: an anchored search near an "S/N" marker
/// (including OCR-degraded spellings of it), then an unanchored scan for
/// anything shaped like a serial. Every candidate is routed through the
/// validator before it is returned.
#[derive(Debug, Clone)]
pub struct SerialExtractor {
    validator: SerialValidator,
}

impl SerialExtractor {
    /// Create an extractor with the given validator.
    pub fn new(validator: SerialValidator) -> Self {
        Self { validator }
    }

    /// The validator candidates are gated through.
    pub fn validator(&self) -> &SerialValidator {
        &self.validator
    }

    /// Find a serial anywhere in the text, preferring marker-anchored hits.
    pub fn extract(&self, text: &str) -> Option<SerialNumber> {
        self.extract_near_marker(text)
            .or_else(|| self.extract_anywhere(text))
    }

    /// Anchored search: a 14-character run following an "S/N" marker.
    ///
    /// Steps, first validated hit wins:
    /// 1. loose marker (`S`, broken separators, `N`) with the run attached;
    /// 2. literal `SN` with the run attached;
    /// 3. `SN`/`S5N`/`5N` on the compacted text;
    /// 4. for every marker occurrence, the first run found in a compacted
    ///    80-character window after it.
    pub fn extract_near_marker(&self, text: &str) -> Option<SerialNumber> {
        let norm = normalize(text);
        let comp = compact(&norm);

        for pattern in [&*MARKED_LOOSE, &*MARKED_STRICT] {
            for caps in pattern.captures_iter(&norm) {
                if let Some(serial) = self.correct_and_validate(&caps[1]) {
                    return Some(serial);
                }
            }
        }

        if let Some(caps) = MARKED_COMPACT.captures(&comp) {
            if let Some(serial) = self.correct_and_validate(&caps[1]) {
                return Some(serial);
            }
        }

        for marker in MARKER.find_iter(&norm) {
            let window: String = norm[marker.end()..].chars().take(MARKER_WINDOW).collect();
            let joined = compact(&window);
            if let Some(run) = ALNUM_RUN.find(&joined) {
                if let Some(serial) = self.correct_and_validate(run.as_str()) {
                    return Some(serial);
                }
            }
        }

        None
    }

    /// Unanchored fallback for labels that print no marker at all.
    ///
    /// More permissive than the anchored search, so only used once that one
    /// is exhausted: a strict-shape hit on the normalized text, then loose
    /// 5-letter + 9-alphanumeric runs on the normalized and compacted text.
    pub fn extract_anywhere(&self, text: &str) -> Option<SerialNumber> {
        let norm = normalize(text);

        if let Some(hit) = SERIAL_STRICT.find(&norm) {
            if let Ok(serial) = self.validator.validate(hit.as_str()) {
                return Some(serial);
            }
        }

        for hit in SERIAL_LOOSE.find_iter(&norm) {
            if let Some(serial) = self.correct_and_validate(hit.as_str()) {
                return Some(serial);
            }
        }

        let comp = compact(&norm);
        if let Some(hit) = SERIAL_LOOSE.find(&comp) {
            if let Some(serial) = self.correct_and_validate(hit.as_str()) {
                return Some(serial);
            }
        }

        None
    }

    /// Split a 14-character run into letter prefix and digit suffix, repair
    /// confusable glyphs in the suffix only, and gate the result through the
    /// validator.
    fn correct_and_validate(&self, raw: &str) -> Option<SerialNumber> {
        let letters = &raw[..5];
        let digits = fix_digit_confusions(&raw[5..]);
        let candidate = format!("{letters}{digits}");
        match self.validator.validate(&candidate) {
            Ok(serial) => {
                debug!("candidate {raw} validated as {serial}");
                Some(serial)
            }
            Err(_) => None,
        }
    }
}

impl Default for SerialExtractor {
    fn default() -> Self {
        Self::new(SerialValidator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> SerialExtractor {
        SerialExtractor::default()
    }

    fn extracted(text: &str) -> Option<String> {
        extractor().extract(text).map(|s| s.as_str().to_string())
    }

    #[test]
    fn clean_marked_serial_round_trips() {
        assert_eq!(
            extracted("S/N: PCABC123456789"),
            Some("PCABC123456789".to_string())
        );
    }

    #[test]
    fn marker_survives_broken_separators() {
        for text in [
            "S.N PCABC123456789",
            "S N: PCABC123456789",
            "S-N PCABC123456789",
            r"S\N: PCABC123456789",
            "SN:PCABC123456789",
        ] {
            assert_eq!(extracted(text), Some("PCABC123456789".to_string()), "{text}");
        }
    }

    #[test]
    fn degraded_marker_with_confused_digits() {
        // "S5N" is a misread "S/N"; the suffix carries O/I/S/B-for-digit glyphs.
        assert_eq!(
            extracted("S5N PCABCO1I00S8OO"),
            Some("PCABC011005800".to_string())
        );
    }

    #[test]
    fn fully_degraded_marker_5n() {
        assert_eq!(
            extracted("5N PCABC123456789"),
            Some("PCABC123456789".to_string())
        );
    }

    #[test]
    fn window_scan_recovers_split_serial_after_second_marker() {
        // The first marker's window opens on a bogus run; only the per-marker
        // window scan reaches the serial, which is split by spaces.
        let text = "SN BADBADBAD12345, S/N: PCABC 1234 56789";
        assert_eq!(
            extractor()
                .extract_near_marker(text)
                .map(|s| s.as_str().to_string()),
            Some("PCABC123456789".to_string())
        );
    }

    #[test]
    fn marked_serial_across_line_break() {
        assert_eq!(
            extracted("MODEL X-200\nS/N: PCABC123456789\nMADE IN 2024"),
            Some("PCABC123456789".to_string())
        );
    }

    #[test]
    fn disallowed_prefix_is_never_returned() {
        assert_eq!(extracted("S/N: XXABC123456789"), None);
    }

    #[test]
    fn unmarked_clean_serial_found_by_fallback() {
        assert_eq!(
            extracted("LABEL PCABC123456789 QC PASS"),
            Some("PCABC123456789".to_string())
        );
    }

    #[test]
    fn unmarked_serial_with_confused_digits() {
        assert_eq!(
            extracted("PCABCO1I00S8OO"),
            Some("PCABC011005800".to_string())
        );
    }

    #[test]
    fn unmarked_serial_split_by_spaces_found_in_compacted_text() {
        assert_eq!(
            extracted("PC ABC O1I 00S 8OO"),
            Some("PCABC011005800".to_string())
        );
    }

    #[test]
    fn fallback_runs_only_after_anchored_strategy_is_exhausted() {
        // Anchored search sees the marked-but-invalid candidate and yields
        // nothing; only then does the unanchored scan reach the clean serial.
        let text = "S/N: XXABC123456789 AND PCDEF123456789";
        let ex = extractor();
        assert_eq!(ex.extract_near_marker(text), None);
        assert_eq!(
            ex.extract(text).map(|s| s.as_str().to_string()),
            Some("PCDEF123456789".to_string())
        );
    }

    #[test]
    fn ce_prefix_is_accepted() {
        assert_eq!(
            extracted("S/N: CEXYZ987654321"),
            Some("CEXYZ987654321".to_string())
        );
    }

    #[test]
    fn no_serial_yields_none() {
        assert_eq!(extracted(""), None);
        assert_eq!(extracted("QUALITY CONTROL PASSED 2024-05-01"), None);
        assert_eq!(extracted("S/N:"), None);
    }
}
