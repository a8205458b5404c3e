//! Text normalization for OCR output.

/// Normalize one blob of recognized text for pattern matching.
///
/// Backslashes become slashes ("S\N" is a common misread of "S/N"), the
/// Unicode en-dash becomes an ASCII hyphen, and every character outside
/// letters, digits, whitespace and `/ : . -` is replaced with a space.
/// The result is uppercased and trimmed.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = match c {
            '\\' => '/',
            '\u{2013}' => '-',
            other => other,
        };
        if c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '/' | ':' | '.' | '-') {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Collapse a span into a dense character run by removing whitespace and the
/// separator characters `. : / \ -`.
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | ':' | '/' | '\\' | '-'))
        .collect()
}

/// Replace letter glyphs that OCR commonly substitutes for digits.
///
/// Applied only to the digit suffix of a candidate serial; the letter prefix
/// is genuine letters and must not be touched.
pub fn fix_digit_confusions(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'i' | 'l' | 'L' => '1',
            'B' => '8',
            'S' => '5',
            'Z' => '2',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize("  s/n: pcabc123456789  "), "S/N: PCABC123456789");
    }

    #[test]
    fn normalize_replaces_backslash_and_en_dash() {
        assert_eq!(normalize(r"S\N"), "S/N");
        assert_eq!(normalize("A\u{2013}B"), "A-B");
    }

    #[test]
    fn normalize_strips_noise_to_spaces() {
        assert_eq!(normalize("S/N* PC_123"), "S/N  PC 123");
        // Non-Latin glyphs misrecognized by OCR are dropped too.
        assert_eq!(normalize("№PC"), "PC");
    }

    #[test]
    fn compact_removes_all_separators() {
        assert_eq!(compact("S / N : P.C-A\\B"), "SNPCAB");
        assert_eq!(compact("PC ABC\t123\n456"), "PCABC123456");
    }

    #[test]
    fn confusion_fix_maps_known_glyphs() {
        assert_eq!(fix_digit_confusions("O1I00S8OO"), "011005800");
        assert_eq!(fix_digit_confusions("oIlLiBSZ"), "01111852");
    }

    #[test]
    fn confusion_fix_is_idempotent() {
        let once = fix_digit_confusions("O1I00S8OO");
        assert_eq!(fix_digit_confusions(&once), once);
    }

    #[test]
    fn confusion_fix_leaves_unmapped_letters() {
        assert_eq!(fix_digit_confusions("F12345678"), "F12345678");
    }
}
