//! Regex patterns for serial number extraction.
//!
//! All patterns run against text that has already been uppercased by
//! [`normalize`](super::normalize::normalize) or collapsed by
//! [`compact`](super::normalize::compact), so they are case-sensitive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "S/N" marker tolerant of OCR-broken separators (S.N, S N, S-N, ...),
    // immediately followed by a 14-character alphanumeric run.
    pub static ref MARKED_LOOSE: Regex = Regex::new(
        r"\bS[\s/\\.\-]*N[\s:]*([A-Z0-9]{14})\b"
    ).unwrap();

    // Literal "SN" marker followed by the 14-character run.
    pub static ref MARKED_STRICT: Regex = Regex::new(
        r"\bSN[\s:]*([A-Z0-9]{14})\b"
    ).unwrap();

    // Marker variants on compacted text. "S5N" covers the digit 5 standing in
    // for a misread slash glyph, "5N" a fully degraded "SN".
    pub static ref MARKED_COMPACT: Regex = Regex::new(
        r"(?:SN|S5N|5N)([A-Z0-9]{14})"
    ).unwrap();

    // Any marker occurrence, used to open a scan window after each one.
    pub static ref MARKER: Regex = Regex::new(
        r"\bS[\s/\\.\-]*N\b|\bSN\b|\bS5N\b|\b5N\b"
    ).unwrap();

    // A 14-character alphanumeric run inside a compacted window.
    pub static ref ALNUM_RUN: Regex = Regex::new(
        r"[A-Z0-9]{14}"
    ).unwrap();

    // A serial already in its final shape, no correction needed.
    pub static ref SERIAL_STRICT: Regex = Regex::new(
        r"[A-Z]{5}[0-9]{9}"
    ).unwrap();

    // 5 letters plus 9 alphanumerics; the suffix may still carry
    // letter-shaped digit misreads.
    pub static ref SERIAL_LOOSE: Regex = Regex::new(
        r"[A-Z]{5}[A-Z0-9]{9}"
    ).unwrap();

    // Full-string shape check used by the validator.
    pub static ref SERIAL_SHAPE: Regex = Regex::new(
        r"^[A-Z]{5}[0-9]{9}$"
    ).unwrap();
}
