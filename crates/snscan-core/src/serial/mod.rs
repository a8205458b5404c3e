//! Serial number extraction and validation.
//!
//! Equipment serials are 14 characters: a 5-letter product code followed by
//! 9 digits. The first two letters identify the product family and must be in
//! a configured allow-list.

mod extract;
pub mod normalize;
mod password;
pub mod patterns;

pub use extract::SerialExtractor;
pub use normalize::{compact, fix_digit_confusions, normalize};
pub use password::derive_password;

use serde::Serialize;
use std::fmt;

use crate::error::SerialError;
use patterns::SERIAL_SHAPE;

/// A validated 14-character serial number (5 letters + 9 digits).
///
/// Can only be constructed through [`SerialValidator`], so holding one is
/// proof the shape and prefix constraints hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// The full 14-character serial.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 2-letter product family prefix.
    pub fn prefix(&self) -> &str {
        &self.0[..2]
    }

    /// The 5-letter product code.
    pub fn letters(&self) -> &str {
        &self.0[..5]
    }

    /// The 9-digit suffix.
    pub fn digits(&self) -> &str {
        &self.0[5..]
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates serial number candidates against the shape and prefix rules.
#[derive(Debug, Clone)]
pub struct SerialValidator {
    allowed_prefixes: Vec<String>,
}

impl SerialValidator {
    /// Create a validator accepting the given 2-letter prefixes.
    pub fn new(allowed_prefixes: Vec<String>) -> Self {
        Self { allowed_prefixes }
    }

    /// The accepted prefixes.
    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    /// Check whether a candidate is a well-formed serial with an allowed prefix.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.validate(candidate).is_ok()
    }

    /// Validate a candidate, producing a [`SerialNumber`] on success.
    pub fn validate(&self, candidate: &str) -> Result<SerialNumber, SerialError> {
        if !SERIAL_SHAPE.is_match(candidate) {
            return Err(SerialError::Malformed(candidate.to_string()));
        }
        let prefix = &candidate[..2];
        if !self.allowed_prefixes.iter().any(|p| p == prefix) {
            return Err(SerialError::DisallowedPrefix {
                serial: candidate.to_string(),
                prefix: prefix.to_string(),
            });
        }
        Ok(SerialNumber(candidate.to_string()))
    }
}

impl Default for SerialValidator {
    fn default() -> Self {
        Self::new(crate::config::SerialConfig::default().allowed_prefixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_serial() {
        let validator = SerialValidator::default();
        let serial = validator.validate("PCABC123456789").unwrap();
        assert_eq!(serial.as_str(), "PCABC123456789");
        assert_eq!(serial.prefix(), "PC");
        assert_eq!(serial.letters(), "PCABC");
        assert_eq!(serial.digits(), "123456789");
    }

    #[test]
    fn rejects_wrong_length() {
        let validator = SerialValidator::default();
        assert!(!validator.is_valid("PCABC12345678"));
        assert!(!validator.is_valid("PCABC1234567890"));
        assert!(!validator.is_valid(""));
    }

    #[test]
    fn rejects_wrong_shape() {
        let validator = SerialValidator::default();
        // Lowercase residue.
        assert!(!validator.is_valid("pcabc123456789"));
        // Letter in the digit suffix.
        assert!(!validator.is_valid("PCABCO23456789"));
        // Digit in the letter prefix.
        assert!(!validator.is_valid("PC1BC123456789"));
        // Interior separator.
        assert!(!validator.is_valid("PCABC-12345678"));
    }

    #[test]
    fn rejects_disallowed_prefix() {
        let validator = SerialValidator::default();
        let err = validator.validate("XXABC123456789").unwrap_err();
        assert!(matches!(
            err,
            SerialError::DisallowedPrefix { ref prefix, .. } if prefix == "XX"
        ));
    }

    #[test]
    fn custom_prefix_list() {
        let validator = SerialValidator::new(vec!["QA".to_string()]);
        assert!(validator.is_valid("QAXYZ000000001"));
        assert!(!validator.is_valid("PCABC123456789"));
    }
}
