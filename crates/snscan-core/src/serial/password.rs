//! BIOS password derivation.

use super::SerialNumber;

/// Derive the BIOS unlock password for a validated serial.
///
/// The password is the 2-letter prefix followed by the product of the first
/// and last 3-digit groups of the 9-digit suffix (the middle group is
/// unused). The groups are parsed as plain integers, so leading zeros
/// collapse, and the product is formatted in decimal with no padding.
/// Downstream unlock tooling depends on the exact digit string, so this must
/// stay bit-exact.
pub fn derive_password(serial: &SerialNumber) -> String {
    let digits = serial.digits();
    let first = parse_group(&digits[..3]);
    let last = parse_group(&digits[6..]);
    format!("{}{}", serial.prefix(), first * last)
}

fn parse_group(digits: &str) -> u64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + u64::from(d))
}
