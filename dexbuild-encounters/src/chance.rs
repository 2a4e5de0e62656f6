//! Encounter-chance parsing.
//!
//! The export stores chances three ways depending on the game's data:
//! percent strings (`"20%"`), fractions of one (`0.2`), and plain
//! percentages (`20`). Everything normalizes onto a 0-100 scale.

/// Parse a chance value onto a 0-100 scale.
///
/// A trailing `%` means the number is already a percentage. Plain
/// numbers in `[0, 1]` are read as fractions of one and scaled up;
/// anything larger is taken as a percentage as-is. A true 1% stored as
/// `1.0` can't be told apart from 100% stored the same way, and the
/// fraction reading wins at that boundary. Unparsable text gives `None`.
pub fn parse_percentish(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(prefix) = trimmed.strip_suffix('%') {
        return prefix.trim().parse::<f64>().ok();
    }

    let number = trimmed.parse::<f64>().ok()?;
    if (0.0..=1.0).contains(&number) {
        Some(number * 100.0)
    } else {
        Some(number)
    }
}
