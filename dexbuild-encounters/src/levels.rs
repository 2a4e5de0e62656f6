//! Level-range extraction from the export's free-text `levels` column.

/// Extract a level range from free text.
///
/// The column's shape varies by game: a bare number, a hyphenated range,
/// a comma-separated list, or prose. Every maximal run of ASCII digits
/// counts as a level, and the range is the min and max of those runs, so
/// `"12-14, 13"` gives `(Some(12), Some(14))`. Text with no digits gives
/// `(None, None)`.
pub fn parse_level_range(text: &str) -> (Option<u32>, Option<u32>) {
    let mut min: Option<u32> = None;
    let mut max: Option<u32> = None;

    for run in digit_runs(text) {
        let value = match run.parse::<u32>() {
            Ok(v) => v,
            // A run too long for u32 is corrupt data, not a level
            Err(_) => continue,
        };
        min = Some(min.map_or(value, |m| m.min(value)));
        max = Some(max.map_or(value, |m| m.max(value)));
    }

    (min, max)
}

/// Maximal runs of ASCII digits in `text`.
fn digit_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_number() {
        assert_eq!(parse_level_range("15"), (Some(15), Some(15)));
    }

    #[test]
    fn hyphenated_range() {
        assert_eq!(parse_level_range("12-14"), (Some(12), Some(14)));
    }

    #[test]
    fn list_takes_overall_min_and_max() {
        assert_eq!(parse_level_range("12-14, 13"), (Some(12), Some(14)));
        assert_eq!(parse_level_range("30, 5, 22"), (Some(5), Some(30)));
    }

    #[test]
    fn prose_with_embedded_numbers() {
        assert_eq!(parse_level_range("Lv. 30 to 35"), (Some(30), Some(35)));
    }

    #[test]
    fn no_digits_means_no_range() {
        assert_eq!(parse_level_range(""), (None, None));
        assert_eq!(parse_level_range("unknown"), (None, None));
        assert_eq!(parse_level_range("??"), (None, None));
    }

    #[test]
    fn digits_split_by_any_non_digit() {
        // "7.5" is two runs; the parser has no notion of decimals
        assert_eq!(parse_level_range("7.5"), (Some(5), Some(7)));
    }
}
