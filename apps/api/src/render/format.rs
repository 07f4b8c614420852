//! Display formatting shared by every output format.

use chrono::NaiveDate;

/// Display labels for skill levels 1 through 5.
pub const SKILL_LEVEL_LABELS: [&str; 5] = ["Beginner", "Novice", "Intermediate", "Advanced", "Expert"];

/// Label used for any level outside 1..=5.
pub const FALLBACK_SKILL_LABEL: &str = "Intermediate";

/// Maps a 1–5 proficiency level to its label. Out-of-range levels fall back to
/// "Intermediate" rather than failing.
pub fn format_skill_level(level: u8) -> &'static str {
    (level as usize)
        .checked_sub(1)
        .and_then(|index| SKILL_LEVEL_LABELS.get(index))
        .copied()
        .unwrap_or(FALLBACK_SKILL_LABEL)
}

/// `"Rust (Expert)"`
pub fn format_skill_with_level(name: &str, level: u8) -> String {
    format!("{name} ({})", format_skill_level(level))
}

/// Formats a `YYYY-MM` month as `"Mon YYYY"`.
///
/// Empty input yields an empty string. Anything that is not a valid year-month is
/// returned trimmed and otherwise untouched.
pub fn format_date(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// `"Jan 2020 - Present"` for current roles, `"Jan 2020 - Mar 2022"` otherwise.
/// The end date is never consulted when `current` is set.
pub fn format_date_range(start: &str, end: &str, current: bool) -> String {
    let end = if current {
        "Present".to_string()
    } else {
        format_date(end)
    };
    format!("{} - {}", format_date(start), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_labels() {
        assert_eq!(format_skill_level(1), "Beginner");
        assert_eq!(format_skill_level(2), "Novice");
        assert_eq!(format_skill_level(3), "Intermediate");
        assert_eq!(format_skill_level(4), "Advanced");
        assert_eq!(format_skill_level(5), "Expert");
    }

    #[test]
    fn test_skill_level_out_of_range_falls_back() {
        assert_eq!(format_skill_level(0), "Intermediate");
        assert_eq!(format_skill_level(6), "Intermediate");
        assert_eq!(format_skill_level(u8::MAX), "Intermediate");
    }

    #[test]
    fn test_skill_with_level() {
        assert_eq!(format_skill_with_level("Rust", 5), "Rust (Expert)");
        assert_eq!(format_skill_with_level("Go", 9), "Go (Intermediate)");
    }

    #[test]
    fn test_format_date_month() {
        assert_eq!(format_date("2021-03"), "Mar 2021");
        assert_eq!(format_date(" 2019-12 "), "Dec 2019");
    }

    #[test]
    fn test_format_date_empty() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("   "), "");
    }

    #[test]
    fn test_format_date_unparseable_passes_through() {
        assert_eq!(format_date("2020"), "2020");
        assert_eq!(format_date("Spring 2020"), "Spring 2020");
        assert_eq!(format_date("2020-13"), "2020-13");
    }

    #[test]
    fn test_date_range_current_ignores_end() {
        assert_eq!(format_date_range("2020-01", "2022-05", true), "Jan 2020 - Present");
        assert_eq!(format_date_range("2020-01", "2022-05", false), "Jan 2020 - May 2022");
        assert_eq!(format_date_range("2020-01", "", false), "Jan 2020 - ");
    }
}
