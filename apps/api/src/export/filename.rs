use crate::export::ExportFormat;
use crate::render::Theme;

/// Lowercase slug of a person's name: whitespace runs become `-`, then anything outside
/// `[a-z0-9-]` is dropped. Leading and trailing hyphens left behind by dropped words are
/// trimmed.
pub fn name_slug(full_name: &str) -> String {
    let slug: String = full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    slug.trim_matches('-').to_string()
}

/// `"{slug}-resume-{theme}"`, or `"resume-{theme}"` when the name yields no slug.
pub fn export_basename(full_name: &str, theme: Theme) -> String {
    match name_slug(full_name) {
        slug if slug.is_empty() => format!("resume-{theme}"),
        slug => format!("{slug}-resume-{theme}"),
    }
}

pub fn export_filename(full_name: &str, theme: Theme, format: ExportFormat) -> String {
    format!("{}.{}", export_basename(full_name, theme), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_strips_punctuation() {
        assert_eq!(name_slug("Jane O'Brien!!"), "jane-obrien");
        assert_eq!(
            export_filename("Jane O'Brien!!", Theme::Modern, ExportFormat::Html),
            "jane-obrien-resume-modern.html"
        );
    }

    #[test]
    fn test_slug_collapses_whitespace() {
        assert_eq!(name_slug("  Mary   Ann\tSmith "), "mary-ann-smith");
    }

    #[test]
    fn test_slug_drops_non_ascii() {
        assert_eq!(name_slug("José Núñez"), "jos-nez");
    }

    #[test]
    fn test_empty_name_falls_back() {
        assert_eq!(export_basename("", Theme::Creative), "resume-creative");
        assert_eq!(export_basename("!!!", Theme::Professional), "resume-professional");
        assert_eq!(
            export_filename("   ", Theme::Professional, ExportFormat::Pdf),
            "resume-professional.pdf"
        );
    }

    #[test]
    fn test_punctuation_only_words_leave_no_stray_hyphens() {
        assert_eq!(name_slug("!! ??"), "");
        assert_eq!(
            export_filename("!! ??", Theme::Modern, ExportFormat::Html),
            "resume-modern.html"
        );
        assert_eq!(name_slug("¿ Ada Lovelace !"), "ada-lovelace");
    }
}
