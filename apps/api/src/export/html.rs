//! Standalone HTML serialization of the document tree.
//!
//! The output embeds its stylesheet and references no external resources, so the same
//! string serves as the download, the preview and the rasterizer input.

use std::fmt::Write;

use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::export::{DocumentExporter, ExportArtifact, ExportFormat, ExporterError};
use crate::models::resume::ResumeRecord;
use crate::render::theme::{Palette, SkillIndicator};
use crate::render::tree::{ContactKind, Entry, Header, RegionKind, Section, SectionBody, SectionKind, SkillGroup};
use crate::render::{render, DocumentTree, Theme};

const BASE_STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; background: #f5f5f5; padding: 20px; color: #252525; }
.resume-container { max-width: 8.5in; margin: 0 auto; background: white; box-shadow: 0 4px 6px rgba(0,0,0,0.1); border-radius: 8px; overflow: hidden; min-height: 11in; padding: 2rem; }
.contact-item { display: flex; align-items: center; gap: 0.25rem; }
.entry-header { display: flex; justify-content: space-between; align-items: flex-start; gap: 1rem; margin-bottom: 0.5rem; }
.entry-meta { color: var(--muted); font-size: 0.875rem; }
.description, .summary { color: var(--text); margin-top: 0.5rem; line-height: 1.6; }
.achievements ul { margin-left: 1rem; margin-top: 0.5rem; }
.tags { margin-top: 0.5rem; }
.entry-link { margin-top: 0.5rem; }
.entry-link a { color: #2563eb; }
.skill-group { margin-bottom: 1rem; }
.skill-group h3 { font-weight: 600; color: var(--text); margin-bottom: 0.5rem; }
.skill-label { color: var(--muted); font-size: 0.75rem; margin-left: 0.5rem; }
.skill-indicator { display: inline-flex; align-items: center; gap: 0.25rem; }
.dot { width: 0.5rem; height: 0.5rem; border-radius: 50%; background: var(--indicator-off); display: inline-block; }
.dot.filled { background: var(--indicator-on); }
.star { color: var(--indicator-off); font-size: 0.75rem; }
.star.filled { color: var(--indicator-on); }
.bar { display: block; width: 100%; height: 0.5rem; border-radius: 9999px; background: var(--indicator-off); }
.bar-fill { display: block; height: 100%; border-radius: 9999px; background: linear-gradient(to right, var(--indicator-on), var(--accent-alt)); }
@media print {
  body { background: white; padding: 0; color: black; }
  .resume-container { box-shadow: none; border-radius: 0; }
}
@media (max-width: 768px) {
  body { padding: 10px; }
  .resume-container { padding: 1rem; }
}
"#;

/// Renders and serializes a record into a complete HTML document.
pub fn to_html(record: &ResumeRecord, theme: Theme) -> String {
    let tree = render(record, theme);
    let title = format!(
        "{} - Resume ({})",
        record.personal_info.full_name.trim(),
        theme.display_name()
    );
    serialize_document(&tree, &title)
}

/// Serializes an already-rendered tree.
pub fn serialize_document(tree: &DocumentTree, title: &str) -> String {
    let style = tree.theme.style();
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(out, "<title>{}</title>", encode_text(title));
    out.push_str("<style>\n");
    push_palette(&mut out, style.palette());
    out.push_str(BASE_STYLES);
    out.push_str(style.stylesheet());
    out.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(
        out,
        "<div class=\"resume-container theme-{}\">",
        tree.theme.as_str()
    );
    push_header(&mut out, &tree.header);
    let _ = writeln!(out, "<div class=\"layout {}\">", style.layout().css_class());
    for region in &tree.regions {
        let _ = writeln!(out, "<div class=\"region {}\">", region_class(region.kind));
        for section in &region.sections {
            push_section(&mut out, section, style.skill_indicator());
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n</div>\n</body>\n</html>\n");
    out
}

fn push_palette(out: &mut String, palette: &Palette) {
    out.push_str(":root {");
    for (name, value) in palette.tokens() {
        let _ = write!(out, " {name}: {value};");
    }
    out.push_str(" }\n");
}

fn region_class(kind: RegionKind) -> &'static str {
    match kind {
        RegionKind::Main => "region-main",
        RegionKind::Sidebar => "region-sidebar",
        RegionKind::Grid => "region-grid",
    }
}

fn section_class(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Summary => "section-summary",
        SectionKind::Experience => "section-experience",
        SectionKind::Education => "section-education",
        SectionKind::Skills => "section-skills",
        SectionKind::Projects => "section-projects",
        SectionKind::Certifications => "section-certifications",
    }
}

fn push_header(out: &mut String, header: &Header) {
    out.push_str("<header class=\"header\">\n");
    let _ = writeln!(out, "<h1>{}</h1>", encode_text(&header.name));
    if !header.contacts.is_empty() {
        out.push_str("<div class=\"contact-list\">\n");
        for contact in &header.contacts {
            let _ = writeln!(
                out,
                "<div class=\"contact-item {}\">{} {}</div>",
                contact_class(contact.kind),
                contact.kind.icon(),
                encode_text(&contact.value)
            );
        }
        out.push_str("</div>\n");
    }
    out.push_str("</header>\n");
}

fn contact_class(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Email => "contact-email",
        ContactKind::Phone => "contact-phone",
        ContactKind::Location => "contact-location",
        ContactKind::Website => "contact-website",
        ContactKind::LinkedIn => "contact-linkedin",
    }
}

fn push_section(out: &mut String, section: &Section, indicator: SkillIndicator) {
    let _ = writeln!(out, "<section class=\"section {}\">", section_class(section.kind));
    let _ = writeln!(
        out,
        "<div class=\"section-header\"><div class=\"section-bar\"></div><h2>{}</h2></div>",
        encode_text(section.heading)
    );
    match &section.body {
        SectionBody::Text(text) => {
            let _ = writeln!(out, "<p class=\"summary\">{}</p>", encode_text(text));
        }
        SectionBody::Entries(entries) => {
            for entry in entries {
                push_entry(out, entry);
            }
        }
        SectionBody::Skills(groups) => {
            for group in groups {
                push_skill_group(out, group, indicator);
            }
        }
    }
    out.push_str("</section>\n");
}

fn push_entry(out: &mut String, entry: &Entry) {
    out.push_str("<div class=\"entry\">\n<div class=\"entry-header\">\n<div>\n");
    let _ = writeln!(out, "<div class=\"entry-title\">{}</div>", encode_text(&entry.title));
    if !entry.subtitle.trim().is_empty() {
        let _ = writeln!(
            out,
            "<div class=\"entry-subtitle\">{}</div>",
            encode_text(&entry.subtitle)
        );
    }
    for detail in &entry.details {
        let _ = writeln!(out, "<div class=\"entry-meta\">{}</div>", encode_text(detail));
    }
    out.push_str("</div>\n");
    if !entry.date.trim().is_empty() {
        let _ = writeln!(out, "<div class=\"entry-date\">{}</div>", encode_text(&entry.date));
    }
    out.push_str("</div>\n");

    if let Some(description) = &entry.description {
        let _ = writeln!(out, "<div class=\"description\">{}</div>", encode_text(description));
    }
    if !entry.achievements.is_empty() {
        out.push_str("<div class=\"description achievements\">\n<strong>Key Achievements:</strong>\n<ul>\n");
        for achievement in &entry.achievements {
            let _ = writeln!(out, "<li>{}</li>", encode_text(achievement));
        }
        out.push_str("</ul>\n</div>\n");
    }
    if !entry.tags.is_empty() {
        out.push_str("<div class=\"tags\">");
        for tag in &entry.tags {
            let _ = write!(out, "<span class=\"tag\">{}</span>", encode_text(tag));
        }
        out.push_str("</div>\n");
    }
    if let Some(link) = &entry.link {
        let _ = writeln!(
            out,
            "<div class=\"entry-link\"><a href=\"{}\">{}</a></div>",
            encode_double_quoted_attribute(&link.href),
            encode_text(&link.label)
        );
    }
    out.push_str("</div>\n");
}

fn push_skill_group(out: &mut String, group: &SkillGroup, indicator: SkillIndicator) {
    out.push_str("<div class=\"skill-group\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", encode_text(group.label));
    for skill in &group.skills {
        let _ = write!(
            out,
            "<div class=\"skill\"><span class=\"skill-name\">{}</span><span class=\"skill-label\">{}</span>",
            encode_text(&skill.name),
            skill.label
        );
        push_indicator(out, indicator, skill.level);
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn push_indicator(out: &mut String, indicator: SkillIndicator, level: u8) {
    let filled = level.min(5);
    match indicator {
        SkillIndicator::Dots => {
            out.push_str("<span class=\"skill-indicator dots\">");
            for i in 1..=5 {
                let class = if i <= filled { "dot filled" } else { "dot" };
                let _ = write!(out, "<span class=\"{class}\"></span>");
            }
            out.push_str("</span>");
        }
        SkillIndicator::Stars => {
            out.push_str("<span class=\"skill-indicator stars\">");
            for i in 1..=5 {
                let class = if i <= filled { "star filled" } else { "star" };
                let _ = write!(out, "<span class=\"{class}\">★</span>");
            }
            out.push_str("</span>");
        }
        SkillIndicator::ProgressBar => {
            let percent = u32::from(filled) * 100 / 5;
            let _ = write!(
                out,
                "<span class=\"skill-indicator bar\"><span class=\"bar-fill\" style=\"width: {percent}%\"></span></span>"
            );
        }
    }
}

pub struct HtmlExporter;

#[async_trait]
impl DocumentExporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    async fn export(
        &self,
        record: &ResumeRecord,
        theme: Theme,
    ) -> Result<ExportArtifact, ExporterError> {
        let html = to_html(record, theme);
        Ok(ExportArtifact::new(record, theme, ExportFormat::Html, html.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, SkillItem, Skills,
    };

    fn make_minimal_record() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Katherine Johnson".to_string(),
                email: "kj@example.com".to_string(),
                ..PersonalInfo::default()
            },
            experience: vec![ExperienceEntry {
                company: "NASA".to_string(),
                position: "Mathematician".to_string(),
                start_date: "1953-06".to_string(),
                current: true,
                ..ExperienceEntry::default()
            }],
            skills: Skills {
                technical: vec![SkillItem::new("Orbital mechanics", 5)],
                ..Skills::default()
            },
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_minimal_record_renders_for_all_themes() {
        let record = make_minimal_record();
        for theme in Theme::ALL {
            let html = to_html(&record, theme);
            assert!(!html.is_empty());
            assert!(html.starts_with("<!DOCTYPE html>"), "{theme}");
            assert!(html.contains("Katherine Johnson"), "{theme}");
            assert!(!html.contains(">Education<"), "{theme}");
            assert!(html.contains(">Skills<"), "{theme}");
            assert!(html.ends_with("</html>\n"), "{theme}");
        }
    }

    #[test]
    fn test_education_heading_present_when_populated() {
        let mut record = make_minimal_record();
        record.education.push(EducationEntry {
            institution: "West Virginia State".to_string(),
            degree: "BS".to_string(),
            field: "Mathematics".to_string(),
            graduation_year: "1937".to_string(),
            ..EducationEntry::default()
        });
        for theme in Theme::ALL {
            assert!(to_html(&record, theme).contains(">Education<"), "{theme}");
        }
    }

    #[test]
    fn test_document_is_self_contained() {
        let html = to_html(&make_minimal_record(), Theme::Creative);
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(html.contains("<title>Katherine Johnson - Resume (Creative)</title>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut record = make_minimal_record();
        record.personal_info.full_name = "<script>alert(1)</script>".to_string();
        record.projects.push(ProjectEntry {
            name: "Tom & Jerry".to_string(),
            description: "Uses <b>bold</b> ideas".to_string(),
            link: Some("https://example.com/?a=1&b=\"2\"".to_string()),
            ..ProjectEntry::default()
        });
        let html = to_html(&record, Theme::Professional);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("Uses &lt;b&gt;bold&lt;/b&gt; ideas"));
        assert!(html.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_indicator_matches_theme() {
        let record = make_minimal_record();
        assert!(to_html(&record, Theme::Professional).contains("skill-indicator dots"));
        assert!(to_html(&record, Theme::Modern).contains("skill-indicator stars"));
        let creative = to_html(&record, Theme::Creative);
        assert!(creative.contains("skill-indicator bar"));
        assert!(creative.contains("width: 100%"));
    }

    #[test]
    fn test_out_of_range_level_clamps_indicator() {
        let mut out = String::new();
        push_indicator(&mut out, SkillIndicator::Dots, 9);
        assert_eq!(out.matches("dot filled").count(), 5);

        let mut out = String::new();
        push_indicator(&mut out, SkillIndicator::Stars, 0);
        assert_eq!(out.matches("star filled").count(), 0);
    }

    #[test]
    fn test_current_role_shows_present() {
        let html = to_html(&make_minimal_record(), Theme::Modern);
        assert!(html.contains("Jun 1953 - Present"));
    }

    #[tokio::test]
    async fn test_html_exporter_artifact() {
        let artifact = HtmlExporter
            .export(&make_minimal_record(), Theme::Professional)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "katherine-johnson-resume-professional.html");
        assert_eq!(artifact.mime_type, "text/html");
        assert!(String::from_utf8(artifact.bytes).unwrap().contains("Katherine Johnson"));
    }
}
