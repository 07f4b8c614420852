//! `word/document.xml`: the resume emitted as a flat run of styled paragraphs.

use crate::export::docx::parts::{xml_text, PartContext};
use crate::render::format::format_skill_with_level;
use crate::render::{render, DocumentTree, SectionBody, SectionKind};
use crate::render::tree::{Entry, SkillGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphStyle {
    Normal,
    Heading1,
    Heading2,
    Heading3,
}

impl ParagraphStyle {
    fn id(&self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::Heading1 => "Heading1",
            ParagraphStyle::Heading2 => "Heading2",
            ParagraphStyle::Heading3 => "Heading3",
        }
    }
}

/// Accumulates `<w:p>` elements in document order.
#[derive(Default)]
struct BodyWriter {
    xml: String,
}

impl BodyWriter {
    fn paragraph(&mut self, style: ParagraphStyle, text: &str) {
        // Heading1 and Heading2 runs are bold on top of their style.
        let run_props = match style {
            ParagraphStyle::Heading1 | ParagraphStyle::Heading2 => "<w:rPr><w:b/></w:rPr>",
            _ => "",
        };
        self.xml.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r>{run_props}<w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            style.id(),
            xml_text(text)
        ));
    }

    fn normal(&mut self, text: &str) {
        self.paragraph(ParagraphStyle::Normal, text);
    }

    fn blank(&mut self) {
        self.normal("");
    }
}

pub fn document_xml(ctx: &PartContext) -> String {
    let tree = render(ctx.record, ctx.theme);
    let mut body = BodyWriter::default();
    write_body(&mut body, &tree);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body></w:document>"#,
        body.xml
    )
}

fn write_body(body: &mut BodyWriter, tree: &DocumentTree) {
    body.paragraph(
        ParagraphStyle::Heading1,
        &format!("{} - {} Template", tree.header.name, tree.theme.display_name()),
    );

    let contact_line = tree
        .header
        .contacts
        .iter()
        .map(|c| c.value.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    if !contact_line.is_empty() {
        body.normal(&contact_line);
    }
    body.blank();

    // Word output is single-column: sections follow reading order, not the theme's regions.
    for section in SectionKind::ALL.iter().filter_map(|kind| tree.section(*kind)) {
        body.paragraph(ParagraphStyle::Heading2, section.heading);
        match &section.body {
            SectionBody::Text(text) => {
                body.normal(text);
                body.blank();
            }
            SectionBody::Entries(entries) => {
                for entry in entries {
                    write_entry(body, entry);
                    body.blank();
                }
            }
            SectionBody::Skills(groups) => {
                for group in groups {
                    write_skill_group(body, group);
                }
                body.blank();
            }
        }
    }
}

fn write_entry(body: &mut BodyWriter, entry: &Entry) {
    let title = match entry.subtitle.trim() {
        "" => entry.title.clone(),
        subtitle => format!("{} - {subtitle}", entry.title),
    };
    body.paragraph(ParagraphStyle::Heading3, &title);

    if !entry.date.is_empty() {
        body.normal(&entry.date);
    }
    for detail in &entry.details {
        body.normal(detail);
    }
    if let Some(description) = &entry.description {
        body.normal(description);
    }
    if !entry.achievements.is_empty() {
        body.normal("Key Achievements:");
        for achievement in &entry.achievements {
            body.normal(&format!("• {achievement}"));
        }
    }
    if !entry.tags.is_empty() {
        body.normal(&format!("Technologies: {}", entry.tags.join(", ")));
    }
    if let Some(link) = &entry.link {
        body.normal(&format!("Link: {}", link.href));
    }
}

fn write_skill_group(body: &mut BodyWriter, group: &SkillGroup) {
    body.paragraph(ParagraphStyle::Heading3, &format!("{}:", skill_group_title(group)));
    let line = group
        .skills
        .iter()
        .map(|s| format_skill_with_level(&s.name, s.level))
        .collect::<Vec<_>>()
        .join(", ");
    body.normal(&line);
}

fn skill_group_title(group: &SkillGroup) -> &'static str {
    match group.label {
        "Technical" => "Technical Skills",
        label => label,
    }
}
