//! The fixed list of package parts. Each part is a pure function of its `PartContext`.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;

use crate::export::docx::body::document_xml;
use crate::models::resume::ResumeRecord;
use crate::render::Theme;

/// Written into core and app properties as the producing application.
pub const APPLICATION_NAME: &str = "AI Resume Builder";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const WORDPROCESSINGML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub struct PartContext<'a> {
    pub record: &'a ResumeRecord,
    pub theme: Theme,
    pub exported_at: DateTime<Utc>,
}

impl PartContext<'_> {
    pub fn display_name(&self) -> &str {
        self.record.personal_info.full_name.trim()
    }
}

pub struct DocxPart {
    pub path: &'static str,
    pub render: fn(&PartContext) -> String,
}

/// Every part of the package, in the order it is written.
pub const DOCX_PARTS: &[DocxPart] = &[
    DocxPart { path: "[Content_Types].xml", render: content_types },
    DocxPart { path: "_rels/.rels", render: package_rels },
    DocxPart { path: "word/document.xml", render: document_xml },
    DocxPart { path: "word/_rels/document.xml.rels", render: document_rels },
    DocxPart { path: "word/styles.xml", render: styles },
    DocxPart { path: "word/settings.xml", render: settings },
    DocxPart { path: "word/webSettings.xml", render: web_settings },
    DocxPart { path: "word/fontTable.xml", render: font_table },
    DocxPart { path: "docProps/core.xml", render: core_properties },
    DocxPart { path: "docProps/app.xml", render: app_properties },
];

/// Escapes `& < > " '` for element text and attribute values.
pub fn xml_text(text: &str) -> String {
    escape(text).into_owned()
}

/// `"{name} Resume - {Theme} Template"`
pub fn document_title(ctx: &PartContext) -> String {
    format!(
        "{} Resume - {} Template",
        ctx.display_name(),
        ctx.theme.display_name()
    )
}

fn content_types(_: &PartContext) -> String {
    let ct = "application/vnd.openxmlformats-officedocument";
    format!(
        r#"{XML_DECLARATION}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="{ct}.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="{ct}.wordprocessingml.styles+xml"/>
  <Override PartName="/word/settings.xml" ContentType="{ct}.wordprocessingml.settings+xml"/>
  <Override PartName="/word/webSettings.xml" ContentType="{ct}.wordprocessingml.webSettings+xml"/>
  <Override PartName="/word/fontTable.xml" ContentType="{ct}.wordprocessingml.fontTable+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="{ct}.extended-properties+xml"/>
</Types>"#
    )
}

fn package_rels(_: &PartContext) -> String {
    let rel = "http://schemas.openxmlformats.org";
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{rel}/package/2006/relationships">
  <Relationship Id="rId1" Type="{rel}/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="{rel}/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="{rel}/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
    )
}

fn document_rels(_: &PartContext) -> String {
    let rel = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{rel}/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="{rel}/settings" Target="settings.xml"/>
  <Relationship Id="rId3" Type="{rel}/webSettings" Target="webSettings.xml"/>
  <Relationship Id="rId4" Type="{rel}/fontTable" Target="fontTable.xml"/>
</Relationships>"#
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Styles and fonts
// ────────────────────────────────────────────────────────────────────────────

struct ParagraphStyle {
    id: &'static str,
    name: &'static str,
    spacing: &'static str,
    font: &'static str,
    half_points: u32,
    color: Option<&'static str>,
}

const PARAGRAPH_STYLES: [ParagraphStyle; 4] = [
    ParagraphStyle {
        id: "Normal",
        name: "Normal",
        spacing: r#"w:after="200" w:line="276" w:lineRule="auto""#,
        font: "Calibri",
        half_points: 22,
        color: None,
    },
    ParagraphStyle {
        id: "Heading1",
        name: "heading 1",
        spacing: r#"w:before="480" w:after="0""#,
        font: "Calibri Light",
        half_points: 32,
        color: Some("2F5496"),
    },
    ParagraphStyle {
        id: "Heading2",
        name: "heading 2",
        spacing: r#"w:before="200" w:after="0""#,
        font: "Calibri Light",
        half_points: 26,
        color: Some("2F5496"),
    },
    ParagraphStyle {
        id: "Heading3",
        name: "heading 3",
        spacing: r#"w:before="200" w:after="0""#,
        font: "Calibri Light",
        half_points: 24,
        color: Some("1F3763"),
    },
];

fn styles(_: &PartContext) -> String {
    let mut out = format!("{XML_DECLARATION}\n<w:styles xmlns:w=\"{WORDPROCESSINGML_NS}\">\n");
    for style in &PARAGRAPH_STYLES {
        let default = if style.id == "Normal" { r#" w:default="1""# } else { "" };
        let color = style
            .color
            .map(|c| format!("\n      <w:color w:val=\"{c}\"/>"))
            .unwrap_or_default();
        out.push_str(&format!(
            r#"  <w:style w:type="paragraph" w:styleId="{id}"{default}>
    <w:name w:val="{name}"/>
    <w:pPr>
      <w:spacing {spacing}/>
    </w:pPr>
    <w:rPr>
      <w:rFonts w:ascii="{font}" w:eastAsia="{font}" w:hAnsi="{font}" w:cs="{font}"/>
      <w:sz w:val="{size}"/>
      <w:szCs w:val="{size}"/>{color}
    </w:rPr>
  </w:style>
"#,
            id = style.id,
            name = style.name,
            spacing = style.spacing,
            font = style.font,
            size = style.half_points,
        ));
    }
    out.push_str("</w:styles>");
    out
}

fn settings(_: &PartContext) -> String {
    format!(
        "{XML_DECLARATION}\n<w:settings xmlns:w=\"{WORDPROCESSINGML_NS}\">\n  <w:zoom w:percent=\"100\"/>\n</w:settings>"
    )
}

fn web_settings(_: &PartContext) -> String {
    format!(
        "{XML_DECLARATION}\n<w:webSettings xmlns:w=\"{WORDPROCESSINGML_NS}\">\n  <w:optimizeForBrowser/>\n</w:webSettings>"
    )
}

/// (name, panose) for each embedded font declaration.
const FONTS: [(&str, &str); 2] = [
    ("Calibri", "020F0502020204030204"),
    ("Calibri Light", "020F0302020204030204"),
];

fn font_table(_: &PartContext) -> String {
    let mut out = format!("{XML_DECLARATION}\n<w:fonts xmlns:w=\"{WORDPROCESSINGML_NS}\">\n");
    for (name, panose) in FONTS {
        out.push_str(&format!(
            r#"  <w:font w:name="{name}">
    <w:panose1 w:val="{panose}"/>
    <w:charset w:val="00"/>
    <w:family w:val="swiss"/>
    <w:pitch w:val="variable"/>
    <w:sig w:usb0="E00002FF" w:usb1="4000ACFF" w:usb2="00000001" w:usb3="00000000" w:csb0="0000019F" w:csb1="00000000"/>
  </w:font>
"#
        ));
    }
    out.push_str("</w:fonts>");
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Document properties
// ────────────────────────────────────────────────────────────────────────────

fn core_properties(ctx: &PartContext) -> String {
    let stamp = ctx.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        r#"{XML_DECLARATION}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{title}</dc:title>
  <dc:creator>{APPLICATION_NAME}</dc:creator>
  <dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>
</cp:coreProperties>"#,
        title = xml_text(&document_title(ctx)),
    )
}

fn app_properties(_: &PartContext) -> String {
    format!(
        r#"{XML_DECLARATION}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>{APPLICATION_NAME}</Application>
  <DocSecurity>0</DocSecurity>
  <ScaleCrop>false</ScaleCrop>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>1.0000</AppVersion>
</Properties>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_ctx(record: &ResumeRecord) -> PartContext<'_> {
        PartContext {
            record,
            theme: Theme::Creative,
            exported_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_part_paths_are_unique_and_complete() {
        let mut paths: Vec<&str> = DOCX_PARTS.iter().map(|p| p.path).collect();
        assert_eq!(paths.len(), 10);
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), 10);
        assert!(paths.contains(&"word/document.xml"));
    }

    #[test]
    fn test_core_properties_title_and_timestamps() {
        let mut record = ResumeRecord::default();
        record.personal_info.full_name = "Ada <Lovelace>".to_string();
        let xml = core_properties(&make_ctx(&record));
        assert!(xml.contains("<dc:title>Ada &lt;Lovelace&gt; Resume - Creative Template</dc:title>"));
        assert!(xml.contains(">2024-03-09T14:05:00.000Z</dcterms:created>"));
        assert!(xml.contains(">2024-03-09T14:05:00.000Z</dcterms:modified>"));
    }

    #[test]
    fn test_styles_declare_all_paragraph_styles() {
        let xml = styles(&make_ctx(&ResumeRecord::default()));
        for id in ["Normal", "Heading1", "Heading2", "Heading3"] {
            assert!(xml.contains(&format!("w:styleId=\"{id}\"")), "missing {id}");
        }
        assert_eq!(xml.matches("w:default=\"1\"").count(), 1);
        assert!(xml.contains("<w:color w:val=\"1F3763\"/>"));
    }

    #[test]
    fn test_xml_text_escapes_all_five() {
        assert_eq!(xml_text(r#"<a & "b" 'c'>"#), "&lt;a &amp; &quot;b&quot; &apos;c&apos;&gt;");
    }
}
