//! DOCX export: a WordprocessingML package assembled from `parts::DOCX_PARTS`.

pub mod body;
pub mod parts;

use std::io::{Cursor, Write};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::{DocumentExporter, ExportArtifact, ExportFormat, ExporterError};
use crate::models::resume::ResumeRecord;
use crate::render::Theme;

pub use parts::{PartContext, DOCX_PARTS};

/// Renders every part for `exported_at`. Pure: the same inputs give the same parts.
pub fn render_parts(
    record: &ResumeRecord,
    theme: Theme,
    exported_at: DateTime<Utc>,
) -> Vec<(&'static str, String)> {
    let ctx = PartContext {
        record,
        theme,
        exported_at,
    };
    DOCX_PARTS
        .iter()
        .map(|part| (part.path, (part.render)(&ctx)))
        .collect()
}

/// Zips named parts into one archive.
pub fn pack(parts: &[(&str, String)]) -> Result<Vec<u8>, ExporterError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, content) in parts {
        zip.start_file(*path, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

pub async fn to_docx(record: &ResumeRecord, theme: Theme) -> Result<Vec<u8>, ExporterError> {
    let parts = render_parts(record, theme, Utc::now());
    let bytes = tokio::task::spawn_blocking(move || pack(&parts)).await??;
    info!(theme = %theme, size = bytes.len(), "DOCX packaged");
    Ok(bytes)
}

pub struct DocxExporter;

#[async_trait]
impl DocumentExporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    async fn export(
        &self,
        record: &ResumeRecord,
        theme: Theme,
    ) -> Result<ExportArtifact, ExporterError> {
        let bytes = to_docx(record, theme).await?;
        Ok(ExportArtifact::new(record, theme, ExportFormat::Docx, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use quick_xml::events::Event;
    use quick_xml::Reader;
    use zip::ZipArchive;

    use crate::models::resume::{
        EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, SkillItem, Skills,
    };

    fn make_record(name: &str) -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: name.to_string(),
                email: "a@b.co".to_string(),
                summary: "Ships <fast> & \"often\"".to_string(),
                ..PersonalInfo::default()
            },
            experience: vec![ExperienceEntry {
                company: "R&D <Labs>".to_string(),
                position: "Engineer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: "2022-06".to_string(),
                achievements: vec!["Cut p99 < 5ms".to_string()],
                ..ExperienceEntry::default()
            }],
            education: vec![EducationEntry {
                institution: "MIT".to_string(),
                degree: "BSc".to_string(),
                field: "CS".to_string(),
                graduation_year: "2019".to_string(),
                gpa: Some("3.9".to_string()),
                ..EducationEntry::default()
            }],
            skills: Skills {
                technical: vec![SkillItem::new("Rust", 4)],
                ..Skills::default()
            },
            ..ResumeRecord::default()
        }
    }

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    /// Parses the whole document and returns its concatenated, unescaped text.
    fn parse_text(xml: &str) -> String {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Text(t) => text.push_str(&t.unescape().unwrap()),
                Event::Eof => break,
                _ => {}
            }
        }
        text
    }

    #[tokio::test]
    async fn test_package_contains_every_part() {
        let bytes = to_docx(&make_record("Ada"), Theme::Professional).await.unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        let mut expected: Vec<&str> = DOCX_PARTS.iter().map(|p| p.path).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_special_characters_are_escaped_and_well_formed() {
        let bytes = to_docx(&make_record("O'Neil & \"Sons\""), Theme::Modern).await.unwrap();
        let document = read_part(&bytes, "word/document.xml");

        assert!(document.contains("R&amp;D &lt;Labs&gt;"));
        assert!(document.contains("Ships &lt;fast&gt; &amp; &quot;often&quot;"));
        assert!(!document.contains("<Labs>"));

        let text = parse_text(&document);
        assert!(text.contains("Engineer - R&D <Labs>"));
        assert!(text.contains("• Cut p99 < 5ms"));
        assert!(text.contains("O'Neil & \"Sons\" - Modern Template"));

        for part in DOCX_PARTS {
            parse_text(&read_part(&bytes, part.path));
        }
    }

    #[tokio::test]
    async fn test_core_title_names_the_template() {
        let bytes = to_docx(&make_record("Ada Lovelace"), Theme::Creative).await.unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Ada Lovelace Resume - Creative Template</dc:title>"));
    }

    #[test]
    fn test_empty_sections_are_not_emitted() {
        let mut record = make_record("Ada");
        record.education.clear();
        record.projects = vec![ProjectEntry {
            name: "Analytical Engine".to_string(),
            link: Some("https://example.com/engine".to_string()),
            ..ProjectEntry::default()
        }];
        let parts = render_parts(&record, Theme::Professional, Utc::now());
        let (_, document) = parts
            .iter()
            .find(|(path, _)| *path == "word/document.xml")
            .unwrap();

        assert!(!document.contains(">Education</w:t>"));
        assert!(!document.contains("GPA"));
        assert!(document.contains(">Projects</w:t>"));
        assert!(document.contains(">Link: https://example.com/engine</w:t>"));
    }

    #[tokio::test]
    async fn test_exporter_names_artifact() {
        let artifact = DocxExporter
            .export(&make_record("Ada Lovelace"), Theme::Modern)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "ada-lovelace-resume-modern.docx");
        assert!(artifact.bytes.starts_with(b"PK"));
    }
}
