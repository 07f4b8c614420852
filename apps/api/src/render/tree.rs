//! Semantic document tree produced by the renderer.
//!
//! The tree carries already-formatted display strings. Exporters decide markup; they never
//! re-derive dates, labels or section presence.

use crate::models::resume::{non_blank, ResumeRecord};
use crate::render::theme::Theme;

#[derive(Debug, Clone)]
pub struct DocumentTree {
    pub theme: Theme,
    pub header: Header,
    /// Regions in display order. A region never holds zero sections.
    pub regions: Vec<Region>,
}

impl DocumentTree {
    /// All sections across regions, in display order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.regions.iter().flat_map(|r| r.sections.iter())
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections().find(|s| s.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub contacts: Vec<ContactItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    Phone,
    Location,
    Website,
    LinkedIn,
}

impl ContactKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ContactKind::Email => "📧",
            ContactKind::Phone => "📞",
            ContactKind::Location => "📍",
            ContactKind::Website => "🌐",
            ContactKind::LinkedIn => "💼",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactItem {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Main,
    Sidebar,
    Grid,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub kind: RegionKind,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    /// The single section-presence rule used by every theme and every format:
    /// a section exists only when its backing data is non-empty.
    pub fn is_present(&self, record: &ResumeRecord) -> bool {
        match self {
            SectionKind::Summary => !record.personal_info.summary.trim().is_empty(),
            SectionKind::Experience => !record.experience.is_empty(),
            SectionKind::Education => !record.education.is_empty(),
            SectionKind::Skills => !record.skills.is_empty(),
            SectionKind::Projects => !record.projects.is_empty(),
            SectionKind::Certifications => !record.certifications.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone)]
pub enum SectionBody {
    Text(String),
    Entries(Vec<Entry>),
    Skills(Vec<SkillGroup>),
}

/// One experience, education, project or certification item.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    /// Secondary facts such as a GPA line.
    pub details: Vec<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub tags: Vec<String>,
    pub link: Option<EntryLink>,
}

#[derive(Debug, Clone)]
pub struct EntryLink {
    pub label: String,
    pub href: String,
}

impl EntryLink {
    /// Builds a link from an optional record field, skipping blank values.
    pub fn from_field(value: &Option<String>, label: Option<&str>) -> Option<Self> {
        non_blank(value).map(|href| EntryLink {
            label: label.unwrap_or(href).to_string(),
            href: href.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillBucket {
    Technical,
    Soft,
    Languages,
}

#[derive(Debug, Clone)]
pub struct SkillGroup {
    pub bucket: SkillBucket,
    pub label: &'static str,
    pub skills: Vec<RenderedSkill>,
}

#[derive(Debug, Clone)]
pub struct RenderedSkill {
    pub name: String,
    pub level: u8,
    pub label: &'static str,
}
