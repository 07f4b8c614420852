//! The resume record handed to the export subsystem by the editing layer.
//!
//! The wire shape mirrors the editor's draft format (camelCase keys). Export treats a record
//! as a read-only snapshot: nothing in this crate mutates one after deserialization.

use serde::{Deserialize, Serialize};

/// Skill level assigned to legacy drafts whose skills were stored as plain strings.
pub const DEFAULT_SKILL_LEVEL: u8 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Skills,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(rename = "linkedIn")]
    pub linked_in: String,
    pub website: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub position: String,
    /// `YYYY-MM`, possibly empty.
    pub start_date: String,
    /// `YYYY-MM`, possibly empty. Ignored when `current` is set.
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<SkillItem>,
    pub soft: Vec<SkillItem>,
    pub languages: Vec<SkillItem>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.languages.is_empty()
    }
}

/// A named skill with a 1–5 proficiency level.
///
/// The level is not range-checked here; rendering maps out-of-range values to a fallback
/// label instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SkillItemRepr")]
pub struct SkillItem {
    pub name: String,
    pub level: u8,
}

impl SkillItem {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Accepts both the current `{name, level}` object and the legacy bare-string form.
#[derive(Deserialize)]
#[serde(untagged)]
enum SkillItemRepr {
    Legacy(String),
    Rated {
        name: String,
        #[serde(default = "default_skill_level")]
        level: u8,
    },
}

fn default_skill_level() -> u8 {
    DEFAULT_SKILL_LEVEL
}

impl From<SkillItemRepr> for SkillItem {
    fn from(repr: SkillItemRepr) -> Self {
        match repr {
            SkillItemRepr::Legacy(name) => SkillItem::new(name, DEFAULT_SKILL_LEVEL),
            SkillItemRepr::Rated { name, level } => SkillItem::new(name, level),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: Option<String>,
}

/// Returns the trimmed value of an optional field, treating blank strings as absent.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
