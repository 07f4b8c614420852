//! The three visual themes.
//!
//! `Theme` is the wire-level selector; each variant resolves to one `ThemeStyle`
//! implementation. Styles only arrange and decorate: section presence and content come
//! from the renderer and are identical across themes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::tree::{RegionKind, SectionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Professional,
    Modern,
    Creative,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Professional, Theme::Modern, Theme::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Professional => "professional",
            Theme::Modern => "modern",
            Theme::Creative => "creative",
        }
    }

    /// Capitalized name used in document titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Professional => "Professional",
            Theme::Modern => "Modern",
            Theme::Creative => "Creative",
        }
    }

    pub fn style(&self) -> &'static dyn ThemeStyle {
        match self {
            Theme::Professional => &ProfessionalStyle,
            Theme::Modern => &ModernStyle,
            Theme::Creative => &CreativeStyle,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutShape {
    SingleColumn,
    TwoColumnSidebar,
    CardTimeline,
}

impl LayoutShape {
    pub fn css_class(&self) -> &'static str {
        match self {
            LayoutShape::SingleColumn => "layout-single",
            LayoutShape::TwoColumnSidebar => "layout-sidebar",
            LayoutShape::CardTimeline => "layout-cards",
        }
    }

    /// Region arrangement for this shape. Sections absent from the record are dropped
    /// later; the arrangement itself is fixed.
    pub fn regions(&self) -> &'static [(RegionKind, &'static [SectionKind])] {
        use SectionKind::*;
        match self {
            LayoutShape::SingleColumn => &[(
                RegionKind::Main,
                &[Summary, Experience, Education, Skills, Projects, Certifications],
            )],
            LayoutShape::TwoColumnSidebar => &[
                (RegionKind::Sidebar, &[Skills, Education, Certifications]),
                (RegionKind::Main, &[Summary, Experience, Projects]),
            ],
            LayoutShape::CardTimeline => &[
                (RegionKind::Main, &[Summary, Experience]),
                (RegionKind::Grid, &[Skills, Education]),
                (RegionKind::Main, &[Projects, Certifications]),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillIndicator {
    Dots,
    Stars,
    ProgressBar,
}

/// Color tokens exposed to the stylesheet as CSS custom properties.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub accent_alt: &'static str,
    pub surface: &'static str,
    pub indicator_on: &'static str,
    pub indicator_off: &'static str,
}

impl Palette {
    pub fn tokens(&self) -> [(&'static str, &'static str); 8] {
        [
            ("--text", self.text),
            ("--heading", self.heading),
            ("--muted", self.muted),
            ("--accent", self.accent),
            ("--accent-alt", self.accent_alt),
            ("--surface", self.surface),
            ("--indicator-on", self.indicator_on),
            ("--indicator-off", self.indicator_off),
        ]
    }
}

pub trait ThemeStyle: Send + Sync {
    fn layout(&self) -> LayoutShape;
    fn heading(&self, section: SectionKind) -> &'static str;
    fn skill_indicator(&self) -> SkillIndicator;
    fn palette(&self) -> &'static Palette;
    /// Theme-specific rules appended after the shared base stylesheet.
    fn stylesheet(&self) -> &'static str;
}

/// Headings shared by all themes unless a theme overrides them.
fn common_heading(section: SectionKind) -> &'static str {
    match section {
        SectionKind::Summary => "Professional Summary",
        SectionKind::Experience => "Experience",
        SectionKind::Education => "Education",
        SectionKind::Skills => "Skills",
        SectionKind::Projects => "Projects",
        SectionKind::Certifications => "Certifications",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Professional: single column, centered header, dot indicators
// ────────────────────────────────────────────────────────────────────────────

pub struct ProfessionalStyle;

static PROFESSIONAL_PALETTE: Palette = Palette {
    text: "#374151",
    heading: "#111827",
    muted: "#6b7280",
    accent: "#3b82f6",
    accent_alt: "#2563eb",
    surface: "#ffffff",
    indicator_on: "#3b82f6",
    indicator_off: "#d1d5db",
};

impl ThemeStyle for ProfessionalStyle {
    fn layout(&self) -> LayoutShape {
        LayoutShape::SingleColumn
    }

    fn heading(&self, section: SectionKind) -> &'static str {
        match section {
            SectionKind::Experience => "Professional Experience",
            other => common_heading(other),
        }
    }

    fn skill_indicator(&self) -> SkillIndicator {
        SkillIndicator::Dots
    }

    fn palette(&self) -> &'static Palette {
        &PROFESSIONAL_PALETTE
    }

    fn stylesheet(&self) -> &'static str {
        r#"
.header { text-align: center; border-bottom: 2px solid #d1d5db; padding-bottom: 1.5rem; margin-bottom: 1.5rem; }
.header h1 { font-size: 2rem; font-weight: bold; color: var(--heading); margin-bottom: 0.5rem; }
.contact-list { display: flex; flex-wrap: wrap; justify-content: center; gap: 1rem; font-size: 0.875rem; color: var(--muted); }
.section { margin-bottom: 1.5rem; }
.section-bar { display: none; }
.section h2 { font-size: 1.25rem; font-weight: bold; color: var(--heading); margin-bottom: 0.75rem; border-bottom: 1px solid #e5e7eb; padding-bottom: 0.25rem; text-transform: uppercase; }
.entry { margin-bottom: 1rem; }
.entry-title { font-size: 1.125rem; font-weight: 600; color: var(--heading); }
.entry-subtitle { color: var(--text); font-weight: 500; }
.entry-date { color: var(--muted); font-size: 0.875rem; }
.tag { color: var(--muted); }
.tag + .tag::before { content: ", "; }
.skill { display: flex; align-items: center; justify-content: space-between; max-width: 24rem; }
"#
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Modern: gradient banner, sidebar + main column, star indicators
// ────────────────────────────────────────────────────────────────────────────

pub struct ModernStyle;

static MODERN_PALETTE: Palette = Palette {
    text: "#374151",
    heading: "#111827",
    muted: "#6b7280",
    accent: "#2563eb",
    accent_alt: "#9333ea",
    surface: "#f3f4f6",
    indicator_on: "#facc15",
    indicator_off: "#d1d5db",
};

impl ThemeStyle for ModernStyle {
    fn layout(&self) -> LayoutShape {
        LayoutShape::TwoColumnSidebar
    }

    fn heading(&self, section: SectionKind) -> &'static str {
        common_heading(section)
    }

    fn skill_indicator(&self) -> SkillIndicator {
        SkillIndicator::Stars
    }

    fn palette(&self) -> &'static Palette {
        &MODERN_PALETTE
    }

    fn stylesheet(&self) -> &'static str {
        r#"
.header { background: linear-gradient(to right, var(--accent), var(--accent-alt)); color: #ffffff; padding: 2rem; margin: -2rem -2rem 2rem -2rem; }
.header h1 { font-size: 2.5rem; font-weight: bold; margin-bottom: 1rem; }
.contact-list { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 0.5rem; font-size: 0.875rem; }
.layout-sidebar { display: grid; grid-template-columns: 1fr 2fr; gap: 2rem; }
.section { margin-bottom: 2rem; }
.section-bar { display: none; }
.section h2 { font-size: 1.125rem; font-weight: bold; color: var(--accent); margin-bottom: 1rem; text-transform: uppercase; letter-spacing: 0.05em; }
.region-main .entry { border-left: 4px solid #bfdbfe; padding-left: 1rem; margin-bottom: 1rem; }
.section-projects .entry { border-left-color: #d8b4fe; }
.region-sidebar .entry { margin-bottom: 1rem; }
.entry-title { font-size: 1.125rem; font-weight: 600; color: var(--heading); }
.region-sidebar .entry-title { font-size: 1rem; color: var(--text); }
.entry-subtitle { color: var(--accent); font-weight: 500; }
.region-sidebar .entry-subtitle { color: var(--muted); font-size: 0.875rem; }
.entry-date { background: var(--surface); padding: 0.25rem 0.5rem; border-radius: 0.25rem; font-size: 0.875rem; color: var(--muted); }
.tag { background: #ede9fe; color: #7c3aed; padding: 0.25rem 0.5rem; border-radius: 0.25rem; font-size: 0.75rem; margin: 0.125rem; display: inline-block; }
.skill { background: var(--surface); padding: 0.5rem 0.75rem; border-radius: 0.25rem; margin-bottom: 0.375rem; display: flex; justify-content: space-between; align-items: center; font-size: 0.875rem; }
.skill-label { display: none; }
"#
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Creative: decorated header, timeline cards, progress bar indicators
// ────────────────────────────────────────────────────────────────────────────

pub struct CreativeStyle;

static CREATIVE_PALETTE: Palette = Palette {
    text: "#374151",
    heading: "#111827",
    muted: "#6b7280",
    accent: "#ea580c",
    accent_alt: "#ec4899",
    surface: "#f9fafb",
    indicator_on: "#fb923c",
    indicator_off: "#e5e7eb",
};

impl ThemeStyle for CreativeStyle {
    fn layout(&self) -> LayoutShape {
        LayoutShape::CardTimeline
    }

    fn heading(&self, section: SectionKind) -> &'static str {
        match section {
            SectionKind::Summary => "About Me",
            other => common_heading(other),
        }
    }

    fn skill_indicator(&self) -> SkillIndicator {
        SkillIndicator::ProgressBar
    }

    fn palette(&self) -> &'static Palette {
        &CREATIVE_PALETTE
    }

    fn stylesheet(&self) -> &'static str {
        r#"
.header { position: relative; margin-bottom: 2rem; }
.header::before { content: ""; position: absolute; left: -2rem; top: -2rem; width: 8rem; height: 8rem; background: linear-gradient(135deg, #fb923c, #ec4899); border-radius: 50%; opacity: 0.1; }
.header::after { content: ""; position: absolute; right: -2rem; bottom: -2rem; width: 6rem; height: 6rem; background: linear-gradient(135deg, #60a5fa, #a855f7); border-radius: 50%; opacity: 0.1; }
.header h1 { position: relative; font-size: 3rem; font-weight: bold; color: var(--accent); margin-bottom: 1rem; }
.contact-list { position: relative; display: flex; flex-wrap: wrap; gap: 1rem; }
.contact-item { padding: 0.5rem 1rem; border-radius: 9999px; font-size: 0.875rem; background: #fed7aa; color: #9a3412; }
.contact-phone { background: #bfdbfe; color: #1e40af; }
.contact-location { background: #bbf7d0; color: #166534; }
.contact-website, .contact-linkedin { background: #e9d5ff; color: #6b21a8; }
.section { margin-bottom: 2rem; }
.section-header { display: flex; align-items: center; gap: 1rem; margin-bottom: 1rem; }
.section-bar { width: 2rem; height: 0.25rem; border-radius: 0.125rem; background: linear-gradient(to right, var(--indicator-on), var(--accent-alt)); }
.section h2 { font-size: 1.5rem; font-weight: bold; color: var(--text); }
.summary { background: var(--surface); padding: 1rem; border-radius: 0.5rem; border-left: 4px solid #fb923c; font-size: 1.125rem; }
.region-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 1.5rem; }
.entry { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); margin-bottom: 1rem; }
.section-experience .entry { position: relative; margin-left: 2.5rem; }
.section-experience .entry::before { content: ""; position: absolute; left: -2.5rem; top: 1rem; width: 1.5rem; height: 1.5rem; border-radius: 50%; background: linear-gradient(135deg, #60a5fa, #a855f7); }
.section-education .entry { background: linear-gradient(135deg, #f3e8ff, #fce7f3); border-left: 4px solid #a855f7; }
.section-projects .entry { background: linear-gradient(135deg, #fef3c7, #fed7aa); border-left: 4px solid #fbbf24; }
.entry-title { font-size: 1.25rem; font-weight: bold; color: var(--heading); }
.entry-subtitle { color: #2563eb; font-weight: 600; }
.entry-date { background: linear-gradient(to right, #60a5fa, #a855f7); color: #ffffff; padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.875rem; }
.tag { background: #fef3c7; color: #92400e; padding: 0.25rem 0.5rem; border-radius: 0.25rem; font-size: 0.75rem; margin: 0.125rem; display: inline-block; }
.skill { margin-bottom: 0.75rem; display: grid; grid-template-columns: 1fr auto; row-gap: 0.25rem; font-size: 0.875rem; }
.skill .skill-indicator { grid-column: 1 / span 2; }
"#
    }
}
