use crate::models::resume::{non_blank, ResumeRecord, SkillItem};
use crate::render::format::{format_date, format_date_range, format_skill_level};
use crate::render::theme::{Theme, ThemeStyle};
use crate::render::tree::{
    ContactItem, ContactKind, DocumentTree, Entry, EntryLink, Header, Region, RenderedSkill,
    Section, SectionBody, SectionKind, SkillBucket, SkillGroup,
};

/// Shown in place of a blank full name.
pub const NAME_PLACEHOLDER: &str = "Your Name";

/// Renders a record into the themed document tree.
///
/// Sections whose data is empty are left out entirely, so exporters never see an empty
/// heading. The theme only chooses region arrangement and heading wording.
pub fn render(record: &ResumeRecord, theme: Theme) -> DocumentTree {
    let style = theme.style();

    let regions = style
        .layout()
        .regions()
        .iter()
        .filter_map(|(kind, section_kinds)| {
            let sections: Vec<Section> = section_kinds
                .iter()
                .filter(|k| k.is_present(record))
                .map(|k| render_section(record, *k, style))
                .collect();
            (!sections.is_empty()).then_some(Region {
                kind: *kind,
                sections,
            })
        })
        .collect();

    DocumentTree {
        theme,
        header: render_header(record),
        regions,
    }
}

fn render_header(record: &ResumeRecord) -> Header {
    let info = &record.personal_info;
    let name = match info.full_name.trim() {
        "" => NAME_PLACEHOLDER.to_string(),
        name => name.to_string(),
    };

    let contacts = [
        (ContactKind::Email, &info.email),
        (ContactKind::Phone, &info.phone),
        (ContactKind::Location, &info.location),
        (ContactKind::Website, &info.website),
        (ContactKind::LinkedIn, &info.linked_in),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(kind, value)| ContactItem {
        kind,
        value: value.trim().to_string(),
    })
    .collect();

    Header { name, contacts }
}

fn render_section(record: &ResumeRecord, kind: SectionKind, style: &dyn ThemeStyle) -> Section {
    let body = match kind {
        SectionKind::Summary => SectionBody::Text(record.personal_info.summary.trim().to_string()),
        SectionKind::Experience => SectionBody::Entries(
            record
                .experience
                .iter()
                .map(|exp| Entry {
                    title: exp.position.clone(),
                    subtitle: exp.company.clone(),
                    date: format_date_range(&exp.start_date, &exp.end_date, exp.current),
                    description: non_empty(&exp.description),
                    achievements: exp
                        .achievements
                        .iter()
                        .filter(|a| !a.trim().is_empty())
                        .cloned()
                        .collect(),
                    ..Entry::default()
                })
                .collect(),
        ),
        SectionKind::Education => SectionBody::Entries(
            record
                .education
                .iter()
                .map(|edu| Entry {
                    title: degree_title(&edu.degree, &edu.field),
                    subtitle: edu.institution.clone(),
                    date: edu.graduation_year.trim().to_string(),
                    details: non_blank(&edu.gpa)
                        .map(|gpa| vec![format!("GPA: {gpa}")])
                        .unwrap_or_default(),
                    ..Entry::default()
                })
                .collect(),
        ),
        SectionKind::Skills => {
            let skills = &record.skills;
            let groups = [
                (SkillBucket::Technical, "Technical", &skills.technical),
                (SkillBucket::Soft, "Soft Skills", &skills.soft),
                (SkillBucket::Languages, "Languages", &skills.languages),
            ]
            .into_iter()
            .filter(|(_, _, items)| !items.is_empty())
            .map(|(bucket, label, items)| SkillGroup {
                bucket,
                label,
                skills: items.iter().map(render_skill).collect(),
            })
            .collect();
            SectionBody::Skills(groups)
        }
        SectionKind::Projects => SectionBody::Entries(
            record
                .projects
                .iter()
                .map(|project| Entry {
                    title: project.name.clone(),
                    description: non_empty(&project.description),
                    tags: project.technologies.clone(),
                    link: EntryLink::from_field(&project.link, None),
                    ..Entry::default()
                })
                .collect(),
        ),
        SectionKind::Certifications => SectionBody::Entries(
            record
                .certifications
                .iter()
                .map(|cert| Entry {
                    title: cert.name.clone(),
                    subtitle: cert.issuer.clone(),
                    date: format_date(&cert.date),
                    link: EntryLink::from_field(&cert.link, Some("View Credential")),
                    ..Entry::default()
                })
                .collect(),
        ),
    };

    Section {
        kind,
        heading: style.heading(kind),
        body,
    }
}

fn render_skill(skill: &SkillItem) -> RenderedSkill {
    RenderedSkill {
        name: skill.name.clone(),
        level: skill.level,
        label: format_skill_level(skill.level),
    }
}

/// `"BSc in Physics"`, or just the degree when no field is given.
pub fn degree_title(degree: &str, field: &str) -> String {
    match field.trim() {
        "" => degree.to_string(),
        field => format!("{degree} in {field}"),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
