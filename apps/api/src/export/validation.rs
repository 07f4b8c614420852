use serde::Serialize;

use crate::models::resume::ResumeRecord;

pub const MISSING_NAME: &str = "Full name is required";
pub const MISSING_EMAIL: &str = "Email address is required";
pub const MISSING_HISTORY: &str = "At least one experience or education entry is required";
pub const MISSING_SKILLS: &str = "At least one skill is required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub complete: bool,
    pub issues: Vec<String>,
}

/// Checks the export preconditions. Every failing rule is reported, in a fixed order.
///
/// Whitespace-only name and email count as missing. Entries and skills only need to
/// exist; their contents are not inspected.
pub fn validate_for_export(record: &ResumeRecord) -> ValidationReport {
    let rules: [(bool, &str); 4] = [
        (record.personal_info.full_name.trim().is_empty(), MISSING_NAME),
        (record.personal_info.email.trim().is_empty(), MISSING_EMAIL),
        (
            record.experience.is_empty() && record.education.is_empty(),
            MISSING_HISTORY,
        ),
        (record.skills.is_empty(), MISSING_SKILLS),
    ];

    let issues: Vec<String> = rules
        .into_iter()
        .filter(|(failed, _)| *failed)
        .map(|(_, issue)| issue.to_string())
        .collect();

    ValidationReport {
        complete: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, SkillItem};

    fn make_complete_record() -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.personal_info.full_name = "Linus Torvalds".to_string();
        record.personal_info.email = "linus@example.org".to_string();
        record.experience.push(ExperienceEntry::default());
        record.skills.soft.push(SkillItem::new("Patience", 1));
        record
    }

    #[test]
    fn test_complete_record_passes() {
        let report = validate_for_export(&make_complete_record());
        assert!(report.complete);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_empty_record_reports_all_issues_in_order() {
        let report = validate_for_export(&ResumeRecord::default());
        assert!(!report.complete);
        assert_eq!(
            report.issues,
            vec![MISSING_NAME, MISSING_EMAIL, MISSING_HISTORY, MISSING_SKILLS]
        );
    }

    #[test]
    fn test_blank_name_and_email_are_missing() {
        let mut record = make_complete_record();
        record.personal_info.full_name = "   ".to_string();
        record.personal_info.email = "\t".to_string();
        assert_eq!(
            validate_for_export(&record).issues,
            vec![MISSING_NAME, MISSING_EMAIL]
        );
    }

    #[test]
    fn test_education_alone_satisfies_history() {
        let mut record = make_complete_record();
        record.experience.clear();
        record.education.push(EducationEntry::default());
        assert!(validate_for_export(&record).complete);
    }

    #[test]
    fn test_any_skill_bucket_counts() {
        let mut record = make_complete_record();
        record.skills.soft.clear();
        assert_eq!(validate_for_export(&record).issues, vec![MISSING_SKILLS]);
        record.skills.languages.push(SkillItem::new("Finnish", 5));
        assert!(validate_for_export(&record).complete);
    }
}
