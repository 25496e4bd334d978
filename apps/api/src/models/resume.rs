use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured résumé record. Every field is optional; a missing field renders
/// as an absent section, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    // Identity / contact
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,

    // Job target
    pub target_position: Option<String>,
    pub expected_salary: Option<String>,
    pub preferred_location: Option<String>,

    // Free-text blocks
    pub skills: Option<String>,
    pub work_experience: Option<String>,
    pub education: Option<String>,
    pub projects: Option<String>,
    pub awards: Option<String>,
    pub self_evaluation: Option<String>,
}

impl ResumeData {
    /// True when no field carries visible text.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|value| non_blank(value).is_none())
    }

    fn fields(&self) -> [&Option<String>; 15] {
        [
            &self.name,
            &self.phone,
            &self.email,
            &self.address,
            &self.linkedin,
            &self.github,
            &self.target_position,
            &self.expected_salary,
            &self.preferred_location,
            &self.skills,
            &self.work_experience,
            &self.education,
            &self.projects,
            &self.awards,
            &self.self_evaluation,
        ]
    }
}

/// Placeholder name → value pulled out of a filled template.
/// Best-effort: keys may be missing even when the template was filled.
pub type TemplateVariables = BTreeMap<String, String>;

/// Returns the trimmed field text, or `None` when the field is absent or blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resume_is_empty() {
        assert!(ResumeData::default().is_empty());
    }

    #[test]
    fn test_whitespace_only_fields_count_as_empty() {
        let data = ResumeData {
            skills: Some("   \n ".to_string()),
            ..Default::default()
        };
        assert!(data.is_empty());
    }

    #[test]
    fn test_resume_data_uses_camel_case_on_the_wire() {
        let data = ResumeData {
            target_position: Some("后端工程师".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["targetPosition"], "后端工程师");

        // Missing keys deserialize to None.
        let partial: ResumeData = serde_json::from_str(r#"{"name":"张三"}"#).unwrap();
        assert_eq!(partial.name.as_deref(), Some("张三"));
        assert!(partial.work_experience.is_none());
    }
}
