//! Fixed section vocabulary of the résumé template and the key/value fields
//! that live inside the identity and job-target sections.

use serde::Serialize;

use crate::models::resume::ResumeData;

/// A recognized `## <SectionName>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    PersonalInfo,
    JobTarget,
    Skills,
    WorkExperience,
    Education,
    Projects,
    Awards,
    SelfEvaluation,
}

impl Section {
    /// Template order.
    pub const ALL: [Section; 8] = [
        Section::PersonalInfo,
        Section::JobTarget,
        Section::Skills,
        Section::WorkExperience,
        Section::Education,
        Section::Projects,
        Section::Awards,
        Section::SelfEvaluation,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Section::PersonalInfo => "个人信息",
            Section::JobTarget => "求职意向",
            Section::Skills => "专业技能",
            Section::WorkExperience => "工作经验",
            Section::Education => "教育背景",
            Section::Projects => "项目经验",
            Section::Awards => "获奖荣誉",
            Section::SelfEvaluation => "自我评价",
        }
    }

    /// Matches a header's text against the vocabulary by substring, so
    /// decorated headers such as `个人信息 / Profile` still resolve.
    pub fn from_heading(text: &str) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|section| text.contains(section.heading()))
    }

    /// Key/value sections hold `Key：Value` lines; every other section is a
    /// single free-text block.
    pub fn is_key_value(self) -> bool {
        matches!(self, Section::PersonalInfo | Section::JobTarget)
    }

    /// The `ResumeData` slot a block section fills. `None` for key/value
    /// sections.
    pub fn block_slot(self, data: &mut ResumeData) -> Option<&mut Option<String>> {
        match self {
            Section::PersonalInfo | Section::JobTarget => None,
            Section::Skills => Some(&mut data.skills),
            Section::WorkExperience => Some(&mut data.work_experience),
            Section::Education => Some(&mut data.education),
            Section::Projects => Some(&mut data.projects),
            Section::Awards => Some(&mut data.awards),
            Section::SelfEvaluation => Some(&mut data.self_evaluation),
        }
    }

    pub fn block_value(self, data: &ResumeData) -> Option<&Option<String>> {
        match self {
            Section::PersonalInfo | Section::JobTarget => None,
            Section::Skills => Some(&data.skills),
            Section::WorkExperience => Some(&data.work_experience),
            Section::Education => Some(&data.education),
            Section::Projects => Some(&data.projects),
            Section::Awards => Some(&data.awards),
            Section::SelfEvaluation => Some(&data.self_evaluation),
        }
    }

    /// Fields written under this section, in template order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Section::PersonalInfo => &[
                Field::Name,
                Field::Phone,
                Field::Email,
                Field::Address,
                Field::LinkedIn,
                Field::GitHub,
            ],
            Section::JobTarget => &[
                Field::TargetPosition,
                Field::ExpectedSalary,
                Field::PreferredLocation,
            ],
            _ => &[],
        }
    }
}

/// A `Key：Value` field of the identity or job-target section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Email,
    Address,
    LinkedIn,
    GitHub,
    TargetPosition,
    ExpectedSalary,
    PreferredLocation,
}

impl Field {
    /// Key written by the template generator.
    pub fn key(self) -> &'static str {
        self.aliases()[0]
    }

    /// Accepted spellings; the first one is canonical.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["姓名", "名字"],
            Field::Phone => &["联系电话", "电话", "手机", "手机号"],
            Field::Email => &["邮箱", "电子邮箱", "Email", "E-mail"],
            Field::Address => &["居住地址", "地址", "现居地"],
            Field::LinkedIn => &["LinkedIn"],
            Field::GitHub => &["GitHub"],
            Field::TargetPosition => &["目标职位", "求职意向", "应聘职位"],
            Field::ExpectedSalary => &["期望薪资", "薪资要求"],
            Field::PreferredLocation => &["工作地点", "期望地点", "期望城市"],
        }
    }

    /// Resolves a key within `section`. Keys are compared case-insensitively
    /// so `Github` and `github` both land on `GitHub`.
    pub fn lookup(section: Section, key: &str) -> Option<Field> {
        let key = key.trim();
        section.fields().iter().copied().find(|field| {
            field
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(key))
        })
    }

    pub fn slot(self, data: &mut ResumeData) -> &mut Option<String> {
        match self {
            Field::Name => &mut data.name,
            Field::Phone => &mut data.phone,
            Field::Email => &mut data.email,
            Field::Address => &mut data.address,
            Field::LinkedIn => &mut data.linkedin,
            Field::GitHub => &mut data.github,
            Field::TargetPosition => &mut data.target_position,
            Field::ExpectedSalary => &mut data.expected_salary,
            Field::PreferredLocation => &mut data.preferred_location,
        }
    }

    pub fn value(self, data: &ResumeData) -> &Option<String> {
        match self {
            Field::Name => &data.name,
            Field::Phone => &data.phone,
            Field::Email => &data.email,
            Field::Address => &data.address,
            Field::LinkedIn => &data.linkedin,
            Field::GitHub => &data.github,
            Field::TargetPosition => &data.target_position,
            Field::ExpectedSalary => &data.expected_salary,
            Field::PreferredLocation => &data.preferred_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_matches_by_substring() {
        assert_eq!(Section::from_heading("工作经验"), Some(Section::WorkExperience));
        assert_eq!(
            Section::from_heading("🎓 教育背景 (Education)"),
            Some(Section::Education)
        );
        assert_eq!(Section::from_heading("兴趣爱好"), None);
    }

    #[test]
    fn test_only_identity_and_target_are_key_value() {
        let kv: Vec<Section> = Section::ALL
            .into_iter()
            .filter(|s| s.is_key_value())
            .collect();
        assert_eq!(kv, vec![Section::PersonalInfo, Section::JobTarget]);
    }

    #[test]
    fn test_field_lookup_respects_section() {
        assert_eq!(
            Field::lookup(Section::PersonalInfo, "电话"),
            Some(Field::Phone)
        );
        assert_eq!(
            Field::lookup(Section::PersonalInfo, "github"),
            Some(Field::GitHub)
        );
        // Job-target keys are not valid under the identity section.
        assert_eq!(Field::lookup(Section::PersonalInfo, "期望薪资"), None);
        assert_eq!(
            Field::lookup(Section::JobTarget, "期望薪资"),
            Some(Field::ExpectedSalary)
        );
    }

    #[test]
    fn test_canonical_key_is_first_alias() {
        assert_eq!(Field::Phone.key(), "联系电话");
        assert_eq!(Field::Address.key(), "居住地址");
    }
}
