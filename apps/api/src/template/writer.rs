//! Template Writer: `ResumeData` back into the template text the parser reads.

use crate::models::resume::ResumeData;
use crate::template::section::Section;

/// Writes `data` as template text. Absent fields are written empty so the
/// section skeleton is always complete.
pub fn write_template(data: &ResumeData) -> String {
    let mut sections = Vec::with_capacity(Section::ALL.len());

    for section in Section::ALL {
        let mut out = format!("## {}\n", section.heading());

        if section.is_key_value() {
            for field in section.fields() {
                let value = field.value(data).as_deref().unwrap_or("");
                out.push_str(&format!("{}：{}\n", field.key(), value.trim()));
            }
        } else if let Some(value) = section.block_value(data) {
            out.push_str(value.as_deref().unwrap_or("").trim());
            out.push('\n');
        }

        sections.push(out);
    }

    sections.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_writes_full_skeleton() {
        let text = write_template(&ResumeData::default());
        for section in Section::ALL {
            assert!(text.contains(&format!("## {}", section.heading())));
        }
        assert!(text.starts_with("## 个人信息\n姓名：\n联系电话："));
        assert!(text.ends_with("## 自我评价"));
    }

    #[test]
    fn test_key_value_lines_use_full_width_colon() {
        let data = ResumeData {
            name: Some("张三".to_string()),
            expected_salary: Some("25K".to_string()),
            ..Default::default()
        };
        let text = write_template(&data);
        assert!(text.contains("姓名：张三\n"));
        assert!(text.contains("期望薪资：25K\n"));
    }

    #[test]
    fn test_sections_are_separated_by_blank_lines() {
        let data = ResumeData {
            skills: Some("Rust".to_string()),
            ..Default::default()
        };
        let text = write_template(&data);
        assert!(text.contains("## 专业技能\nRust\n\n## 工作经验\n"));
    }
}
