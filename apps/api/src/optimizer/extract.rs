//! Heuristic post-processing of model output.
//!
//! Both functions are best-effort line scans; they never fail.

use crate::models::resume::TemplateVariables;
use crate::template::placeholder::{placeholder, placeholder_names};

const SUGGESTION_KEYWORDS: [&str; 2] = ["建议", "推荐"];

/// Lines that look like advice: numbered or bulleted, or mentioning 建议/推荐.
/// When nothing matches, the whole content is the only suggestion.
pub fn extract_suggestions(content: &str) -> Vec<String> {
    let suggestions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| is_suggestion(line))
        .map(String::from)
        .collect();

    if suggestions.is_empty() {
        vec![content.to_string()]
    } else {
        suggestions
    }
}

fn is_suggestion(line: &str) -> bool {
    let starts_like_item = line
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || matches!(c, '-' | '*' | '•'));
    starts_like_item || SUGGESTION_KEYWORDS.iter().any(|k| line.contains(k))
}

/// For each `{{Name}}` still present in `content`, the value on the first
/// line that mentions it. Unfilled or empty values are not recorded.
pub fn extract_variables(content: &str) -> TemplateVariables {
    let mut variables = TemplateVariables::new();

    for name in placeholder_names(content) {
        if variables.contains_key(name) {
            continue;
        }
        let token = placeholder(name);
        let Some(line) = content.lines().find(|line| line.contains(&token)) else {
            continue;
        };
        let value = line_value(line, name);
        if !value.is_empty() && value != token {
            variables.insert(name.to_string(), value);
        }
    }

    variables
}

/// Drops the first `{{name}}`, then everything through the first colon.
pub fn line_value(line: &str, name: &str) -> String {
    let without = line.replacen(&placeholder(name), "", 1);
    let after_label = match without.char_indices().find(|(_, c)| matches!(c, '：' | ':')) {
        Some((idx, colon)) => &without[idx + colon.len_utf8()..],
        None => without.as_str(),
    };
    after_label.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_pick_items_and_keywords() {
        let content = "整体评价不错。\n\n1. 增加量化数据\n- 补充技能关键词\n  * 调整格式\n• 突出成果\n我们建议精简篇幅\n推荐使用动词开头\n结束语";
        assert_eq!(
            extract_suggestions(content),
            vec![
                "1. 增加量化数据",
                "- 补充技能关键词",
                "* 调整格式",
                "• 突出成果",
                "我们建议精简篇幅",
                "推荐使用动词开头",
            ]
        );
    }

    #[test]
    fn test_no_suggestions_returns_whole_content() {
        let content = "这份简历已经很好了。";
        assert_eq!(extract_suggestions(content), vec![content.to_string()]);
    }

    #[test]
    fn test_empty_content_is_single_empty_suggestion() {
        assert_eq!(extract_suggestions(""), vec![String::new()]);
    }

    #[test]
    fn test_placeholder_alone_on_label_line_is_not_recorded() {
        let content = "目标职位：{{TargetPosition}}\n软件工程师";
        assert_eq!(line_value("目标职位：{{TargetPosition}}", "TargetPosition"), "");
        assert!(extract_variables(content).is_empty());
    }

    #[test]
    fn test_value_next_to_placeholder_is_recorded() {
        let content = "## 个人信息\n姓名：{{Name}} 张三\n邮箱: {{Email}}zhang@example.com\n{{Skills}}";
        let variables = extract_variables(content);
        assert_eq!(variables.get("Name").map(String::as_str), Some("张三"));
        assert_eq!(
            variables.get("Email").map(String::as_str),
            Some("zhang@example.com")
        );
        assert!(!variables.contains_key("Skills"));
    }

    #[test]
    fn test_first_line_wins() {
        let content = "姓名：{{Name}} 张三\n别名：{{Name}} 李四";
        assert_eq!(extract_variables(content)["Name"], "张三");
    }

    #[test]
    fn test_only_first_colon_is_stripped() {
        assert_eq!(line_value("时间：{{Time}} 09:30", "Time"), "09:30");
    }

    #[test]
    fn test_filled_template_has_no_variables() {
        assert!(extract_variables("## 个人信息\n姓名：张三").is_empty());
    }
}
