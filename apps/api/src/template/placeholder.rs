//! `{{VariableName}}` placeholder scanning.

use once_cell::sync::Lazy;
use regex::Regex;

/// `VariableName` is ASCII word characters only, as written by the template prompt.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid"));

static WHOLE_PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\{[A-Za-z0-9_]+\}\}$").expect("placeholder pattern is valid")
});

/// Yields every placeholder name in `text`, in order, duplicates included.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Formats `name` as `{{name}}`.
pub fn placeholder(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// True when `value` is nothing but an unfilled placeholder.
pub fn is_unfilled(value: &str) -> bool {
    WHOLE_PLACEHOLDER_RE.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_names_in_order() {
        let text = "姓名：{{Name}}\n邮箱：{{Email}}\n{{Name}}";
        let names: Vec<&str> = placeholder_names(text).collect();
        assert_eq!(names, vec!["Name", "Email", "Name"]);
    }

    #[test]
    fn test_non_word_names_are_ignored() {
        assert_eq!(placeholder_names("{{Target Position}} {{}}").count(), 0);
    }

    #[test]
    fn test_placeholder_formatting() {
        assert_eq!(placeholder("Skills"), "{{Skills}}");
    }

    #[test]
    fn test_is_unfilled() {
        assert!(is_unfilled("  {{Skills}} "));
        assert!(!is_unfilled("Rust {{Skills}}"));
        assert!(!is_unfilled("Rust"));
    }
}
