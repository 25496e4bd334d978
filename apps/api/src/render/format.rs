//! Per-section text formatters: free text in, escaped HTML out.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

const BULLET_MARKERS: [&str; 4] = ["- ", "* ", "• ", "· "];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes and applies `**bold**`.
pub fn inline(text: &str) -> String {
    BOLD_RE
        .replace_all(&escape_html(text), "<strong>$1</strong>")
        .into_owned()
}

/// Returns the text after a leading bullet marker, if there is one.
fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    BULLET_MARKERS
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .or_else(|| trimmed.strip_prefix('•'))
        .map(str::trim)
}

fn strip_heading(line: &str) -> &str {
    line.trim().trim_start_matches('#').trim()
}

/// Line breaks become visual breaks, bullet lines become styled blocks and
/// `###` lines become sub-headings. Blank lines close the current paragraph.
pub fn format_lines(text: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();

    let flush = |paragraph: &mut Vec<String>, html: &mut String| {
        if !paragraph.is_empty() {
            html.push_str(&format!("<p>{}</p>", paragraph.join("<br>")));
            paragraph.clear();
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut html);
        } else if let Some(item) = strip_bullet(trimmed) {
            flush(&mut paragraph, &mut html);
            html.push_str(&format!("<div class=\"bullet\">{}</div>", inline(item)));
        } else if trimmed.starts_with("###") {
            flush(&mut paragraph, &mut html);
            html.push_str(&format!(
                "<div class=\"subhead\">{}</div>",
                inline(strip_heading(trimmed))
            ));
        } else {
            paragraph.push(inline(trimmed));
        }
    }
    flush(&mut paragraph, &mut html);

    html
}

/// Skills are usually `类别：条目` lines; those become label/value rows.
pub fn format_skills(text: &str) -> String {
    let mut html = String::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let content = strip_bullet(line).unwrap_or(line);
        match content.split_once('：').or_else(|| content.split_once(':')) {
            Some((label, value)) if !label.trim().is_empty() && !value.trim().is_empty() => {
                html.push_str(&format!(
                    "<div class=\"skill-row\"><span class=\"skill-label\">{}</span>\
                     <span class=\"skill-value\">{}</span></div>",
                    inline(label.trim().trim_matches('*')),
                    inline(value.trim())
                ));
            }
            _ => html.push_str(&format_lines(line)),
        }
    }
    html
}

/// Splits work/project text on blank lines into cards; the first line of
/// each card is its title.
pub fn format_cards(text: &str) -> String {
    split_blocks(text)
        .into_iter()
        .map(|block| {
            let (title, rest) = match block.split_once('\n') {
                Some((title, rest)) => (title, rest),
                None => (block.as_str(), ""),
            };
            let title = strip_bullet(title).unwrap_or(title);
            let title = strip_heading(title);
            let body = format_lines(rest);
            if body.is_empty() {
                format!(
                    "<div class=\"card\"><div class=\"card-title\">{}</div></div>",
                    inline(title)
                )
            } else {
                format!(
                    "<div class=\"card\"><div class=\"card-title\">{}</div>{}</div>",
                    inline(title),
                    body
                )
            }
        })
        .collect()
}

/// Groups lines into blocks separated by one or more blank lines.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>R&D</b> \"x\""),
            "&lt;b&gt;R&amp;D&lt;/b&gt; &quot;x&quot;"
        );
    }

    #[test]
    fn test_inline_bold_after_escaping() {
        assert_eq!(inline("**Rust** <3"), "<strong>Rust</strong> &lt;3");
    }

    #[test]
    fn test_format_lines_breaks_and_bullets() {
        let html = format_lines("第一行\n第二行\n- 要点一\n• 要点二");
        assert_eq!(
            html,
            "<p>第一行<br>第二行</p>\
             <div class=\"bullet\">要点一</div>\
             <div class=\"bullet\">要点二</div>"
        );
    }

    #[test]
    fn test_format_lines_blank_line_splits_paragraphs() {
        assert_eq!(format_lines("甲\n\n乙"), "<p>甲</p><p>乙</p>");
    }

    #[test]
    fn test_format_skills_rows() {
        let html = format_skills("- 编程语言：Rust, Go\n熟悉 Linux");
        assert!(html.contains("<span class=\"skill-label\">编程语言</span>"));
        assert!(html.contains("<span class=\"skill-value\">Rust, Go</span>"));
        assert!(html.contains("<p>熟悉 Linux</p>"));
    }

    #[test]
    fn test_split_blocks_on_blank_lines() {
        let blocks = split_blocks("A\n- a1\n\n\nB\n- b1\n");
        assert_eq!(blocks, vec!["A\n- a1".to_string(), "B\n- b1".to_string()]);
    }

    #[test]
    fn test_format_cards_titles_from_first_line() {
        let html = format_cards("### 某公司 | 工程师\n- 负责 A\n\n**另一家公司**");
        assert_eq!(html.matches("class=\"card\"").count(), 2);
        assert!(html.contains("<div class=\"card-title\">某公司 | 工程师</div>"));
        assert!(html.contains("<div class=\"bullet\">负责 A</div>"));
        assert!(html.contains("<div class=\"card-title\"><strong>另一家公司</strong></div>"));
    }

    #[test]
    fn test_empty_input_formats_to_nothing() {
        assert!(format_lines("").is_empty());
        assert!(format_cards("\n\n").is_empty());
        assert!(format_skills("").is_empty());
    }
}
