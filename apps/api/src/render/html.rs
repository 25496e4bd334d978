//! HTML Renderer: maps a `ResumeData` onto the fixed two-column résumé layout.
//!
//! Layout:
//! - header band: name, target role, contact items
//! - left column: 自我评价, 工作经验, 项目经验
//! - right column: 专业技能, 教育背景, 获奖荣誉, 求职意向 details
//!
//! Empty fields produce no markup at all; an empty record renders the header
//! band and two empty columns.

use crate::models::resume::{non_blank, ResumeData};
use crate::render::format::{escape_html, format_cards, format_lines, format_skills};

/// Canvas width of the rendered page, in CSS pixels (A4 at 96dpi).
pub const PAGE_WIDTH_PX: u32 = 794;

const STYLESHEET: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
html, body { background: #ffffff; }
body { width: 794px; font-family: 'Microsoft YaHei', 'PingFang SC', 'Noto Sans CJK SC', Arial, sans-serif; font-size: 13px; line-height: 1.6; color: #333333; }
.resume { width: 794px; padding: 36px 40px; background: #ffffff; }
.header { padding-bottom: 16px; margin-bottom: 20px; border-bottom: 3px solid #2563eb; }
.header .name { font-size: 28px; font-weight: 700; color: #1f2937; }
.header .role { font-size: 16px; color: #2563eb; margin-top: 4px; }
.header .contacts { margin-top: 10px; display: flex; flex-wrap: wrap; gap: 6px 18px; font-size: 12px; color: #4b5563; }
.header .contact .icon { margin-right: 4px; }
.columns { display: flex; gap: 28px; }
.col-main { flex: 1 1 62%; min-width: 0; }
.col-side { flex: 1 1 38%; min-width: 0; }
.section { margin-bottom: 18px; }
.section h2 { font-size: 16px; color: #2563eb; border-bottom: 1px solid #bfdbfe; padding-bottom: 4px; margin-bottom: 8px; }
.section p { margin: 4px 0; }
.bullet { position: relative; padding-left: 14px; margin: 3px 0; }
.bullet::before { content: ''; position: absolute; left: 2px; top: 8px; width: 5px; height: 5px; border-radius: 50%; background: #2563eb; }
.subhead { font-weight: 600; color: #374151; margin: 6px 0 2px; }
.card { margin-bottom: 10px; padding: 8px 10px; background: #f8fafc; border-left: 3px solid #93c5fd; }
.card-title { font-weight: 600; color: #1f2937; margin-bottom: 4px; }
.skill-row { margin: 3px 0; }
.skill-label { font-weight: 600; color: #374151; margin-right: 6px; }
.skill-label::after { content: '：'; }
.target-row .label { color: #6b7280; margin-right: 6px; }
"#;

/// Renders the résumé fragment (`<div class="resume">…</div>`).
pub fn render_fragment(data: &ResumeData) -> String {
    let mut html = String::from("<div class=\"resume\">");
    html.push_str(&header_band(data));

    html.push_str("<div class=\"columns\"><div class=\"col-main\">");
    push_section(&mut html, "自我评价", &data.self_evaluation, format_lines);
    push_section(&mut html, "工作经验", &data.work_experience, format_cards);
    push_section(&mut html, "项目经验", &data.projects, format_cards);
    html.push_str("</div><div class=\"col-side\">");
    push_section(&mut html, "专业技能", &data.skills, format_skills);
    push_section(&mut html, "教育背景", &data.education, format_lines);
    push_section(&mut html, "获奖荣誉", &data.awards, format_lines);
    html.push_str(&job_target(data));
    html.push_str("</div></div></div>");

    html
}

/// Wraps the fragment in a standalone document. Everything the page needs is
/// inline, so whatever surface loads it sees no other styles.
pub fn render_document(data: &ResumeData) -> String {
    let title = non_blank(&data.name).map(escape_html).unwrap_or_default();
    format!(
        "<!DOCTYPE html><html lang=\"zh-CN\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width={PAGE_WIDTH_PX}\">\
         <title>{title}</title><style>{STYLESHEET}</style></head>\
         <body>{}</body></html>",
        render_fragment(data)
    )
}

fn header_band(data: &ResumeData) -> String {
    let mut html = String::from("<div class=\"header\">");
    html.push_str(&format!(
        "<div class=\"name\">{}</div>",
        non_blank(&data.name).map(escape_html).unwrap_or_default()
    ));
    if let Some(role) = non_blank(&data.target_position) {
        html.push_str(&format!("<div class=\"role\">{}</div>", escape_html(role)));
    }

    let contacts: Vec<String> = [
        ("📞", &data.phone),
        ("✉", &data.email),
        ("📍", &data.address),
        ("in", &data.linkedin),
        ("⌥", &data.github),
    ]
    .into_iter()
    .filter_map(|(icon, value)| {
        non_blank(value).map(|v| {
            format!(
                "<span class=\"contact\"><span class=\"icon\">{icon}</span>{}</span>",
                escape_html(v)
            )
        })
    })
    .collect();

    if !contacts.is_empty() {
        html.push_str(&format!("<div class=\"contacts\">{}</div>", contacts.concat()));
    }
    html.push_str("</div>");
    html
}

fn job_target(data: &ResumeData) -> String {
    let rows: Vec<String> = [
        ("目标职位", &data.target_position),
        ("期望薪资", &data.expected_salary),
        ("工作地点", &data.preferred_location),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        non_blank(value).map(|v| {
            format!(
                "<div class=\"target-row\"><span class=\"label\">{label}</span>{}</div>",
                escape_html(v)
            )
        })
    })
    .collect();

    if rows.is_empty() {
        return String::new();
    }
    section_html("求职意向", &rows.concat())
}

fn push_section(
    html: &mut String,
    title: &str,
    value: &Option<String>,
    format: fn(&str) -> String,
) {
    if let Some(text) = non_blank(value) {
        let body = format(text);
        if !body.is_empty() {
            html.push_str(&section_html(title, &body));
        }
    }
}

fn section_html(title: &str, body: &str) -> String {
    format!("<div class=\"section\"><h2>{title}</h2>{body}</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_renders_header_band_only() {
        let html = render_fragment(&ResumeData::default());
        assert!(html.contains("<div class=\"header\"><div class=\"name\"></div></div>"));
        assert!(!html.contains("class=\"section\""));
        assert!(!html.contains("class=\"contacts\""));
    }

    #[test]
    fn test_sections_land_in_their_columns() {
        let data = ResumeData {
            work_experience: Some("A 公司\n- 负责 X".to_string()),
            skills: Some("语言：Rust".to_string()),
            ..Default::default()
        };
        let html = render_fragment(&data);
        let main_start = html.find("col-main").unwrap();
        let side_start = html.find("col-side").unwrap();
        let work = html.find("<h2>工作经验</h2>").unwrap();
        let skills = html.find("<h2>专业技能</h2>").unwrap();
        assert!(main_start < work && work < side_start);
        assert!(skills > side_start);
    }

    #[test]
    fn test_header_band_shows_role_and_contacts() {
        let data = ResumeData {
            name: Some("张三".to_string()),
            target_position: Some("后端工程师".to_string()),
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let html = render_fragment(&data);
        assert!(html.contains("<div class=\"name\">张三</div>"));
        assert!(html.contains("<div class=\"role\">后端工程师</div>"));
        assert!(html.contains("a@b.com"));
        // Job target info is repeated in the side column.
        assert!(html.contains("<h2>求职意向</h2>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let data = ResumeData {
            name: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let html = render_fragment(&data);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let data = ResumeData {
            projects: Some("项目 A\n- 细节".to_string()),
            ..Default::default()
        };
        assert_eq!(render_fragment(&data), render_fragment(&data));
    }

    #[test]
    fn test_document_is_standalone() {
        let html = render_document(&ResumeData::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("width: 794px"));
        assert!(!html.contains("<link"));
    }
}
