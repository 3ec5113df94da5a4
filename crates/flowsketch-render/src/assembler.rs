//! Assembles node/edge/group (or participant/message) content strings into a single,
//! self-contained SVG document.

use flowsketch_core::escape_xml;

use crate::theme::ThemeConfig;

const TITLE_HEIGHT: f64 = 40.0;
const TITLE_FONT_SIZE: f64 = 18.0;
const TITLE_Y: f64 = 24.0;

/// Wraps rendered diagram content in an `<svg>` document. When `title` is present the total
/// canvas height is `layout_height + TITLE_HEIGHT` and the content is offset by a
/// `translate(0, 40)` group so the title sits above it.
pub fn assemble(content: &str, layout_width: f64, layout_height: f64, title: Option<&str>, theme: &ThemeConfig) -> String {
    let total_height = layout_height + if title.is_some() { TITLE_HEIGHT } else { 0.0 };

    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {layout_width:.1} {total_height:.1}" width="{layout_width:.1}" height="{total_height:.1}" font-family="{}">"#,
        theme.font_family
    ));
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{layout_width:.1}" height="{total_height:.1}" fill="#ffffff"/>"#
    ));

    if let Some(title) = title {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{TITLE_Y:.1}" text-anchor="middle" font-size="{TITLE_FONT_SIZE}" font-weight="bold" fill="#333333">{}</text>"#,
            layout_width / 2.0,
            escape_xml(title)
        ));
        out.push_str(&format!(r#"<g transform="translate(0, {TITLE_HEIGHT:.1})">{content}</g>"#));
    } else {
        out.push_str(content);
    }

    out.push_str("</svg>");
    out
}
