//! Group (compound-node) rendering: a dashed, low-opacity rectangle with an optional label.

use flowsketch_core::{escape_xml, sanitize_svg_id, LayoutGroup};

use crate::edges::sketchy_rect_edges;
use crate::rng::Rng;
use crate::theme::ThemeConfig;

const DASH_PATTERN: &str = "6,4";
const FILL_OPACITY: f64 = 0.05;
const DEFAULT_STROKE: &str = "#AAAAAA";
const DEFAULT_FILL: &str = "#F5F5F5";
const LABEL_FONT_SIZE: f64 = 12.0;
const LABEL_OFFSET_X: f64 = 12.0;
const LABEL_OFFSET_Y: f64 = 14.0;

/// Renders one group, including its `<g class="group" data-id="…">` wrapper.
pub fn render_group(group: &LayoutGroup, theme: &ThemeConfig, rng: &mut Rng) -> String {
    let fill = group.color.as_deref().unwrap_or(DEFAULT_FILL);
    let stroke = DEFAULT_STROKE;
    let corners = [
        (group.x, group.y),
        (group.x + group.width, group.y),
        (group.x + group.width, group.y + group.height),
        (group.x, group.y + group.height),
    ];

    let mut out = if !theme.is_sketchy() {
        format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="{fill}" fill-opacity="{FILL_OPACITY}" stroke="{stroke}" stroke-width="{:.1}" stroke-dasharray="{DASH_PATTERN}"/>"#,
            group.x, group.y, group.width, group.height, theme.corner_radius, theme.stroke_width
        )
    } else {
        let mut body = format!(
            r#"<polygon points="{}" fill="{fill}" fill-opacity="{FILL_OPACITY}"/>"#,
            corners.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect::<Vec<_>>().join(" ")
        );
        body.push_str(&sketchy_rect_edges(rng, &corners, stroke, theme, Some(DASH_PATTERN)));
        body
    };

    if let Some(label) = &group.label {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="start" font-size="{LABEL_FONT_SIZE}" fill="{DEFAULT_STROKE}">{}</text>"#,
            group.x + LABEL_OFFSET_X,
            group.y + LABEL_OFFSET_Y,
            escape_xml(label)
        ));
    }

    format!(
        r#"<g class="group" data-id="{}">{out}</g>"#,
        escape_xml(&sanitize_svg_id(&group.id))
    )
}
