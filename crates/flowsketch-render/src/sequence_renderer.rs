//! Sequence diagram rendering: lifelines, participant boxes, and horizontal/self messages.

use flowsketch_core::{escape_xml, sanitize_svg_id, LayoutMessage, LayoutParticipant};

use crate::color::{darken, palette_color};
use crate::edges::sketchy_segment;
use crate::rng::Rng;
use crate::text::{first_line_y_offset, wrap_label, FONT_SIZE_EDGE_LABEL, FONT_SIZE_PARTICIPANT};
use crate::theme::ThemeConfig;

const BOX_HEIGHT: f64 = 40.0;
const MAX_CHARS_PER_LINE: usize = 18;
const LIFELINE_TOP_OFFSET: f64 = 40.0;
const LIFELINE_STROKE: &str = "#999999";
const LIFELINE_DASH: &str = "6,4";
const SELF_LOOP_WIDTH: f64 = 30.0;
const SELF_LOOP_HEIGHT: f64 = 20.0;
const ARROW_SIZE: f64 = 10.0;
const DEFAULT_TEXT_COLOR: &str = "#333333";

fn render_lifeline(p: &LayoutParticipant, top_y: f64, bottom_y: f64, theme: &ThemeConfig, rng: &mut Rng) -> String {
    sketchy_segment(
        rng,
        (p.x, top_y + LIFELINE_TOP_OFFSET),
        (p.x, bottom_y),
        LIFELINE_STROKE,
        theme,
        Some(LIFELINE_DASH),
    )
}

fn render_participant_label(cx: f64, cy: f64, label: &str, text_color: &str) -> String {
    let lines = wrap_label(label, MAX_CHARS_PER_LINE);
    let start_dy = first_line_y_offset(lines.len(), FONT_SIZE_PARTICIPANT);
    let mut tspans = String::new();
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 {
            start_dy
        } else {
            FONT_SIZE_PARTICIPANT * crate::text::LINE_HEIGHT_FACTOR
        };
        tspans.push_str(&format!(
            r#"<tspan x="{cx:.1}" dy="{dy:.1}">{}</tspan>"#,
            escape_xml(line)
        ));
    }
    format!(
        r#"<text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" font-size="{FONT_SIZE_PARTICIPANT}" fill="{text_color}">{tspans}</text>"#
    )
}

fn render_box(p: &LayoutParticipant, y: f64, index: usize, theme: &ThemeConfig) -> String {
    let fill = p.color.as_deref().unwrap_or_else(|| palette_color(index)).to_string();
    let stroke = darken(&fill, 0.3);
    let x = p.x - p.width / 2.0;
    let rect = format!(
        r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{BOX_HEIGHT:.1}" rx="{:.1}" fill="{fill}" fill-opacity="{}" stroke="{stroke}" stroke-width="{:.1}"/>"#,
        p.width, theme.corner_radius, theme.fill_opacity, theme.stroke_width
    );
    let label = render_participant_label(p.x, y + BOX_HEIGHT / 2.0, &p.label, DEFAULT_TEXT_COLOR);
    format!("{rect}{label}")
}

/// Renders the top and bottom participant boxes plus the lifeline for one participant.
pub fn render_participant(
    p: &LayoutParticipant,
    index: usize,
    top_y: f64,
    bottom_y: f64,
    theme: &ThemeConfig,
    rng: &mut Rng,
) -> String {
    let lifeline = render_lifeline(p, top_y, bottom_y, theme, rng);
    let top_box = render_box(p, top_y, index, theme);
    let bottom_box = render_box(p, bottom_y - BOX_HEIGHT, index, theme);
    format!(
        r#"<g class="participant" data-id="{}">{lifeline}{top_box}{bottom_box}</g>"#,
        escape_xml(&sanitize_svg_id(&p.id))
    )
}

fn arrow_polygon(tip: (f64, f64), pointing_right: bool) -> String {
    let (x, y) = tip;
    let dx = if pointing_right { -ARROW_SIZE } else { ARROW_SIZE };
    format!(
        r#"<polygon points="{x:.1},{y:.1} {:.1},{:.1} {:.1},{:.1}" fill="#333333"/>"#,
        x + dx,
        y - ARROW_SIZE / 2.0,
        x + dx,
        y + ARROW_SIZE / 2.0
    )
}

fn render_label(x: f64, y: f64, label: &str, anchor: &str) -> String {
    format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="{anchor}" font-size="{FONT_SIZE_EDGE_LABEL}" fill="#333333">{}</text>"#,
        escape_xml(label)
    )
}

fn render_normal_message(
    msg: &LayoutMessage,
    from: &LayoutParticipant,
    to: &LayoutParticipant,
    theme: &ThemeConfig,
    rng: &mut Rng,
) -> String {
    let stroke = msg.color.as_deref().unwrap_or("#333333");
    let mut out = sketchy_segment(rng, (from.x, msg.y), (to.x, msg.y), stroke, theme, msg.style.dasharray());
    out.push_str(&arrow_polygon((to.x, msg.y), to.x > from.x));

    if let Some(label) = &msg.label {
        let mid_x = (from.x + to.x) / 2.0;
        out.push_str(&render_label(mid_x, msg.y - 8.0, label, "middle"));
    }
    out
}

fn render_self_message(msg: &LayoutMessage, p: &LayoutParticipant, theme: &ThemeConfig, rng: &mut Rng) -> String {
    let x0 = p.x;
    let y0 = msg.y;
    let x1 = x0 + SELF_LOOP_WIDTH;
    let y1 = y0 + SELF_LOOP_HEIGHT;

    let mut out = sketchy_segment(rng, (x0, y0), (x1, y0), "#333333", theme, msg.style.dasharray());
    out.push_str(&sketchy_segment(rng, (x1, y0), (x1, y1), "#333333", theme, msg.style.dasharray()));
    out.push_str(&sketchy_segment(rng, (x1, y1), (x0, y1), "#333333", theme, msg.style.dasharray()));
    out.push_str(&arrow_polygon((x0, y1), false));

    if let Some(label) = &msg.label {
        out.push_str(&render_label(x1 + 6.0, (y0 + y1) / 2.0, label, "start"));
    }
    out
}

/// Renders one message (normal or self), including its `<g class="message">` wrapper.
pub fn render_message(
    msg: &LayoutMessage,
    participants: &[LayoutParticipant],
    theme: &ThemeConfig,
    rng: &mut Rng,
) -> Option<String> {
    let from = participants.iter().find(|p| p.id == msg.from)?;
    let body = if msg.is_self {
        render_self_message(msg, from, theme, rng)
    } else {
        let to = participants.iter().find(|p| p.id == msg.to)?;
        render_normal_message(msg, from, to, theme, rng)
    };
    Some(format!(
        r#"<g class="message" data-from="{}" data-to="{}">{body}</g>"#,
        escape_xml(&sanitize_svg_id(&msg.from)),
        escape_xml(&sanitize_svg_id(&msg.to)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::config_for;
    use flowsketch_core::{EdgeStyle, Theme};

    fn participant(id: &str, x: f64) -> LayoutParticipant {
        LayoutParticipant {
            id: id.to_string(),
            label: id.to_string(),
            x,
            width: 100.0,
            color: None,
        }
    }

    #[test]
    fn self_message_draws_a_loop_and_its_label() {
        let participants = vec![participant("svc", 100.0)];
        let msg = LayoutMessage {
            from: "svc".into(),
            to: "svc".into(),
            label: Some("tick".into()),
            style: EdgeStyle::Solid,
            color: None,
            y: 200.0,
            is_self: true,
        };
        let mut rng = Rng::new();
        let svg = render_message(&msg, &participants, &config_for(Theme::Clean), &mut rng).unwrap();
        assert!(svg.contains("tick"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn normal_message_references_both_participants() {
        let participants = vec![participant("a", 50.0), participant("b", 250.0)];
        let msg = LayoutMessage {
            from: "a".into(),
            to: "b".into(),
            label: Some("hello".into()),
            style: EdgeStyle::Solid,
            color: None,
            y: 150.0,
            is_self: false,
        };
        let mut rng = Rng::new();
        let svg = render_message(&msg, &participants, &config_for(Theme::Clean), &mut rng).unwrap();
        assert!(svg.contains(r#"data-from="a""#));
        assert!(svg.contains(r#"data-to="b""#));
        assert!(svg.contains("hello"));
    }

    #[test]
    fn message_with_unknown_participant_is_skipped() {
        let participants = vec![participant("a", 50.0)];
        let msg = LayoutMessage {
            from: "a".into(),
            to: "ghost".into(),
            label: None,
            style: EdgeStyle::Solid,
            color: None,
            y: 150.0,
            is_self: false,
        };
        let mut rng = Rng::new();
        assert!(render_message(&msg, &participants, &config_for(Theme::Clean), &mut rng).is_none());
    }
}
