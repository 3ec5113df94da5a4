//! Edge polylines, arrowheads and midpoint labels.

use flowsketch_core::{escape_xml, sanitize_svg_id, EdgeDirection, LayoutEdge, Point};

use crate::rng::Rng;
use crate::text::FONT_SIZE_EDGE_LABEL;
use crate::theme::ThemeConfig;

const ARROW_SIZE: f64 = 10.0;
const ARROW_ROTATION: f64 = 0.82 * std::f64::consts::PI;
const DEFAULT_EDGE_COLOR: &str = "#333333";
const LABEL_BG_HEIGHT: f64 = 20.0;
const LABEL_BG_MIN_WIDTH: f64 = 30.0;

pub(crate) fn sketchy_segment(
    rng: &mut Rng,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    stroke: &str,
    theme: &ThemeConfig,
    dasharray: Option<&str>,
) -> String {
    let dash_attr = match dasharray {
        Some(d) => format!(r#" stroke-dasharray="{d}""#),
        None => String::new(),
    };

    if !theme.is_sketchy() {
        return format!(
            r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{stroke}" stroke-width="{:.1}"{dash_attr}/>"#,
            theme.stroke_width
        );
    }

    let (jx1, jy1) = rng.jitter_point(x1, y1, theme.jitter_amount);
    let (jx2, jy2) = rng.jitter_point(x2, y2, theme.jitter_amount);
    let (mx, my) = rng.jitter_point((x1 + x2) / 2.0, (y1 + y2) / 2.0, theme.jitter_amount);
    let mut out = format!(
        r#"<path d="M{jx1:.1} {jy1:.1} Q{mx:.1} {my:.1} {jx2:.1} {jy2:.1}" stroke="{stroke}" stroke-width="{:.1}" fill="none"{dash_attr}/>"#,
        theme.stroke_width
    );
    if theme.double_stroke {
        let (jx1b, jy1b) = rng.jitter_point(x1, y1, theme.jitter_amount);
        let (jx2b, jy2b) = rng.jitter_point(x2, y2, theme.jitter_amount);
        let (mxb, myb) = rng.jitter_point((x1 + x2) / 2.0, (y1 + y2) / 2.0, theme.jitter_amount);
        out.push_str(&format!(
            r#"<path d="M{jx1b:.1} {jy1b:.1} Q{mxb:.1} {myb:.1} {jx2b:.1} {jy2b:.1}" stroke="{stroke}" stroke-width="{:.1}" fill="none" opacity="0.3"{dash_attr}/>"#,
            theme.stroke_width / 2.0
        ));
    }
    out
}

/// Four sketchy edges around a closed rectangle (used by groups), with an optional dasharray.
pub(crate) fn sketchy_rect_edges(
    rng: &mut Rng,
    corners: &[(f64, f64); 4],
    stroke: &str,
    theme: &ThemeConfig,
    dasharray: Option<&str>,
) -> String {
    let mut out = String::new();
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        out.push_str(&sketchy_segment(rng, a, b, stroke, theme, dasharray));
    }
    out
}

/// A filled arrowhead triangle at `tip`, aimed back towards `from`.
fn arrowhead(rng: &mut Rng, tip: (f64, f64), from: (f64, f64), fill: &str, theme: &ThemeConfig) -> String {
    let angle = (tip.1 - from.1).atan2(tip.0 - from.0);
    let base = |rotation: f64| -> (f64, f64) {
        let a = angle + rotation;
        (tip.0 + ARROW_SIZE * a.cos(), tip.1 + ARROW_SIZE * a.sin())
    };
    let p1 = base(ARROW_ROTATION);
    let p2 = base(-ARROW_ROTATION);

    let points = if theme.is_sketchy() {
        [
            rng.jitter_point(tip.0, tip.1, theme.jitter_amount / 2.0),
            rng.jitter_point(p1.0, p1.1, theme.jitter_amount / 2.0),
            rng.jitter_point(p2.0, p2.1, theme.jitter_amount / 2.0),
        ]
    } else {
        [tip, p1, p2]
    };

    format!(
        r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="{fill}"/>"#,
        points[0].0, points[0].1, points[1].0, points[1].1, points[2].0, points[2].1
    )
}

fn mid_waypoint(points: &[Point]) -> (f64, f64) {
    let n = points.len();
    if n % 2 == 1 {
        let p = points[n / 2];
        (p.x, p.y)
    } else {
        let a = points[n / 2 - 1];
        let b = points[n / 2];
        ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }
}

fn render_label(x: f64, y: f64, label: &str) -> String {
    let width = ((label.chars().count() as f64) * 7.0 + 12.0).max(LABEL_BG_MIN_WIDTH);
    let rect_x = x - width / 2.0;
    let rect_y = y - LABEL_BG_HEIGHT / 2.0;
    format!(
        r#"<rect x="{rect_x:.1}" y="{rect_y:.1}" width="{width:.1}" height="{LABEL_BG_HEIGHT:.1}" rx="3" fill="#ffffff" fill-opacity="0.9"/><text x="{x:.1}" y="{y:.1}" text-anchor="middle" dominant-baseline="middle" font-size="{FONT_SIZE_EDGE_LABEL}" fill="#333333">{}</text>"#,
        escape_xml(label)
    )
}

/// Renders one edge, including its `<g class="edge" data-from data-to>` wrapper.
pub fn render_edge(edge: &LayoutEdge, theme: &ThemeConfig, rng: &mut Rng) -> String {
    let stroke = edge.color.clone().unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string());
    let dasharray = edge.style.dasharray();

    let mut out = String::new();
    for pair in edge.points.windows(2) {
        out.push_str(&sketchy_segment(
            rng,
            (pair[0].x, pair[0].y),
            (pair[1].x, pair[1].y),
            &stroke,
            theme,
            dasharray,
        ));
    }

    let first = edge.points.first().copied().unwrap_or(Point { x: 0.0, y: 0.0 });
    let second = edge.points.get(1).copied().unwrap_or(first);
    let last = edge.points.last().copied().unwrap_or(first);
    let penultimate = if edge.points.len() >= 2 {
        edge.points[edge.points.len() - 2]
    } else {
        last
    };

    match edge.direction {
        EdgeDirection::Forward => {
            out.push_str(&arrowhead(rng, (last.x, last.y), (penultimate.x, penultimate.y), &stroke, theme));
        }
        EdgeDirection::Backward => {
            out.push_str(&arrowhead(rng, (first.x, first.y), (second.x, second.y), &stroke, theme));
        }
        EdgeDirection::Both => {
            out.push_str(&arrowhead(rng, (last.x, last.y), (penultimate.x, penultimate.y), &stroke, theme));
            out.push_str(&arrowhead(rng, (first.x, first.y), (second.x, second.y), &stroke, theme));
        }
        EdgeDirection::None => {}
    }

    if let Some(label) = &edge.label {
        let (mx, my) = mid_waypoint(&edge.points);
        out.push_str(&render_label(mx, my, label));
    }

    format!(
        r#"<g class="edge" data-from="{}" data-to="{}">{out}</g>"#,
        escape_xml(&sanitize_svg_id(&edge.from)),
        escape_xml(&sanitize_svg_id(&edge.to)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::config_for;
    use flowsketch_core::{EdgeStyle, Theme};

    fn edge(style: EdgeStyle, direction: EdgeDirection, label: Option<&str>) -> LayoutEdge {
        LayoutEdge {
            from: "a".into(),
            to: "b".into(),
            label: label.map(str::to_string),
            style,
            direction,
            color: None,
            points: vec![Point { x: 0.0, y: 0.0 }, Point { x: 100.0, y: 50.0 }],
        }
    }

    #[test]
    fn dashed_edge_emits_dasharray() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Dashed, EdgeDirection::Forward, None),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert!(svg.contains(r#"stroke-dasharray="8,4""#));
    }

    #[test]
    fn dotted_edge_emits_dasharray() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Dotted, EdgeDirection::Forward, None),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert!(svg.contains(r#"stroke-dasharray="3,3""#));
    }

    #[test]
    fn label_is_rendered_inside_the_edge_group() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Solid, EdgeDirection::Forward, Some("maybe")),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert!(svg.contains(r#"<g class="edge""#));
        assert!(svg.contains("maybe"));
    }

    #[test]
    fn forward_direction_emits_exactly_one_arrowhead_polygon() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Solid, EdgeDirection::Forward, None),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert_eq!(svg.matches("<polygon").count(), 1);
    }

    #[test]
    fn both_direction_emits_two_arrowheads() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Solid, EdgeDirection::Both, None),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert_eq!(svg.matches("<polygon").count(), 2);
    }

    #[test]
    fn none_direction_emits_no_arrowhead() {
        let mut rng = Rng::new();
        let svg = render_edge(
            &edge(EdgeStyle::Solid, EdgeDirection::None, None),
            &config_for(Theme::Clean),
            &mut rng,
        );
        assert_eq!(svg.matches("<polygon").count(), 0);
    }
}
