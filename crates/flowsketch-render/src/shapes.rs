//! The seven node shape renderers. Sketchy (`jitterAmount > 0`) shapes are built from jittered
//! corner/anchor points joined by sketchy lines or Bézier curves; clean/minimal themes use native
//! SVG primitives.

use flowsketch_core::{escape_xml, sanitize_svg_id, LayoutNode, Shape};

use crate::color::{darken, palette_color};
use crate::rng::Rng;
use crate::text::{first_line_y_offset, wrap_label, FONT_SIZE_SHAPE};
use crate::theme::ThemeConfig;

const MAX_CHARS_PER_LINE: usize = 18;
const DEFAULT_TEXT_COLOR: &str = "#333333";

/// A single jittered quadratic-Bézier line between two points, optionally drawn twice (double
/// stroke) at half width and 0.3 opacity.
fn sketchy_line(
    rng: &mut Rng,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    stroke: &str,
    stroke_width: f64,
    jitter_amount: f64,
    double_stroke: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&one_sketchy_pass(rng, (x1, y1), (x2, y2), stroke, stroke_width, jitter_amount, 1.0));
    if double_stroke {
        out.push_str(&one_sketchy_pass(
            rng,
            (x1, y1),
            (x2, y2),
            stroke,
            stroke_width / 2.0,
            jitter_amount,
            0.3,
        ));
    }
    out
}

fn one_sketchy_pass(
    rng: &mut Rng,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    stroke: &str,
    stroke_width: f64,
    jitter_amount: f64,
    opacity: f64,
) -> String {
    let (jx1, jy1) = rng.jitter_point(x1, y1, jitter_amount);
    let (jx2, jy2) = rng.jitter_point(x2, y2, jitter_amount);
    let (mx, my) = rng.jitter_point((x1 + x2) / 2.0, (y1 + y2) / 2.0, jitter_amount);
    format!(
        r#"<path d="M{jx1:.1} {jy1:.1} Q{mx:.1} {my:.1} {jx2:.1} {jy2:.1}" stroke="{stroke}" stroke-width="{stroke_width:.1}" fill="none" opacity="{opacity}"/>"#,
    )
}

fn polygon(points: &[(f64, f64)], fill: &str, fill_opacity: f64) -> String {
    let pts = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#"<polygon points="{pts}" fill="{fill}" fill-opacity="{fill_opacity}"/>"#)
}

fn sketchy_polygon_edges(
    rng: &mut Rng,
    points: &[(f64, f64)],
    stroke: &str,
    stroke_width: f64,
    jitter_amount: f64,
    double_stroke: bool,
) -> String {
    let mut out = String::new();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        out.push_str(&sketchy_line(rng, a, b, stroke, stroke_width, jitter_amount, double_stroke));
    }
    out
}

struct ShapeGeometry<'a> {
    cx: f64,
    cy: f64,
    width: f64,
    height: f64,
    fill: &'a str,
    stroke: &'a str,
    theme: &'a ThemeConfig,
}

fn render_rectangle(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let corners = [
        (cx - w / 2.0, cy - h / 2.0),
        (cx + w / 2.0, cy - h / 2.0),
        (cx + w / 2.0, cy + h / 2.0),
        (cx - w / 2.0, cy + h / 2.0),
    ];
    if !g.theme.is_sketchy() {
        return format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
            corners[0].0,
            corners[0].1,
            w,
            h,
            g.theme.corner_radius,
            g.fill,
            g.theme.fill_opacity,
            g.stroke,
            g.theme.stroke_width
        );
    }
    let jittered: Vec<(f64, f64)> = corners
        .iter()
        .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
        .collect();
    let mut out = polygon(&jittered, g.fill, g.theme.fill_opacity);
    out.push_str(&sketchy_polygon_edges(
        rng,
        &corners,
        g.stroke,
        g.theme.stroke_width,
        g.theme.jitter_amount,
        g.theme.double_stroke,
    ));
    out
}

fn render_diamond(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let points = [
        (cx, cy - h / 2.0),
        (cx + w / 2.0, cy),
        (cx, cy + h / 2.0),
        (cx - w / 2.0, cy),
    ];
    if !g.theme.is_sketchy() {
        return polygon(&points, g.fill, g.theme.fill_opacity)
            + &format!(
                r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
                points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect::<Vec<_>>().join(" "),
                g.stroke,
                g.theme.stroke_width
            );
    }
    let jittered: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
        .collect();
    let mut out = polygon(&jittered, g.fill, g.theme.fill_opacity);
    out.push_str(&sketchy_polygon_edges(
        rng,
        &points,
        g.stroke,
        g.theme.stroke_width,
        g.theme.jitter_amount,
        g.theme.double_stroke,
    ));
    out
}

fn render_hexagon(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let inset = w * 0.25;
    let points = [
        (cx - w / 2.0 + inset, cy - h / 2.0),
        (cx + w / 2.0 - inset, cy - h / 2.0),
        (cx + w / 2.0, cy),
        (cx + w / 2.0 - inset, cy + h / 2.0),
        (cx - w / 2.0 + inset, cy + h / 2.0),
        (cx - w / 2.0, cy),
    ];
    if !g.theme.is_sketchy() {
        return polygon(&points, g.fill, g.theme.fill_opacity)
            + &format!(
                r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
                points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect::<Vec<_>>().join(" "),
                g.stroke,
                g.theme.stroke_width
            );
    }
    let jittered: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
        .collect();
    let mut out = polygon(&jittered, g.fill, g.theme.fill_opacity);
    out.push_str(&sketchy_polygon_edges(
        rng,
        &points,
        g.stroke,
        g.theme.stroke_width,
        g.theme.jitter_amount,
        g.theme.double_stroke,
    ));
    out
}

fn render_parallelogram(rng: &mut Rng, g: &ShapeGeometry) -> String {
    const SKEW: f64 = 15.0;
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let points = [
        (cx - w / 2.0 + SKEW, cy - h / 2.0),
        (cx + w / 2.0, cy - h / 2.0),
        (cx + w / 2.0 - SKEW, cy + h / 2.0),
        (cx - w / 2.0, cy + h / 2.0),
    ];
    if !g.theme.is_sketchy() {
        return polygon(&points, g.fill, g.theme.fill_opacity)
            + &format!(
                r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
                points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect::<Vec<_>>().join(" "),
                g.stroke,
                g.theme.stroke_width
            );
    }
    let jittered: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
        .collect();
    let mut out = polygon(&jittered, g.fill, g.theme.fill_opacity);
    out.push_str(&sketchy_polygon_edges(
        rng,
        &points,
        g.stroke,
        g.theme.stroke_width,
        g.theme.jitter_amount,
        g.theme.double_stroke,
    ));
    out
}

fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64, n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            (cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect()
}

fn render_ellipse(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let (rx, ry) = (w / 2.0, h / 2.0);
    if !g.theme.is_sketchy() {
        return format!(
            r#"<ellipse cx="{cx:.1}" cy="{cy:.1}" rx="{rx:.1}" ry="{ry:.1}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
            g.fill, g.theme.fill_opacity, g.stroke, g.theme.stroke_width
        );
    }

    let anchors = ellipse_points(cx, cy, rx, ry, 8);
    let jittered: Vec<(f64, f64)> = anchors
        .iter()
        .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
        .collect();

    let mut fill_path = format!("M{:.1} {:.1} ", jittered[0].0, jittered[0].1);
    for i in 0..jittered.len() {
        let a = jittered[i];
        let b = jittered[(i + 1) % jittered.len()];
        let seg_x = a.0 + (b.0 - a.0) * 0.4;
        let seg_y = a.1 + (b.1 - a.1) * 0.4;
        let (cpx, cpy) = rng.jitter_point(seg_x, seg_y, g.theme.jitter_amount);
        fill_path.push_str(&format!("C{cpx:.1} {cpy:.1}, {cpx:.1} {cpy:.1}, {:.1} {:.1} ", b.0, b.1));
    }
    let mut out = format!(
        r#"<path d="{}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
        fill_path.trim_end(),
        g.fill,
        g.theme.fill_opacity,
        g.stroke,
        g.theme.stroke_width
    );
    if g.theme.double_stroke {
        let offset_anchors = ellipse_points(cx, cy, rx * 0.97, ry * 0.97, 8);
        let jittered_inner: Vec<(f64, f64)> = offset_anchors
            .iter()
            .map(|&(x, y)| rng.jitter_point(x, y, g.theme.jitter_amount))
            .collect();
        let mut inner_path = format!("M{:.1} {:.1} ", jittered_inner[0].0, jittered_inner[0].1);
        for i in 0..jittered_inner.len() {
            let b = jittered_inner[(i + 1) % jittered_inner.len()];
            inner_path.push_str(&format!("L{:.1} {:.1} ", b.0, b.1));
        }
        out.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" opacity="0.3"/>"#,
            inner_path.trim_end(),
            g.stroke,
            g.theme.stroke_width / 2.0
        ));
    }
    out
}

fn render_cylinder(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let ry = (15.0_f64).min(h * 0.15);
    let top = cy - h / 2.0;
    let bottom = cy + h / 2.0;
    let (left, right) = (cx - w / 2.0, cx + w / 2.0);

    let mut out = format!(
        r#"<rect x="{left:.1}" y="{:.1}" width="{w:.1}" height="{:.1}" fill="{}" fill-opacity="{}"/>"#,
        top + ry,
        h - 2.0 * ry,
        g.fill,
        g.theme.fill_opacity
    );
    out.push_str(&format!(
        r#"<ellipse cx="{cx:.1}" cy="{:.1}" rx="{:.1}" ry="{ry:.1}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
        bottom,
        w / 2.0,
        g.fill,
        g.theme.fill_opacity,
        g.stroke,
        g.theme.stroke_width
    ));

    if g.theme.is_sketchy() {
        out.push_str(&sketchy_line(
            rng,
            (left, top + ry),
            (left, bottom),
            g.stroke,
            g.theme.stroke_width,
            g.theme.jitter_amount,
            g.theme.double_stroke,
        ));
        out.push_str(&sketchy_line(
            rng,
            (right, top + ry),
            (right, bottom),
            g.stroke,
            g.theme.stroke_width,
            g.theme.jitter_amount,
            g.theme.double_stroke,
        ));
    } else {
        out.push_str(&format!(
            r#"<line x1="{left:.1}" y1="{:.1}" x2="{left:.1}" y2="{bottom:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            top + ry,
            g.stroke,
            g.theme.stroke_width
        ));
        out.push_str(&format!(
            r#"<line x1="{right:.1}" y1="{:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            top + ry,
            g.stroke,
            g.theme.stroke_width
        ));
    }

    out.push_str(&format!(
        r#"<ellipse cx="{cx:.1}" cy="{:.1}" rx="{:.1}" ry="{ry:.1}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
        top + ry,
        w / 2.0,
        g.fill,
        g.theme.fill_opacity,
        g.stroke,
        g.theme.stroke_width
    ));

    out
}

fn render_cloud(rng: &mut Rng, g: &ShapeGeometry) -> String {
    let (cx, cy, w, h) = (g.cx, g.cy, g.width, g.height);
    let anchors = ellipse_points(cx, cy, w / 2.0, h / 2.0, 8);

    let (start, rest) = anchors.split_first().expect("8 anchors always present");
    let mut path = format!("M{:.1} {:.1} ", start.0, start.1);
    let mut prev = *start;
    for &next in rest.iter().chain(std::iter::once(start)) {
        let outward_x = (prev.0 + next.0) / 2.0 + (prev.0 - cx) * 0.3;
        let outward_y = (prev.1 + next.1) / 2.0 + (prev.1 - cy) * 0.3;
        let (cpx, cpy) = if g.theme.is_sketchy() {
            rng.jitter_point(outward_x, outward_y, g.theme.jitter_amount)
        } else {
            (outward_x, outward_y)
        };
        path.push_str(&format!("Q{cpx:.1} {cpy:.1}, {:.1} {:.1} ", next.0, next.1));
        prev = next;
    }

    let mut out = format!(
        r#"<path d="{}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{:.1}"/>"#,
        path.trim_end(),
        g.fill,
        g.theme.fill_opacity,
        g.stroke,
        g.theme.stroke_width
    );

    if g.theme.is_sketchy() && g.theme.double_stroke {
        out.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" opacity="0.3"/>"#,
            path.trim_end(),
            g.stroke,
            g.theme.stroke_width / 2.0
        ));
    }

    out
}

fn render_shape_body(rng: &mut Rng, shape: Shape, g: &ShapeGeometry) -> String {
    match shape {
        Shape::Rectangle => render_rectangle(rng, g),
        Shape::Ellipse => render_ellipse(rng, g),
        Shape::Diamond => render_diamond(rng, g),
        Shape::Cylinder => render_cylinder(rng, g),
        Shape::Cloud => render_cloud(rng, g),
        Shape::Hexagon => render_hexagon(rng, g),
        Shape::Parallelogram => render_parallelogram(rng, g),
    }
}

fn label_y_shift(shape: Shape, height: f64) -> f64 {
    match shape {
        Shape::Cylinder => (15.0_f64.min(height * 0.15)) / 2.0,
        Shape::Cloud => height * 0.04,
        _ => 0.0,
    }
}

fn render_label(cx: f64, cy: f64, label: &str, text_color: &str) -> String {
    let lines = wrap_label(label, MAX_CHARS_PER_LINE);
    let start_dy = first_line_y_offset(lines.len(), FONT_SIZE_SHAPE);
    let mut tspans = String::new();
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 {
            start_dy
        } else {
            FONT_SIZE_SHAPE * crate::text::LINE_HEIGHT_FACTOR
        };
        tspans.push_str(&format!(
            r#"<tspan x="{cx:.1}" dy="{dy:.1}">{}</tspan>"#,
            escape_xml(line)
        ));
    }
    format!(
        r#"<text x="{cx:.1}" y="{cy:.1}" text-anchor="middle" font-size="{FONT_SIZE_SHAPE}" fill="{text_color}">{tspans}</text>"#
    )
}

/// Renders one node, including its `<g class="node" data-id="…">` wrapper.
pub fn render_node(node: &LayoutNode, index: usize, theme: &ThemeConfig, rng: &mut Rng) -> String {
    let fill = node.color.as_deref().unwrap_or_else(|| palette_color(index)).to_string();
    let stroke = darken(&fill, 0.3);
    let text_color = node.text_color.clone().unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string());

    let geometry = ShapeGeometry {
        cx: node.x + node.width / 2.0,
        cy: node.y + node.height / 2.0,
        width: node.width,
        height: node.height,
        fill: &fill,
        stroke: &stroke,
        theme,
    };

    let body = render_shape_body(rng, node.shape, &geometry);
    let label_cy = geometry.cy + label_y_shift(node.shape, node.height);
    let label = render_label(geometry.cx, label_cy, &node.label, &text_color);

    format!(
        r#"<g class="node" data-id="{}">{body}{label}</g>"#,
        escape_xml(&sanitize_svg_id(&node.id))
    )
}
