//! Flow diagram layout: builds a hierarchical graph, hands it to [`dugong`]'s layered layout
//! service, and absolutises the result into a [`LayoutResult`].

use std::collections::HashMap;

use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};
use flowsketch_core::{
    Direction, FlowDiagram, LayoutEdge, LayoutGroup, LayoutNode, LayoutResult, Point,
};

use crate::error::LayoutError;

const PADDING: f64 = 40.0;
const NODE_MIN_WIDTH: f64 = 120.0;
const NODE_HEIGHT: f64 = 60.0;
const CHAR_WIDTH_PX: f64 = 10.0;
const NODE_HORIZONTAL_PADDING: f64 = 40.0;
const NODE_SPACING: f64 = 50.0;
const LAYER_SPACING: f64 = 80.0;
const GROUP_PADDING: f64 = 30.0;

fn rank_dir(direction: Direction) -> RankDir {
    match direction {
        Direction::TB => RankDir::TB,
        Direction::LR => RankDir::LR,
        Direction::BT => RankDir::BT,
        Direction::RL => RankDir::RL,
    }
}

fn node_width(label: &str) -> f64 {
    (label.chars().count() as f64).mul_add(CHAR_WIDTH_PX, NODE_HORIZONTAL_PADDING).max(NODE_MIN_WIDTH)
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Lays out a flow diagram. See `flowsketch-layout` crate docs for the algorithm.
pub fn layout_flow(diagram: &FlowDiagram) -> Result<LayoutResult, LayoutError> {
    tracing::debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        groups = diagram.groups.len(),
        "laying out flow diagram"
    );

    let node_ids: std::collections::HashSet<&str> =
        diagram.nodes.iter().map(|n| n.id.as_str()).collect();

    // Last-writer-wins: later groups overwrite earlier claims on the same node id.
    let mut node_to_group: HashMap<&str, &str> = HashMap::new();
    for group in &diagram.groups {
        for member in &group.contains {
            if node_ids.contains(member.as_str()) {
                node_to_group.insert(member.as_str(), group.id.as_str());
            } else {
                tracing::warn!(group = %group.id, node = %member, "group references unknown node id, ignored");
            }
        }
    }

    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
        directed: true,
        compound: true,
        multigraph: true,
    });
    g.set_graph(GraphLabel {
        rankdir: rank_dir(diagram.direction),
        nodesep: NODE_SPACING,
        ranksep: LAYER_SPACING,
        ..Default::default()
    });

    for group in &diagram.groups {
        g.set_node(group.id.clone(), NodeLabel::default());
    }

    for node in &diagram.nodes {
        let width = node.width.unwrap_or_else(|| node_width(&node.label));
        let height = node.height.unwrap_or(NODE_HEIGHT);
        g.set_node(
            node.id.clone(),
            NodeLabel {
                width,
                height,
                ..Default::default()
            },
        );
        if let Some(group_id) = node_to_group.get(node.id.as_str()) {
            g.set_parent(node.id.clone(), (*group_id).to_string());
        }
    }

    for edge in &diagram.edges {
        if !node_ids.contains(edge.from.as_str()) || !node_ids.contains(edge.to.as_str()) {
            tracing::warn!(from = %edge.from, to = %edge.to, "edge references unknown node id, skipped");
            continue;
        }
        g.set_edge_with_label(edge.from.clone(), edge.to.clone(), EdgeLabel::default());
    }

    dugong::layout(&mut g);

    let mut nodes = Vec::with_capacity(diagram.nodes.len());
    let mut node_rects: HashMap<&str, Rect> = HashMap::new();
    for node in &diagram.nodes {
        let label = g.node(&node.id).ok_or_else(|| {
            LayoutError::new(format!("layout service dropped node {:?}", node.id))
        })?;
        let (cx, cy) = (label.x.unwrap_or(0.0), label.y.unwrap_or(0.0));
        let rect = Rect {
            x: cx - label.width / 2.0,
            y: cy - label.height / 2.0,
            width: label.width,
            height: label.height,
        };
        node_rects.insert(node.id.as_str(), rect);
        nodes.push(LayoutNode {
            id: node.id.clone(),
            x: rect.x + PADDING,
            y: rect.y + PADDING,
            width: rect.width,
            height: rect.height,
            label: node.label.clone(),
            shape: node.shape,
            color: node.color.clone(),
            text_color: node.text_color.clone(),
        });
    }

    let mut groups = Vec::with_capacity(diagram.groups.len());
    for group in &diagram.groups {
        let member_rects: Vec<Rect> = group
            .contains
            .iter()
            .filter_map(|id| node_rects.get(id.as_str()).copied())
            .collect();
        if member_rects.is_empty() {
            continue;
        }
        let min_x = member_rects.iter().map(|r| r.x).fold(f64::INFINITY, f64::min);
        let min_y = member_rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
        let max_x = member_rects.iter().map(|r| r.right()).fold(f64::NEG_INFINITY, f64::max);
        let max_y = member_rects.iter().map(|r| r.bottom()).fold(f64::NEG_INFINITY, f64::max);

        groups.push(LayoutGroup {
            id: group.id.clone(),
            label: group.label.clone(),
            x: min_x - GROUP_PADDING + PADDING,
            y: min_y - GROUP_PADDING + PADDING,
            width: (max_x - min_x) + 2.0 * GROUP_PADDING,
            height: (max_y - min_y) + 2.0 * GROUP_PADDING,
            color: group.color.clone(),
        });
    }

    let mut edges = Vec::with_capacity(diagram.edges.len());
    for edge in &diagram.edges {
        if !node_ids.contains(edge.from.as_str()) || !node_ids.contains(edge.to.as_str()) {
            continue;
        }

        let raw_points: Vec<Point> = g
            .edge(&edge.from, &edge.to, None)
            .map(|l| {
                l.points
                    .iter()
                    .map(|p| Point {
                        x: p.x + PADDING,
                        y: p.y + PADDING,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let points = if raw_points.len() >= 2 {
            raw_points
        } else {
            // Fallback: straight line between node centres, per the layout spec's degenerate-route
            // rule.
            let from_rect = node_rects[edge.from.as_str()];
            let to_rect = node_rects[edge.to.as_str()];
            vec![
                Point {
                    x: from_rect.x + from_rect.width / 2.0 + PADDING,
                    y: from_rect.y + from_rect.height / 2.0 + PADDING,
                },
                Point {
                    x: to_rect.x + to_rect.width / 2.0 + PADDING,
                    y: to_rect.y + to_rect.height / 2.0 + PADDING,
                },
            ]
        };

        edges.push(LayoutEdge {
            from: edge.from.clone(),
            to: edge.to.clone(),
            label: edge.label.clone(),
            style: edge.style,
            direction: edge.direction,
            color: edge.color.clone(),
            points,
        });
    }

    let mut content_right = 0.0_f64;
    let mut content_bottom = 0.0_f64;
    for r in node_rects.values() {
        content_right = content_right.max(r.right());
        content_bottom = content_bottom.max(r.bottom());
    }
    for group in &groups {
        content_right = content_right.max(group.x - PADDING + group.width);
        content_bottom = content_bottom.max(group.y - PADDING + group.height);
    }

    let width = content_right + 2.0 * PADDING;
    let height = content_bottom + 2.0 * PADDING;

    Ok(LayoutResult {
        width,
        height,
        nodes,
        edges,
        groups,
        title: diagram.title.clone(),
    })
}
