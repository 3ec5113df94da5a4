//! The diagram data model: a tagged union of flow and sequence diagrams, plus the layout
//! intermediates produced by `flowsketch-layout` and consumed by `flowsketch-render`.

use serde::{Deserialize, Serialize};

/// A validated, defaulted diagram ready for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Diagram {
    Flow(FlowDiagram),
    Sequence(SequenceDiagram),
}

impl Diagram {
    pub fn style(&self) -> Theme {
        match self {
            Diagram::Flow(f) => f.style,
            Diagram::Sequence(s) => s.style,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Diagram::Flow(f) => f.title.as_deref(),
            Diagram::Sequence(s) => s.title.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDiagram {
    pub title: Option<String>,
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    pub style: Theme,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: String,
    pub label: String,
    pub shape: Shape,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub direction: EdgeDirection,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub id: String,
    pub label: Option<String>,
    #[serde(default)]
    pub contains: Vec<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDiagram {
    pub title: Option<String>,
    pub participants: Vec<ParticipantDef>,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    pub style: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDef {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDef {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    HandDrawn,
    Clean,
    Minimal,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::HandDrawn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    TB,
    LR,
    BT,
    RL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Ellipse,
    Diamond,
    Cylinder,
    Cloud,
    Hexagon,
    Parallelogram,
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rectangle
    }
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Rectangle,
        Shape::Ellipse,
        Shape::Diamond,
        Shape::Cylinder,
        Shape::Cloud,
        Shape::Hexagon,
        Shape::Parallelogram,
    ];

    pub fn from_str(s: &str) -> Option<Shape> {
        Some(match s {
            "rectangle" => Shape::Rectangle,
            "ellipse" => Shape::Ellipse,
            "diamond" => Shape::Diamond,
            "cylinder" => Shape::Cylinder,
            "cloud" => Shape::Cloud,
            "hexagon" => Shape::Hexagon,
            "parallelogram" => Shape::Parallelogram,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Solid,
    Dashed,
    Dotted,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        EdgeStyle::Solid
    }
}

impl EdgeStyle {
    pub fn from_str(s: &str) -> Option<EdgeStyle> {
        Some(match s {
            "solid" => EdgeStyle::Solid,
            "dashed" => EdgeStyle::Dashed,
            "dotted" => EdgeStyle::Dotted,
            _ => return None,
        })
    }

    /// SVG `stroke-dasharray` value for this style, or `None` for a solid line.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            EdgeStyle::Solid => None,
            EdgeStyle::Dashed => Some("8,4"),
            EdgeStyle::Dotted => Some("3,3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    Forward,
    Backward,
    Both,
    None,
}

impl Default for EdgeDirection {
    fn default() -> Self {
        EdgeDirection::Forward
    }
}

impl EdgeDirection {
    pub fn from_str(s: &str) -> Option<EdgeDirection> {
        Some(match s {
            "forward" => EdgeDirection::Forward,
            "backward" => EdgeDirection::Backward,
            "both" => EdgeDirection::Both,
            "none" => EdgeDirection::None,
            _ => return None,
        })
    }
}

// -- layout intermediates --------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub shape: Shape,
    pub color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub direction: EdgeDirection,
    pub color: Option<String>,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGroup {
    pub id: String,
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub groups: Vec<LayoutGroup>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParticipant {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub width: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMessage {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub color: Option<String>,
    pub y: f64,
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceLayoutResult {
    pub width: f64,
    pub height: f64,
    pub top_y: f64,
    pub bottom_y: f64,
    pub participants: Vec<LayoutParticipant>,
    pub messages: Vec<LayoutMessage>,
    pub title: Option<String>,
}
