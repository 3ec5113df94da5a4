use flowsketch_core::{Direction, EdgeDef, FlowDiagram, GroupDef, NodeDef, Shape, Theme};
use flowsketch_layout::layout_flow;

fn node(id: &str, label: &str) -> NodeDef {
    NodeDef {
        id: id.to_string(),
        label: label.to_string(),
        shape: Shape::Rectangle,
        color: None,
        text_color: None,
        width: None,
        height: None,
    }
}

#[test]
fn left_to_right_orders_by_x() {
    let diagram = FlowDiagram {
        title: None,
        nodes: vec![node("a", "A"), node("b", "B"), node("c", "C")],
        edges: vec![
            EdgeDef {
                from: "a".into(),
                to: "b".into(),
                label: None,
                style: Default::default(),
                direction: Default::default(),
                color: None,
            },
            EdgeDef {
                from: "b".into(),
                to: "c".into(),
                label: None,
                style: Default::default(),
                direction: Default::default(),
                color: None,
            },
        ],
        groups: vec![],
        style: Theme::Clean,
        direction: Direction::LR,
    };

    let result = layout_flow(&diagram).unwrap();
    let x = |id: &str| result.nodes.iter().find(|n| n.id == id).unwrap().x;
    assert!(x("a") < x("b"));
    assert!(x("b") < x("c"));
}

#[test]
fn bounds_cover_every_positioned_element() {
    let diagram = FlowDiagram {
        title: Some("Test".into()),
        nodes: vec![node("a", "Start"), node("b", "End")],
        edges: vec![EdgeDef {
            from: "a".into(),
            to: "b".into(),
            label: Some("go".into()),
            style: Default::default(),
            direction: Default::default(),
            color: None,
        }],
        groups: vec![GroupDef {
            id: "g1".into(),
            label: Some("Group".into()),
            contains: vec!["a".into(), "b".into()],
            color: None,
        }],
        style: Theme::HandDrawn,
        direction: Direction::TB,
    };

    let result = layout_flow(&diagram).unwrap();
    for n in &result.nodes {
        assert!(result.width >= n.x + n.width);
        assert!(result.height >= n.y + n.height);
    }
    for g in &result.groups {
        assert!(result.width >= g.x + g.width);
        assert!(result.height >= g.y + g.height);
    }
    for e in &result.edges {
        for p in &e.points {
            assert!(result.width >= p.x);
            assert!(result.height >= p.y);
        }
    }
}
