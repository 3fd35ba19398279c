//! Common test utilities for building workflow documents.
use serde_json::json;
use tenkai::prelude::*;

/// Captures log output inside the test harness; safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Definition id used by the subgraph fixtures.
#[allow(dead_code)]
pub const DEF_ID: &str = "d1f4c0de-5a1e-4b2c-9f00-123456789abc";

#[allow(dead_code)]
pub fn node(id: NodeId, node_type: &str, x: f64, y: f64) -> WorkflowNode {
    WorkflowNode {
        id,
        node_type: node_type.to_string(),
        title: None,
        pos: Point::new(x, y),
        size: Size::new(200.0, 100.0),
        inputs: Vec::new(),
        outputs: Vec::new(),
        flags: serde_json::Map::new(),
        color: None,
        bgcolor: None,
        widgets_values: None,
        extra: serde_json::Map::new(),
    }
}

#[allow(dead_code)]
pub fn titled_node(id: NodeId, node_type: &str, title: &str, x: f64, y: f64) -> WorkflowNode {
    let mut n = node(id, node_type, x, y);
    n.title = Some(title.to_string());
    n
}

#[allow(dead_code)]
pub fn link(id: LinkId, origin: NodeId, origin_slot: u32, target: NodeId, target_slot: u32) -> Link {
    Link {
        id,
        origin_id: origin,
        origin_slot,
        target_id: target,
        target_slot,
        link_type: json!("IMAGE"),
    }
}

#[allow(dead_code)]
pub fn input(name: &str, link: Option<LinkId>) -> InputSlot {
    InputSlot {
        name: name.to_string(),
        slot_type: json!("IMAGE"),
        link,
        extra: serde_json::Map::new(),
    }
}

#[allow(dead_code)]
pub fn output(name: &str, links: Option<Vec<LinkId>>) -> OutputSlot {
    OutputSlot {
        name: name.to_string(),
        slot_type: json!("IMAGE"),
        links,
        extra: serde_json::Map::new(),
    }
}

/// Linear chain A(1) -> B(2) -> C(3) over two literal links.
#[allow(dead_code)]
pub fn linear_workflow() -> Workflow {
    Workflow {
        last_node_id: 3,
        last_link_id: 2,
        nodes: vec![
            node(1, "LoadImage", 0.0, 0.0),
            node(2, "Sharpen", 300.0, 0.0),
            node(3, "SaveImage", 600.0, 0.0),
        ],
        links: vec![link(1, 1, 0, 2, 0), link(2, 2, 0, 3, 0)],
        ..Default::default()
    }
}

/// A linkless setter/getter pair sharing the broadcast name "X".
#[allow(dead_code)]
pub fn porter_workflow() -> Workflow {
    Workflow {
        last_node_id: 2,
        last_link_id: 0,
        nodes: vec![
            titled_node(1, "SetNode", "\u{27a1}\u{fe0f} X", 0.0, 0.0),
            titled_node(2, "GetNode", "\u{2b05}\u{fe0f} X", 400.0, 0.0),
        ],
        ..Default::default()
    }
}

/// Builds the subgraph definition used by [`instance_workflow`]: one declared
/// input, one declared output, and a single internal node wired to both
/// boundary sentinels.
#[allow(dead_code)]
pub fn sharpen_definition() -> SubgraphDefinition {
    let mut inner = node(1, "Sharpen", 100.0, 100.0);
    inner.inputs.push(input("image", None));
    inner.outputs.push(output("image", None));
    SubgraphDefinition {
        id: DEF_ID.to_string(),
        name: "Sharpen Pass".to_string(),
        nodes: vec![inner],
        links: vec![
            link(1, INPUT_BOUNDARY_ID, 0, 1, 0),
            link(2, 1, 0, OUTPUT_BOUNDARY_ID, 0),
        ],
        inputs: vec![boundary_slot("image")],
        outputs: vec![boundary_slot("image")],
        extra: serde_json::Map::new(),
    }
}

#[allow(dead_code)]
pub fn boundary_slot(name: &str) -> tenkai::workflow::BoundarySlot {
    tenkai::workflow::BoundarySlot {
        name: name.to_string(),
        slot_type: json!("IMAGE"),
        extra: serde_json::Map::new(),
    }
}

/// A document with one instance of [`sharpen_definition`]: an upstream
/// source feeding the instance's input and two downstream consumers on its
/// output.
#[allow(dead_code)]
pub fn instance_workflow() -> Workflow {
    let mut source = node(8, "LoadImage", 0.0, 0.0);
    source.outputs.push(output("IMAGE", Some(vec![100])));

    let mut instance = titled_node(10, DEF_ID, "Sharpen Pass", 300.0, 0.0);
    instance.inputs.push(input("image", Some(100)));
    instance.outputs.push(output("image", Some(vec![101, 102])));

    let mut consumer_a = node(11, "PreviewImage", 700.0, 0.0);
    consumer_a.inputs.push(input("images", Some(101)));
    let mut consumer_b = node(12, "SaveImage", 700.0, 200.0);
    consumer_b.inputs.push(input("images", Some(102)));

    Workflow {
        last_node_id: 12,
        last_link_id: 102,
        nodes: vec![source, instance, consumer_a, consumer_b],
        links: vec![
            link(100, 8, 0, 10, 0),
            link(101, 10, 0, 11, 0),
            link(102, 10, 0, 12, 0),
        ],
        subgraphs: Some(SubgraphCatalog::List(vec![sharpen_definition()])),
        ..Default::default()
    }
}

/// A definition containing an instance of itself; extraction must hit the
/// depth guard and still produce a valid document.
#[allow(dead_code)]
pub fn self_referential_workflow() -> Workflow {
    let def = SubgraphDefinition {
        id: DEF_ID.to_string(),
        name: "Ouroboros".to_string(),
        nodes: vec![node(1, DEF_ID, 0.0, 0.0)],
        links: Vec::new(),
        inputs: Vec::new(),
        outputs: Vec::new(),
        extra: serde_json::Map::new(),
    };
    Workflow {
        last_node_id: 5,
        last_link_id: 0,
        nodes: vec![node(5, DEF_ID, 0.0, 0.0)],
        subgraphs: Some(SubgraphCatalog::List(vec![def])),
        ..Default::default()
    }
}
