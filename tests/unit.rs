//! Unit tests for the document schema, link encodings and supporting types.
mod common;
use serde_json::json;
use tenkai::prelude::*;

#[test]
fn test_link_tuple_encoding_parses() {
    let wf = Workflow::from_json(
        r#"{
            "last_node_id": 2, "last_link_id": 1,
            "nodes": [
                {"id": 1, "type": "LoadImage", "pos": [0, 0], "size": [200, 100]},
                {"id": 2, "type": "SaveImage", "pos": [300, 0], "size": [200, 100]}
            ],
            "links": [[1, 1, 0, 2, 0, "IMAGE"]]
        }"#,
    )
    .expect("tuple-form document should parse");

    assert_eq!(wf.links.len(), 1);
    let link = &wf.links[0];
    assert_eq!(link.id, 1);
    assert_eq!(link.origin_id, 1);
    assert_eq!(link.target_id, 2);
    assert_eq!(link.link_type, json!("IMAGE"));
}

#[test]
fn test_link_object_encoding_parses() {
    let wf = Workflow::from_json(
        r#"{
            "nodes": [],
            "links": [
                {"id": 7, "origin_id": 3, "origin_slot": 1, "target_id": 4, "target_slot": 2, "type": "MODEL"}
            ]
        }"#,
    )
    .expect("object-form document should parse");

    let link = &wf.links[0];
    assert_eq!(link.id, 7);
    assert_eq!(link.origin_slot, 1);
    assert_eq!(link.target_slot, 2);
    assert_eq!(link.link_type, json!("MODEL"));
}

#[test]
fn test_links_serialize_to_tuple_form() {
    let wf = Workflow {
        links: vec![common::link(9, 1, 0, 2, 3)],
        ..Default::default()
    };
    let json = wf.to_json().unwrap();
    assert!(
        json.contains(r#"[9,1,0,2,3,"IMAGE"]"#),
        "expected tuple encoding in output, got: {}",
        json
    );
}

#[test]
fn test_mixed_link_encodings_in_one_document() {
    let wf = Workflow::from_json(
        r#"{
            "links": [
                [1, 1, 0, 2, 0, "IMAGE"],
                {"id": 2, "origin_id": 2, "origin_slot": 0, "target_id": 3, "target_slot": 0, "type": "IMAGE"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(wf.links.len(), 2);
    assert_eq!(wf.links[0].id, 1);
    assert_eq!(wf.links[1].id, 2);
}

#[test]
fn test_unknown_fields_survive_round_trip() {
    let wf = Workflow::from_json(
        r#"{
            "nodes": [{"id": 1, "type": "Note", "mode": 4}],
            "links": [],
            "extra_editor_state": {"zoom": 1.5}
        }"#,
    )
    .unwrap();
    let out = wf.to_json().unwrap();
    assert!(out.contains("extra_editor_state"));
    assert!(out.contains("\"mode\":4"));
}

#[test]
fn test_broadcast_name_strips_glyphs() {
    let registry = PorterRegistry::new();
    assert_eq!(registry.broadcast_name("\u{27a1}\u{fe0f} latent_1"), "latent_1");
    assert_eq!(registry.broadcast_name("\u{2b05}\u{fe0f} latent_1"), "latent_1");
    assert_eq!(registry.broadcast_name("  plain  "), "plain");
    assert_eq!(registry.broadcast_name("\u{27a1} no_selector"), "no_selector");
}

#[test]
fn test_registry_custom_types() {
    let registry = PorterRegistry::new()
        .with_setter_type("easy setNode")
        .with_getter_type("easy getNode");
    assert!(registry.is_setter("SetNode"));
    assert!(registry.is_setter("easy setNode"));
    assert!(registry.is_getter("easy getNode"));
    assert!(!registry.is_getter("Sharpen"));
}

#[test]
fn test_rect_union_and_expand() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, 5.0, 10.0, 10.0);
    let u = a.union(&b);
    assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 15.0));

    // A zero-size rectangle still contributes its anchor point.
    let zero = Rect::zero_at(Point::new(100.0, 100.0));
    assert_eq!(zero.union(&a), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(a.union(&zero), Rect::new(0.0, 0.0, 100.0, 100.0));

    assert_eq!(a.expand(5.0), Rect::new(-5.0, -5.0, 20.0, 20.0));
    assert!(zero.expand(5.0).is_empty());
}

#[test]
fn test_group_bounding_round_trips_as_array() {
    let wf = Workflow::from_json(
        r#"{"nodes": [], "groups": [{"title": "G", "bounding": [1, 2, 3, 4]}]}"#,
    )
    .unwrap();
    assert_eq!(wf.groups[0].bounding, Rect::new(1.0, 2.0, 3.0, 4.0));
    let out = wf.to_json().unwrap();
    assert!(out.contains(r#""bounding":[1.0,2.0,3.0,4.0]"#));
}

#[test]
fn test_catalog_keyed_and_list_forms() {
    let keyed = Workflow::from_json(&format!(
        r#"{{"nodes": [], "subgraphs": {{"{id}": {{"name": "Sharpen Pass"}}}}}}"#,
        id = common::DEF_ID
    ))
    .unwrap();
    assert!(keyed.subgraph(common::DEF_ID).is_some());
    assert!(keyed.subgraph_keys().contains(common::DEF_ID));
    assert!(keyed.subgraph_keys().contains("Sharpen Pass"));

    let list = Workflow::from_json(&format!(
        r#"{{"nodes": [], "subgraphs": [{{"id": "{id}", "name": "Sharpen Pass"}}]}}"#,
        id = common::DEF_ID
    ))
    .unwrap();
    assert!(list.subgraph(common::DEF_ID).is_some());
}

#[test]
fn test_nested_definitions_location() {
    let wf = Workflow::from_json(&format!(
        r#"{{"nodes": [], "definitions": {{"subgraphs": [{{"id": "{id}", "name": "N"}}]}}}}"#,
        id = common::DEF_ID
    ))
    .unwrap();
    assert!(wf.subgraph(common::DEF_ID).is_some());
    assert!(wf.subgraph("someone-else").is_none());
}

#[test]
fn test_graph_index_build() {
    let wf = common::linear_workflow();
    let index = GraphIndex::build(&wf);
    assert_eq!(index.node_count(), 3);
    assert_eq!(index.link_count(), 2);
    assert_eq!(index.node(2).unwrap().node_type, "Sharpen");
    assert_eq!(index.link(1).unwrap().target_id, 2);
    assert!(index.node(99).is_none());
}

#[test]
fn test_parse_error_on_malformed_json() {
    let err = Workflow::from_json("{not json").unwrap_err();
    assert!(matches!(err, WorkflowParseError::JsonParseError(_)));
}
