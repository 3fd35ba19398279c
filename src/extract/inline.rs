use std::collections::VecDeque;

use ahash::AHashMap;

use super::IdAllocator;
use crate::geometry::{Direction, Point, Rect, Size};
use crate::registry::{PorterRegistry, GETTER_GLYPH, SETTER_GLYPH};
use crate::workflow::{
    Group, InputSlot, Link, NodeId, OutputSlot, SlotIndex, Workflow, WorkflowNode,
    short_id_fragment, INPUT_BOUNDARY_ID, OUTPUT_BOUNDARY_ID,
};

/// Hard cap on nesting depth; bounds worst-case work against accidentally or
/// maliciously self-referential definition catalogs.
pub(crate) const MAX_DEPTH: usize = 10;

/// Horizontal space reserved for the inbound porter column at the left edge
/// of an inlined region.
const PROXY_COLUMN_WIDTH: f64 = 200.0;
/// Gap between the porter columns and the inlined content.
const COLUMN_GAP: f64 = 60.0;
/// Gap between successive inlined regions.
const REGION_GAP: f64 = 80.0;
/// Outward padding of the enclosing "Subgraph Area" group.
const GROUP_PADDING: f64 = 30.0;
/// Vertical spacing between stacked porter nodes.
const PROXY_ROW_HEIGHT: f64 = 80.0;
const PROXY_SIZE: Size = Size { w: 180.0, h: 50.0 };

struct Frame {
    /// Instance nodes still awaiting extraction, in list order.
    queue: VecDeque<NodeId>,
    cursor: Point,
    direction: Direction,
    depth: usize,
    /// Running bounding box of everything placed by this frame.
    total: Rect,
    /// Region box of the instance whose expansion this frame descends into;
    /// folded into the parent's total when the frame completes.
    region: Rect,
}

impl Frame {
    fn advance(&mut self) {
        match self.direction {
            Direction::Down => self.cursor.y = self.total.bottom() + REGION_GAP,
            Direction::Right => self.cursor.x = self.total.right() + REGION_GAP,
        }
    }
}

/// Inlines every subgraph instance reachable from `node_ids`.
///
/// Driven by an explicit work stack rather than language recursion so stack
/// depth stays bounded regardless of the depth cap. Sibling instances lay
/// out along `direction`; nested expansions always lay out rightward, just
/// past their parent instance's region.
pub(crate) fn process_nodes(
    workflow: &mut Workflow,
    node_ids: &[NodeId],
    cursor: Point,
    direction: Direction,
    alloc: &mut IdAllocator,
    registry: &PorterRegistry,
) -> Rect {
    let mut stack = vec![Frame {
        queue: collect_instances(workflow, node_ids),
        cursor,
        direction,
        depth: 0,
        total: Rect::zero_at(cursor),
        region: Rect::zero_at(cursor),
    }];

    loop {
        let frame = stack.last_mut().expect("stack never empty inside loop");
        if let Some(instance_id) = frame.queue.pop_front() {
            let (created, region) = extract_instance(workflow, instance_id, frame.cursor, alloc, registry);
            let nested = collect_instances(workflow, &created);
            let child_depth = frame.depth + 1;
            if nested.is_empty() {
                frame.total = frame.total.union(&region);
                frame.advance();
            } else if child_depth >= MAX_DEPTH {
                log::error!(
                    "subgraph nesting exceeded the maximum depth of {}; truncating expansion",
                    MAX_DEPTH
                );
                frame.total = frame.total.union(&region);
                frame.advance();
            } else {
                // Nested expansions sit just right of the parent region.
                let child_cursor = Point::new(region.right() + COLUMN_GAP, region.y);
                stack.push(Frame {
                    queue: nested,
                    cursor: child_cursor,
                    direction: Direction::Right,
                    depth: child_depth,
                    total: Rect::zero_at(child_cursor),
                    region,
                });
            }
        } else {
            let done = stack.pop().expect("frame present");
            match stack.last_mut() {
                Some(parent) => {
                    parent.total = parent.total.union(&done.region).union(&done.total);
                    parent.advance();
                }
                None => return done.total,
            }
        }
    }
}

/// Instance nodes among `node_ids`, in list order. A node is an instance
/// only if its type resolves to a definition currently in the catalog.
fn collect_instances(workflow: &Workflow, node_ids: &[NodeId]) -> VecDeque<NodeId> {
    node_ids
        .iter()
        .copied()
        .filter(|id| {
            workflow
                .node(*id)
                .is_some_and(|n| workflow.subgraph(&n.node_type).is_some())
        })
        .collect()
}

/// Replaces one instance node with its definition's internal graph at
/// `cursor`, preserving external connectivity through porter pairs.
///
/// Returns the newly created node ids (internal clones plus all four porter
/// kinds) and the inlined region's bounding box.
fn extract_instance(
    workflow: &mut Workflow,
    instance_id: NodeId,
    cursor: Point,
    alloc: &mut IdAllocator,
    registry: &PorterRegistry,
) -> (Vec<NodeId>, Rect) {
    let Some(idx) = workflow.nodes.iter().position(|n| n.id == instance_id) else {
        return (Vec::new(), Rect::zero_at(cursor));
    };
    let node_type = workflow.nodes[idx].node_type.clone();
    let Some(def) = workflow.subgraph(&node_type).cloned() else {
        // Recoverable: drop the orphaned instance and carry on.
        log::warn!(
            "node {} references missing subgraph definition '{}'; removing it",
            instance_id,
            node_type
        );
        workflow.nodes.remove(idx);
        return (Vec::new(), Rect::zero_at(cursor));
    };
    let instance = workflow.nodes.remove(idx);

    let title = instance
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| def.name.clone());

    // Placeholder group over the instance's original footprint.
    workflow.groups.push(Group {
        id: alloc.group_id(),
        title: format!("[Unpacked] {}", title),
        bounding: instance.bounds(),
        color: instance.color.clone().or_else(|| instance.bgcolor.clone()),
        font_size: 24,
        flags: serde_json::Map::new(),
        extra: serde_json::Map::new(),
    });

    // Clone the internal nodes, translated so the content's origin lands
    // right of the reserved porter column.
    let content_bounds = def.content_bounds();
    let content_origin = Point::new(cursor.x + PROXY_COLUMN_WIDTH + COLUMN_GAP, cursor.y);
    let dx = content_origin.x - content_bounds.x;
    let dy = content_origin.y - content_bounds.y;

    let mut id_map: AHashMap<NodeId, NodeId> = AHashMap::new();
    let mut created: Vec<NodeId> = Vec::new();
    let mut region_ids: Vec<NodeId> = Vec::new();
    for inner in &def.nodes {
        if inner.id == INPUT_BOUNDARY_ID || inner.id == OUTPUT_BOUNDARY_ID {
            continue;
        }
        let mut clone = inner.clone();
        let new_id = alloc.node_id();
        id_map.insert(inner.id, new_id);
        clone.id = new_id;
        clone.pos.x += dx;
        clone.pos.y += dy;
        // Definition-local link ids would clash with the document's global
        // link-id space; slots are rebuilt from the remapped links below.
        for slot in &mut clone.inputs {
            slot.link = None;
        }
        for slot in &mut clone.outputs {
            slot.links = None;
        }
        workflow.nodes.push(clone);
        created.push(new_id);
        region_ids.push(new_id);
    }

    let short = if def.id.is_empty() {
        short_id_fragment(&node_type)
    } else {
        def.short_id()
    };

    // Declared inputs the instance actually had externally linked become a
    // porter pair: an external setter replacing the instance as the link's
    // target, and an internal getter in the porter column receiving the
    // value by name.
    let mut input_proxy_by_slot: AHashMap<usize, NodeId> = AHashMap::new();
    for (i, boundary) in def.inputs.iter().enumerate() {
        let external_link = instance
            .inputs
            .iter()
            .find(|s| s.name == boundary.name)
            .and_then(|s| s.link)
            .or_else(|| instance.inputs.get(i).and_then(|s| s.link));
        let Some(link_id) = external_link else {
            // Unconnected slot (plain widget): nothing to carry across.
            continue;
        };
        let var = alloc.broadcast_name(&boundary.name, &short);

        let setter_id = alloc.node_id();
        let mut setter = porter_node(
            setter_id,
            registry.setter_type(),
            format!("{} {}", SETTER_GLYPH, var),
            Point::new(instance.pos.x, instance.pos.y + i as f64 * PROXY_ROW_HEIGHT),
        );
        setter.inputs.push(InputSlot {
            name: boundary.name.clone(),
            slot_type: boundary.slot_type.clone(),
            link: Some(link_id),
            extra: serde_json::Map::new(),
        });
        if let Some(link) = workflow.link_mut(link_id) {
            link.target_id = setter_id;
            link.target_slot = 0;
        } else {
            log::warn!(
                "input slot '{}' on removed instance {} references missing link {}",
                boundary.name,
                instance_id,
                link_id
            );
            setter.inputs[0].link = None;
        }
        workflow.nodes.push(setter);
        created.push(setter_id);

        let getter_id = alloc.node_id();
        let mut getter = porter_node(
            getter_id,
            registry.getter_type(),
            format!("{} {}", GETTER_GLYPH, var),
            Point::new(cursor.x, cursor.y + i as f64 * PROXY_ROW_HEIGHT),
        );
        getter.outputs.push(OutputSlot {
            name: boundary.name.clone(),
            slot_type: boundary.slot_type.clone(),
            links: None,
            extra: serde_json::Map::new(),
        });
        workflow.nodes.push(getter);
        created.push(getter_id);
        region_ids.push(getter_id);
        input_proxy_by_slot.insert(i, getter_id);
    }

    // Symmetrically for declared outputs with external consumers: an
    // internal setter past the content's right edge, and an external getter
    // taking over the instance's outgoing links.
    let content_rect = Rect::new(content_origin.x, content_origin.y, content_bounds.w, content_bounds.h);
    let mut output_proxy_by_slot: AHashMap<usize, NodeId> = AHashMap::new();
    for (i, boundary) in def.outputs.iter().enumerate() {
        let consumer_links: Vec<_> = instance
            .outputs
            .iter()
            .find(|s| s.name == boundary.name)
            .and_then(|s| s.links.clone())
            .filter(|links| !links.is_empty())
            .or_else(|| instance.outputs.get(i).and_then(|s| s.links.clone()))
            .unwrap_or_default();
        if consumer_links.is_empty() {
            continue;
        }
        let var = alloc.broadcast_name(&boundary.name, &short);

        let setter_id = alloc.node_id();
        let mut setter = porter_node(
            setter_id,
            registry.setter_type(),
            format!("{} {}", SETTER_GLYPH, var),
            Point::new(
                content_rect.right() + COLUMN_GAP,
                cursor.y + i as f64 * PROXY_ROW_HEIGHT,
            ),
        );
        setter.inputs.push(InputSlot {
            name: boundary.name.clone(),
            slot_type: boundary.slot_type.clone(),
            link: None,
            extra: serde_json::Map::new(),
        });
        workflow.nodes.push(setter);
        created.push(setter_id);
        region_ids.push(setter_id);
        output_proxy_by_slot.insert(i, setter_id);

        let getter_id = alloc.node_id();
        let mut getter = porter_node(
            getter_id,
            registry.getter_type(),
            format!("{} {}", GETTER_GLYPH, var),
            Point::new(
                instance.pos.x + instance.size.w,
                instance.pos.y + i as f64 * PROXY_ROW_HEIGHT,
            ),
        );
        getter.outputs.push(OutputSlot {
            name: boundary.name.clone(),
            slot_type: boundary.slot_type.clone(),
            links: Some(consumer_links.clone()),
            extra: serde_json::Map::new(),
        });
        for link_id in &consumer_links {
            if let Some(link) = workflow.link_mut(*link_id) {
                link.origin_id = getter_id;
                link.origin_slot = 0;
            } else {
                log::warn!(
                    "output slot '{}' on removed instance {} references missing link {}",
                    boundary.name,
                    instance_id,
                    link_id
                );
            }
        }
        workflow.nodes.push(getter);
        created.push(getter_id);
    }

    // Links on slots the definition does not declare (a stale document whose
    // definition was edited after the instance was placed) still point at
    // the removed instance. Drop them and clear the partner slot's entry.
    let stale: Vec<Link> = workflow
        .links
        .iter()
        .filter(|l| l.origin_id == instance_id || l.target_id == instance_id)
        .cloned()
        .collect();
    if !stale.is_empty() {
        workflow
            .links
            .retain(|l| l.origin_id != instance_id && l.target_id != instance_id);
        for link in stale {
            log::warn!(
                "dropping link {} on removed instance {}: no matching declared slot",
                link.id,
                instance_id
            );
            if link.target_id == instance_id {
                if let Some(node) = workflow.node_mut(link.origin_id) {
                    for slot in &mut node.outputs {
                        if let Some(links) = &mut slot.links {
                            links.retain(|id| *id != link.id);
                        }
                    }
                }
            } else if let Some(node) = workflow.node_mut(link.target_id) {
                for slot in &mut node.inputs {
                    if slot.link == Some(link.id) {
                        slot.link = None;
                    }
                }
            }
        }
    }

    // Remap the definition's internal links into the new id space. Boundary
    // sentinels resolve to the porter created for that slot; links whose
    // endpoints are missing (no external connection, so no porter) are
    // dropped.
    for def_link in &def.links {
        let origin = if def_link.origin_id == INPUT_BOUNDARY_ID {
            input_proxy_by_slot.get(&(def_link.origin_slot as usize)).copied()
        } else {
            id_map.get(&def_link.origin_id).copied()
        };
        let target = if def_link.target_id == OUTPUT_BOUNDARY_ID {
            output_proxy_by_slot.get(&(def_link.target_slot as usize)).copied()
        } else {
            id_map.get(&def_link.target_id).copied()
        };
        let (Some(origin_id), Some(target_id)) = (origin, target) else {
            continue;
        };
        // Porters expose a single slot.
        let origin_slot: SlotIndex = if def_link.origin_id == INPUT_BOUNDARY_ID {
            0
        } else {
            def_link.origin_slot
        };
        let target_slot: SlotIndex = if def_link.target_id == OUTPUT_BOUNDARY_ID {
            0
        } else {
            def_link.target_slot
        };

        let new_id = alloc.link_id();
        workflow.links.push(Link {
            id: new_id,
            origin_id,
            origin_slot,
            target_id,
            target_slot,
            link_type: def_link.link_type.clone(),
        });
        if let Some(node) = workflow.node_mut(target_id) {
            if let Some(slot) = node.inputs.get_mut(target_slot as usize) {
                slot.link = Some(new_id);
            }
        }
        if let Some(node) = workflow.node_mut(origin_id) {
            if let Some(slot) = node.outputs.get_mut(origin_slot as usize) {
                slot.links.get_or_insert_with(Vec::new).push(new_id);
            }
        }
    }

    // Enclosing group: internal content plus both porter columns, padded.
    let mut region = Rect::zero_at(cursor);
    for id in &region_ids {
        if let Some(node) = workflow.node(*id) {
            region = region.union(&node.bounds());
        }
    }
    let area = region.expand(GROUP_PADDING);
    workflow.groups.push(Group {
        id: alloc.group_id(),
        title: format!("Subgraph Area: {}", title),
        bounding: area,
        color: None,
        font_size: 24,
        flags: serde_json::Map::new(),
        extra: serde_json::Map::new(),
    });

    (created, area)
}

/// A small, collapsed porter node with no slots; callers attach the single
/// input or output.
fn porter_node(id: NodeId, node_type: &str, title: String, pos: Point) -> WorkflowNode {
    let mut flags = serde_json::Map::new();
    flags.insert("collapsed".to_string(), serde_json::Value::Bool(true));
    WorkflowNode {
        id,
        node_type: node_type.to_string(),
        title: Some(title),
        pos,
        size: PROXY_SIZE,
        inputs: Vec::new(),
        outputs: Vec::new(),
        flags,
        color: None,
        bgcolor: None,
        widgets_values: None,
        extra: serde_json::Map::new(),
    }
}
