//! Subgraph flattening.
//!
//! Recursively inlines subgraph-instance nodes into the enclosing document:
//! each instance is replaced by a fresh copy of its definition's internal
//! graph, external connectivity is preserved through synthesized porter
//! pairs (wired by broadcast name, not literal link), and the inlined
//! regions are laid out below and to the right of the existing content so
//! nothing overlaps.
//!
//! Failure semantics are deliberately soft: a missing definition drops the
//! orphaned instance with a warning, and the recursion depth guard truncates
//! runaway (self-referential) expansion with an error log. The result is
//! always a structurally valid document; nothing here aborts.

use ahash::AHashSet;

use crate::geometry::{Direction, Point};
use crate::registry::PorterRegistry;
use crate::workflow::{LinkId, NodeId, Workflow};

mod inline;

/// Vertical clearance between the existing content and the first inlined
/// region.
const LAYOUT_CLEARANCE: f64 = 80.0;

/// True if any node's `type` refers to an entry in the document's subgraph
/// catalog (either location). A merely UUID-shaped type with no catalog
/// entry does not count.
pub fn has_subgraphs(workflow: &Workflow) -> bool {
    let keys = workflow.subgraph_keys();
    if keys.is_empty() {
        return false;
    }
    workflow.nodes.iter().any(|n| keys.contains(&n.node_type))
}

/// Shared counters threaded through one extraction run.
///
/// Owned exclusively by a single [`SubgraphExtractor::extract_all`] call for
/// its whole duration; it must never be aliased across concurrent runs,
/// since interleaved increments would hand out colliding ids.
pub(crate) struct IdAllocator {
    next_node_id: NodeId,
    next_link_id: LinkId,
    next_group_id: i64,
    used_names: AHashSet<String>,
}

impl IdAllocator {
    fn seeded_from(workflow: &Workflow) -> Self {
        let max_group = workflow.groups.iter().map(|g| g.id).max().unwrap_or(0);
        Self {
            next_node_id: workflow.last_node_id + 1,
            next_link_id: workflow.last_link_id + 1,
            next_group_id: max_group + 1,
            used_names: AHashSet::new(),
        }
    }

    pub(crate) fn node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    pub(crate) fn link_id(&mut self) -> LinkId {
        let id = self.next_link_id;
        self.next_link_id += 1;
        id
    }

    pub(crate) fn group_id(&mut self) -> i64 {
        let id = self.next_group_id;
        self.next_group_id += 1;
        id
    }

    /// Generates a broadcast variable name from a slot name and a short
    /// definition-id fragment, suffixing a counter if the combination has
    /// already been handed out in this run.
    pub(crate) fn broadcast_name(&mut self, slot_name: &str, short_id: &str) -> String {
        let base = format!("{}_{}", slot_name, short_id);
        if self.used_names.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.used_names.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Flattens every subgraph instance in a document.
pub struct SubgraphExtractor {
    registry: PorterRegistry,
}

impl SubgraphExtractor {
    pub fn new() -> Self {
        Self {
            registry: PorterRegistry::default(),
        }
    }

    pub fn with_registry(registry: PorterRegistry) -> Self {
        Self { registry }
    }

    /// Returns a new document with every instance inlined and the subgraph
    /// catalog removed. The input is never mutated.
    ///
    /// Running the result through `extract_all` again is a no-op beyond
    /// removing the already-absent catalog.
    pub fn extract_all(&self, workflow: &Workflow) -> Workflow {
        let mut out = workflow.clone();

        // Layout cursor: below the lowest existing node, left-aligned to the
        // leftmost one.
        let cursor = initial_cursor(&out);
        let mut alloc = IdAllocator::seeded_from(&out);

        let top_level: Vec<NodeId> = out.nodes.iter().map(|n| n.id).collect();
        inline::process_nodes(
            &mut out,
            &top_level,
            cursor,
            Direction::Down,
            &mut alloc,
            &self.registry,
        );

        // No instance can reference the catalog any more.
        out.remove_subgraph_catalog();
        out.last_node_id = alloc.next_node_id - 1;
        out.last_link_id = alloc.next_link_id - 1;
        out
    }
}

impl Default for SubgraphExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_cursor(workflow: &Workflow) -> Point {
    if workflow.nodes.is_empty() {
        return Point::default();
    }
    let x = workflow
        .nodes
        .iter()
        .map(|n| n.pos.x)
        .fold(f64::INFINITY, f64::min);
    let bottom = workflow
        .nodes
        .iter()
        .map(|n| n.pos.y + n.size.h)
        .fold(f64::NEG_INFINITY, f64::max);
    Point::new(x, bottom + LAYOUT_CLEARANCE)
}
