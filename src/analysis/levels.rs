use std::collections::VecDeque;

use ahash::AHashMap;

use crate::index::GraphIndex;
use crate::registry::PorterRegistry;
use crate::workflow::{NodeId, Workflow};

/// Level value of a node that never received one (cycle members).
pub const UNLEVELED: i32 = -1;

/// Per-node dependency state produced by the analyzer.
#[derive(Debug, Clone)]
pub struct NodeDependencies {
    /// Topological depth: 0 for sources, else one more than the maximum
    /// level among parents. Stays at [`UNLEVELED`] for cycle members.
    pub level: i32,
    /// Parent node ids, literal and virtual, deduplicated in scan order.
    pub parents: Vec<NodeId>,
    /// Child node ids, deduplicated in scan order.
    pub children: Vec<NodeId>,
    /// Parents connected *only* through a matched setter/getter name, with
    /// no literal link. Always a subset of `parents`.
    pub virtual_parents: Vec<NodeId>,
    pub is_root: bool,
    pub is_sink: bool,
}

impl NodeDependencies {
    fn new() -> Self {
        Self {
            level: UNLEVELED,
            parents: Vec::new(),
            children: Vec::new(),
            virtual_parents: Vec::new(),
            is_root: false,
            is_sink: false,
        }
    }

    /// Whether `id` is a parent reachable only through a virtual edge.
    pub fn is_virtual_only_parent(&self, id: NodeId) -> bool {
        self.virtual_parents.contains(&id)
    }
}

/// The analyzer's output: adjacency, levels and the unleveled remainder.
#[derive(Debug, Clone)]
pub struct DependencyAnalysis {
    nodes: AHashMap<NodeId, NodeDependencies>,
    order: Vec<NodeId>,
    /// Nodes left at level −1 because a cycle kept them out of the
    /// topological order. Surfaced rather than erred; callers decide.
    pub unleveled: Vec<NodeId>,
}

impl DependencyAnalysis {
    pub fn get(&self, id: NodeId) -> Option<&NodeDependencies> {
        self.nodes.get(&id)
    }

    /// Iterates nodes in document scan order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeDependencies)> {
        self.order.iter().filter_map(|id| self.nodes.get(id).map(|d| (*id, d)))
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn add_edge(nodes: &mut AHashMap<NodeId, NodeDependencies>, parent: NodeId, child: NodeId) -> bool {
    let deps = nodes.get_mut(&child).expect("child present");
    if deps.parents.contains(&parent) {
        return false;
    }
    deps.parents.push(parent);
    let parent_deps = nodes.get_mut(&parent).expect("parent present");
    if !parent_deps.children.contains(&child) {
        parent_deps.children.push(child);
    }
    true
}

/// Builds adjacency (literal links plus name-matched virtual edges) and
/// assigns levels with Kahn's algorithm.
pub(crate) fn build(workflow: &Workflow, registry: &PorterRegistry) -> DependencyAnalysis {
    let index = GraphIndex::build(workflow);
    // Duplicate node ids collapse to one entry; keeping them in `order`
    // would double-enqueue during leveling.
    let mut order: Vec<NodeId> = Vec::with_capacity(workflow.nodes.len());
    let mut nodes: AHashMap<NodeId, NodeDependencies> =
        AHashMap::with_capacity(workflow.nodes.len());
    for node in &workflow.nodes {
        if nodes.insert(node.id, NodeDependencies::new()).is_none() {
            order.push(node.id);
        }
    }

    // Literal edges. Links with a dangling endpoint contribute nothing.
    for link in &workflow.links {
        if !index.contains_node(link.origin_id) || !index.contains_node(link.target_id) {
            continue;
        }
        if link.origin_id == link.target_id {
            continue;
        }
        add_edge(&mut nodes, link.origin_id, link.target_id);
    }

    // Virtual edges: every getter whose broadcast name matches a setter's
    // gains that setter as a parent. Duplicate setter names resolve
    // last-write-wins in scan order.
    let mut setters: AHashMap<String, NodeId> = AHashMap::new();
    for node in &workflow.nodes {
        if registry.is_setter(&node.node_type) {
            let name = registry.broadcast_name(node.display_title());
            if !name.is_empty() {
                setters.insert(name, node.id);
            }
        }
    }
    for node in &workflow.nodes {
        if !registry.is_getter(&node.node_type) {
            continue;
        }
        let name = registry.broadcast_name(node.display_title());
        let Some(&setter_id) = setters.get(&name) else {
            continue;
        };
        if setter_id == node.id {
            continue;
        }
        // Only a genuinely linkless pairing counts as virtual.
        if add_edge(&mut nodes, setter_id, node.id) {
            nodes
                .get_mut(&node.id)
                .expect("getter present")
                .virtual_parents
                .push(setter_id);
        }
    }

    for deps in nodes.values_mut() {
        deps.is_root = deps.parents.is_empty();
        deps.is_sink = deps.children.is_empty();
    }

    // Kahn leveling. Cycle members never reach in-degree zero and keep
    // level −1.
    let mut in_degree: AHashMap<NodeId, usize> =
        nodes.iter().map(|(id, d)| (*id, d.parents.len())).collect();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for id in &order {
        if in_degree[id] == 0 {
            nodes.get_mut(id).expect("node present").level = 0;
            queue.push_back(*id);
        }
    }
    while let Some(id) = queue.pop_front() {
        // Clone the child list to release the borrow before mutating.
        let children = nodes[&id].children.clone();
        for child in children {
            let remaining = in_degree.get_mut(&child).expect("child present");
            *remaining -= 1;
            if *remaining == 0 {
                let level = nodes[&child]
                    .parents
                    .iter()
                    .map(|p| nodes[p].level)
                    .max()
                    .unwrap_or(UNLEVELED);
                nodes.get_mut(&child).expect("child present").level = level + 1;
                queue.push_back(child);
            }
        }
    }

    let unleveled: Vec<NodeId> = order
        .iter()
        .copied()
        .filter(|id| nodes[id].level == UNLEVELED)
        .collect();
    if !unleveled.is_empty() {
        log::warn!(
            "{} node(s) left unleveled by a dependency cycle: {:?}",
            unleveled.len(),
            unleveled
        );
    }

    DependencyAnalysis {
        nodes,
        order,
        unleveled,
    }
}
