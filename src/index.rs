use ahash::AHashMap;

use crate::workflow::{Link, LinkId, NodeId, Workflow, WorkflowNode};

/// Id-keyed lookup maps over a workflow document.
///
/// Pure and O(nodes + links) to build. A malformed or empty document simply
/// produces empty maps; there are no error conditions here. Later duplicates
/// of an id win, matching the editor's own load behavior.
pub struct GraphIndex<'a> {
    nodes: AHashMap<NodeId, &'a WorkflowNode>,
    links: AHashMap<LinkId, &'a Link>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(workflow: &'a Workflow) -> Self {
        let mut nodes = AHashMap::with_capacity(workflow.nodes.len());
        for node in &workflow.nodes {
            nodes.insert(node.id, node);
        }
        let mut links = AHashMap::with_capacity(workflow.links.len());
        for link in &workflow.links {
            links.insert(link.id, link);
        }
        Self { nodes, links }
    }

    pub fn node(&self, id: NodeId) -> Option<&'a WorkflowNode> {
        self.nodes.get(&id).copied()
    }

    pub fn link(&self, id: LinkId) -> Option<&'a Link> {
        self.links.get(&id).copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
