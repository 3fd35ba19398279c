//! Dependency analysis and chain partitioning.
//!
//! The analyzer computes parent/child adjacency for a workflow (literal
//! links plus *virtual* edges inferred from matched setter/getter broadcast
//! names) and assigns every node a topological level. The chain partitioner
//! consumes that result and greedily merges nodes into maximal linear
//! "chains" a rendering collaborator can group or collapse together.
//!
//! Neither stage depends on the subgraph extractor; both operate on the same
//! document schema and run on already-flat graphs unchanged.

use itertools::Itertools;
use serde::Serialize;

use crate::registry::PorterRegistry;
use crate::workflow::{NodeId, Workflow};

mod chains;
mod levels;

pub use levels::{DependencyAnalysis, NodeDependencies, UNLEVELED};

/// One node's entry in a chain group summary.
#[derive(Debug, Clone, Serialize)]
pub struct ChainNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub level: i32,
}

/// A surviving chain, reported as a display group.
#[derive(Debug, Clone, Serialize)]
pub struct ChainGroup {
    /// Synthetic id assigned after sorting, starting at 1.
    pub id: u32,
    /// Minimum level among member nodes.
    pub start_level: i32,
    /// Maximum level among member nodes.
    pub max_level: i32,
    pub node_count: usize,
    pub nodes: Vec<ChainNode>,
}

/// The grouping report handed to the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub chains: Vec<ChainGroup>,
    /// Nodes that kept level −1 because of a cycle.
    pub unleveled: Vec<NodeId>,
}

/// Facade over the level assignment and chain partitioning stages.
pub struct DependencyAnalyzer {
    registry: PorterRegistry,
}

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self {
            registry: PorterRegistry::default(),
        }
    }

    pub fn with_registry(registry: PorterRegistry) -> Self {
        Self { registry }
    }

    /// Computes adjacency and levels without partitioning.
    pub fn analyze(&self, workflow: &Workflow) -> DependencyAnalysis {
        levels::build(workflow, &self.registry)
    }

    /// Runs the full pipeline: leveling, chain partitioning and report
    /// assembly, sorted ascending by (max level, start level, node count).
    pub fn chain_report(&self, workflow: &Workflow) -> ChainReport {
        let analysis = self.analyze(workflow);
        let partition = chains::partition(workflow, &analysis, &self.registry);

        let mut groups: Vec<ChainGroup> = partition
            .into_iter()
            .map(|members| {
                let mut start_level = i32::MAX;
                let mut max_level = i32::MIN;
                let nodes: Vec<ChainNode> = members
                    .iter()
                    .filter_map(|id| {
                        let node = workflow.node(*id)?;
                        let level = analysis.get(*id).map_or(UNLEVELED, |d| d.level);
                        start_level = start_level.min(level);
                        max_level = max_level.max(level);
                        Some(ChainNode {
                            id: *id,
                            node_type: node.node_type.clone(),
                            title: node.display_title().to_string(),
                            level,
                        })
                    })
                    .collect();
                ChainGroup {
                    id: 0,
                    start_level: if nodes.is_empty() { 0 } else { start_level },
                    max_level: if nodes.is_empty() { 0 } else { max_level },
                    node_count: nodes.len(),
                    nodes,
                }
            })
            .sorted_by_key(|g| (g.max_level, g.start_level, g.node_count))
            .collect();

        for (i, group) in groups.iter_mut().enumerate() {
            group.id = i as u32 + 1;
        }

        ChainReport {
            chains: groups,
            unleveled: analysis.unleveled.clone(),
        }
    }
}

impl Default for DependencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
