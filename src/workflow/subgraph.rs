use ahash::AHashMap;
use itertools::Either;
use serde::{Deserialize, Serialize};

use super::{Link, NodeId, WorkflowNode};
use crate::geometry::Rect;

/// Sentinel node id used inside a definition's links for "the enclosing
/// instance's external input side".
pub const INPUT_BOUNDARY_ID: NodeId = -10;
/// Sentinel node id for "the enclosing instance's external output side".
pub const OUTPUT_BOUNDARY_ID: NodeId = -20;

/// A reusable named graph fragment, referenced by instance nodes whose
/// `type` equals the definition's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphDefinition {
    /// UUID-shaped identifier. Optional on the wire when the catalog is a
    /// keyed map (the key carries the id).
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub inputs: Vec<BoundarySlot>,
    #[serde(default)]
    pub outputs: Vec<BoundarySlot>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubgraphDefinition {
    /// Bounding box of the internal nodes, ignoring sentinel boundary ids.
    pub fn content_bounds(&self) -> Rect {
        let mut bounds: Option<Rect> = None;
        for node in &self.nodes {
            if node.id == INPUT_BOUNDARY_ID || node.id == OUTPUT_BOUNDARY_ID {
                continue;
            }
            let b = node.bounds();
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
        bounds.unwrap_or_default()
    }

    /// A short fragment of the definition id, used when generating broadcast
    /// variable names for boundary proxies.
    pub fn short_id(&self) -> String {
        short_id_fragment(&self.id)
    }
}

/// First six alphanumeric characters of a definition id. Keyed catalogs may
/// omit the embedded id field, in which case callers pass the catalog key.
pub fn short_id_fragment(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(6)
        .collect()
}

/// A declared boundary slot on a subgraph definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundarySlot {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub slot_type: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The definition catalog; producers write it either as an id-keyed map or
/// as a plain array of definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubgraphCatalog {
    Keyed(AHashMap<String, SubgraphDefinition>),
    List(Vec<SubgraphDefinition>),
}

impl SubgraphCatalog {
    pub fn get(&self, id: &str) -> Option<&SubgraphDefinition> {
        match self {
            SubgraphCatalog::Keyed(map) => map.get(id),
            SubgraphCatalog::List(defs) => defs.iter().find(|d| d.id == id),
        }
    }

    /// Iterates `(id, definition)` pairs. For the keyed form the map key is
    /// authoritative even if the embedded id field is empty.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubgraphDefinition)> {
        match self {
            SubgraphCatalog::Keyed(map) => {
                Either::Left(map.iter().map(|(k, d)| (k.as_str(), d)))
            }
            SubgraphCatalog::List(defs) => {
                Either::Right(defs.iter().map(|d| (d.id.as_str(), d)))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SubgraphCatalog::Keyed(map) => map.len(),
            SubgraphCatalog::List(defs) => defs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
