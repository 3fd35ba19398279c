//! The workflow document schema.
//!
//! A workflow is the JSON document a visual node editor loads and saves:
//! nodes with ordered input/output slots, typed links between slots, visual
//! groups, and an optional catalog of reusable subgraph definitions. The
//! engine interprets only the fields it needs; everything else (widget
//! payloads, editor settings, unknown keys) is carried through untouched so
//! a load → transform → save pipeline is lossless.

use serde::{Deserialize, Serialize};

use crate::error::WorkflowParseError;
use crate::geometry::{Point, Rect, Size};

mod link;
mod subgraph;

pub use link::Link;
pub use subgraph::{
    short_id_fragment, BoundarySlot, SubgraphCatalog, SubgraphDefinition, INPUT_BOUNDARY_ID,
    OUTPUT_BOUNDARY_ID,
};

/// Node identifier, unique within a document. Negative values are reserved
/// for the boundary sentinels inside subgraph definitions.
pub type NodeId = i64;
/// Link identifier, unique within a document.
pub type LinkId = i64;
/// Position of a slot within a node's input or output list.
pub type SlotIndex = u32;

/// An operation instance in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: NodeId,
    /// A literal operation name, or a subgraph definition id for instance
    /// nodes.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub pos: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputSlot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputSlot>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub flags: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets_values: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowNode {
    /// The node's visual footprint.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.w, self.size.h)
    }

    /// Title if set and non-empty, otherwise the type name.
    pub fn display_title(&self) -> &str {
        match &self.title {
            Some(t) if !t.is_empty() => t,
            _ => &self.node_type,
        }
    }
}

/// An ordered input slot; holds at most one inbound link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSlot {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub slot_type: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An ordered output slot; fans out to any number of links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSlot {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub slot_type: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkId>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A purely visual bounding annotation; never load-bearing for the graph
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bounding: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub flags: serde_json::Map<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_font_size() -> u32 {
    24
}

/// Nested definition container; some producers park the subgraph catalog
/// under a root-level `definitions` object instead of at the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgraphs: Option<SubgraphCatalog>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The complete workflow document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub last_node_id: NodeId,
    #[serde(default)]
    pub last_link_id: LinkId,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgraphs: Option<SubgraphCatalog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<DefinitionStore>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Workflow {
    pub fn from_json(json: &str) -> Result<Self, WorkflowParseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WorkflowParseError> {
        serde_json::to_string(self).map_err(WorkflowParseError::JsonSerializeError)
    }

    pub fn to_json_pretty(&self) -> Result<String, WorkflowParseError> {
        serde_json::to_string_pretty(self).map_err(WorkflowParseError::JsonSerializeError)
    }

    pub fn node(&self, id: NodeId) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }

    /// Resolves a subgraph definition by id, checking the root catalog first
    /// and the nested `definitions` location second.
    pub fn subgraph(&self, id: &str) -> Option<&SubgraphDefinition> {
        if let Some(def) = self.subgraphs.as_ref().and_then(|c| c.get(id)) {
            return Some(def);
        }
        self.definitions
            .as_ref()
            .and_then(|d| d.subgraphs.as_ref())
            .and_then(|c| c.get(id))
    }

    /// Every id and name mentioned by either catalog location.
    pub fn subgraph_keys(&self) -> ahash::AHashSet<String> {
        let mut keys = ahash::AHashSet::new();
        let catalogs = self
            .subgraphs
            .iter()
            .chain(self.definitions.iter().filter_map(|d| d.subgraphs.as_ref()));
        for catalog in catalogs {
            for (id, def) in catalog.iter() {
                if !id.is_empty() {
                    keys.insert(id.to_string());
                }
                if !def.id.is_empty() {
                    keys.insert(def.id.clone());
                }
                if !def.name.is_empty() {
                    keys.insert(def.name.clone());
                }
            }
        }
        keys
    }

    /// Drops the subgraph catalog from both locations. The nested container
    /// is kept only if it carries unrelated collaborator data.
    pub fn remove_subgraph_catalog(&mut self) {
        self.subgraphs = None;
        if let Some(store) = &mut self.definitions {
            store.subgraphs = None;
            if store.extra.is_empty() {
                self.definitions = None;
            }
        }
    }
}
