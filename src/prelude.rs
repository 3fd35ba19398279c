//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the tenkai crate so callers
//! can bring the whole surface in with one `use`.

// Analysis
pub use crate::analysis::{
    ChainGroup, ChainNode, ChainReport, DependencyAnalysis, DependencyAnalyzer, NodeDependencies,
    UNLEVELED,
};

// Extraction
pub use crate::extract::{has_subgraphs, SubgraphExtractor};

// Document schema
pub use crate::workflow::{
    Group, InputSlot, Link, LinkId, NodeId, OutputSlot, SubgraphCatalog, SubgraphDefinition,
    Workflow, WorkflowNode, INPUT_BOUNDARY_ID, OUTPUT_BOUNDARY_ID,
};

// Supporting types
pub use crate::geometry::{Point, Rect, Size};
pub use crate::index::GraphIndex;
pub use crate::registry::PorterRegistry;

// Error types
pub use crate::error::WorkflowParseError;
