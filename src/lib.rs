//! # Tenkai - Workflow Graph Transformation Engine
//!
//! **Tenkai** transforms node-and-link workflow documents from a visual
//! programming editor. It provides the two algorithmic cores such an editor
//! needs and nothing else:
//!
//! 1. **Dependency analysis** - assigns every node a topological *level*
//!    (honoring both literal links and *virtual*, name-matched setter/getter
//!    dependencies) and partitions nodes into display "chains" for grouped
//!    rendering.
//! 2. **Subgraph flattening** - recursively inlines reusable subgraph
//!    instances into the enclosing graph, preserving external connectivity
//!    through synthesized porter pairs and computing non-overlapping layout
//!    placement for the inlined regions.
//!
//! Both engines are pure functions over the same JSON document schema: the
//! caller loads a workflow, hands it to Tenkai, and renders or stores the
//! result. Rendering, execution, persistence and transport are collaborator
//! concerns.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tenkai::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("workflow.json")?;
//!     let workflow = Workflow::from_json(&json)?;
//!
//!     // Flatten subgraph instances, if the document has any.
//!     let flat = if has_subgraphs(&workflow) {
//!         SubgraphExtractor::new().extract_all(&workflow)
//!     } else {
//!         workflow
//!     };
//!
//!     // Level the graph and group it into display chains.
//!     let report = DependencyAnalyzer::new().chain_report(&flat);
//!     for chain in &report.chains {
//!         println!(
//!             "chain {}: levels {}..{} ({} nodes)",
//!             chain.id, chain.start_level, chain.max_level, chain.node_count
//!         );
//!     }
//!
//!     std::fs::write("workflow.flat.json", flat.to_json()?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Customizing the porter idiom
//!
//! Which node types act as pass-through setters/getters is editor
//! configuration. Inject it through [`registry::PorterRegistry`]:
//!
//! ```rust
//! use tenkai::prelude::*;
//!
//! let registry = PorterRegistry::new()
//!     .with_setter_type("easy setNode")
//!     .with_getter_type("easy getNode");
//! let analyzer = DependencyAnalyzer::with_registry(registry);
//! ```

pub mod analysis;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod index;
pub mod prelude;
pub mod registry;
pub mod workflow;
