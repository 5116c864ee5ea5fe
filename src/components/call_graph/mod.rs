//! Force-directed call-graph visualization component.
//!
//! Renders an interactive call graph on an HTML canvas with:
//! - Physics-based node positioning (link, many-body, centering, and
//!   collision forces with alpha cooling)
//! - Pan, zoom, and node dragging interactions
//! - Hover highlighting of the one-hop neighborhood plus an info tooltip
//! - Degree-based node sizing and color tiers, with an external selection
//!   override
//!
//! # Example
//!
//! ```ignore
//! use callgraph_canvas::{CallGraphCanvas, GraphData, GraphNode, GraphEdge};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "1".into(), name: "main".into(), in_degree: 0, out_degree: 1 },
//!         GraphNode { id: "2".into(), name: "parse".into(), in_degree: 1, out_degree: 0 },
//!     ],
//!     edges: vec![
//!         GraphEdge { source: "1".into(), target: "2".into() },
//!     ],
//! };
//!
//! view! { <CallGraphCanvas data=data.into() fullscreen=true /> }
//! ```

mod component;
mod render;
mod sim;
mod state;
mod style;
mod types;

pub use component::CallGraphCanvas;
pub use types::{GraphData, GraphEdge, GraphNode};
