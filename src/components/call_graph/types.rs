//! Graph data structures for input to the call-graph component.

use serde::Deserialize;

/// A function node in the call graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier, stable across renders. Edges reference it.
	pub id: String,
	/// Display label (function name).
	pub name: String,
	/// Number of callers.
	#[serde(default)]
	pub in_degree: u32,
	/// Number of callees.
	#[serde(default)]
	pub out_degree: u32,
}

impl GraphNode {
	/// Total count of edges touching this node.
	pub fn degree(&self) -> u32 {
		self.in_degree + self.out_degree
	}
}

/// A directed call edge between two nodes, by id.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
	/// Caller node id.
	pub source: String,
	/// Callee node id.
	pub target: String,
}

/// Complete graph input: nodes and edges.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}
