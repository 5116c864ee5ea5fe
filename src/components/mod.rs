//! UI components.

pub mod call_graph;
