//! Component state and pointer interaction tracking.
//!
//! Owns the layout simulation, the pan/zoom view transform, and an explicit
//! interaction state machine. Pointer events arrive as plain coordinates so
//! every transition is testable without a live pointer device; the Leptos
//! component is a thin adapter over the methods here.

use std::collections::HashSet;

use log::warn;

use super::sim::{SimParams, Simulation};
use super::style;
use super::types::{GraphData, GraphNode};

/// Pointer travel (in screen pixels) past which a press counts as a drag
/// rather than a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Pan and zoom transform from world coordinates to screen pixels.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to 0.1..=4.0.
	pub k: f64,
}

impl ViewTransform {
	const MIN_ZOOM: f64 = 0.1;
	const MAX_ZOOM: f64 = 4.0;

	fn new() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}

	/// Map screen pixels back to world coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scale by `factor` keeping the world point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
	Idle,
	/// Pointer resting over a node; neighbors are highlighted.
	Hovering(usize),
	/// Pressed on a node. `moved` flips once travel exceeds the drag
	/// threshold, which suppresses the click on release.
	Dragging { node: usize, down: (f64, f64), moved: bool },
	/// Pressed on empty space; translating the view.
	Panning { start: (f64, f64), origin: (f64, f64) },
}

/// Full state of the call-graph component: simulation, per-node display
/// metadata (index-aligned with the simulation arena), resolved edges, and
/// interaction bookkeeping.
pub struct CallGraphState {
	pub sim: Simulation,
	nodes: Vec<GraphNode>,
	edges: Vec<(usize, usize)>,
	pub transform: ViewTransform,
	pub interaction: Interaction,
	neighbors: HashSet<usize>,
	selected: Option<usize>,
	cursor: (f64, f64),
	pub width: f64,
	pub height: f64,
	dirty: bool,
}

impl CallGraphState {
	/// Build the component state from input graph data.
	///
	/// Edge ids are resolved to arena indices up front; an edge naming an
	/// unknown node is dropped with a warning rather than corrupting the
	/// simulation. A zero-area viewport leaves the engine deferred until
	/// [`CallGraphState::resize`] observes a real size.
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut id_to_idx = std::collections::HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			if id_to_idx.insert(node.id.clone(), i).is_some() {
				warn!("duplicate node id {:?} in graph data", node.id);
			}
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			match (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				(Some(&s), Some(&t)) => edges.push((s, t)),
				_ => warn!(
					"dropping edge {:?} -> {:?}: unknown node id",
					edge.source, edge.target
				),
			}
		}

		let mut sim = Simulation::new(data.nodes.len(), edges.clone(), SimParams::default());
		sim.set_viewport(width, height);

		Self {
			sim,
			nodes: data.nodes.clone(),
			edges,
			transform: ViewTransform::new(),
			interaction: Interaction::Idle,
			neighbors: HashSet::new(),
			selected: None,
			cursor: (0.0, 0.0),
			width,
			height,
			dirty: true,
		}
	}

	/// Per-node display metadata, index-aligned with the simulation arena.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Resolved edges as arena index pairs, in input order.
	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	/// Node the pointer currently rests on, if any.
	pub fn hovered(&self) -> Option<usize> {
		match self.interaction {
			Interaction::Hovering(i) => Some(i),
			_ => None,
		}
	}

	/// Last pointer position in screen coordinates.
	pub fn cursor(&self) -> (f64, f64) {
		self.cursor
	}

	/// Whether the node at `idx` is the externally selected one.
	pub fn is_selected(&self, idx: usize) -> bool {
		self.selected == Some(idx)
	}

	/// Update the externally supplied selection by node id.
	pub fn set_selected(&mut self, id: Option<&str>) {
		let idx = id.and_then(|id| self.nodes.iter().position(|n| n.id == id));
		if idx != self.selected {
			self.selected = idx;
			self.dirty = true;
		}
	}

	/// Adopt a new surface size and re-center the simulation. Starts a
	/// previously deferred engine once the area becomes non-zero.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_viewport(width, height);
		self.dirty = true;
	}

	/// Advance the simulation one frame. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		let moved = self.sim.step();
		if moved {
			self.dirty = true;
		}
		moved
	}

	/// Consume the dirty flag; the render surface redraws only when set.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// Topmost node whose circle covers the given screen position.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.transform.screen_to_world(sx, sy);
		for (i, node) in self.nodes.iter().enumerate().rev() {
			let (x, y) = self.sim.position(i);
			let r = style::node_radius(node.degree());
			if (x - wx).powi(2) + (y - wy).powi(2) <= r * r {
				return Some(i);
			}
		}
		None
	}

	/// Pointer pressed. On a node this begins a drag: the engine is rewarmed
	/// if cold and the node pinned at its current position. On empty space it
	/// begins a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.cursor = (sx, sy);
		self.interaction = match self.node_at(sx, sy) {
			Some(i) => {
				if self.sim.is_cold() {
					self.sim.restart(0.3);
				}
				let (x, y) = self.sim.position(i);
				self.sim.pin(i, x, y);
				Interaction::Dragging { node: i, down: (sx, sy), moved: false }
			}
			None => Interaction::Panning {
				start: (sx, sy),
				origin: (self.transform.x, self.transform.y),
			},
		};
		self.dirty = true;
	}

	/// Pointer moved. Drives dragging, panning, or hover highlighting
	/// depending on the current state.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.cursor = (sx, sy);
		match self.interaction {
			Interaction::Dragging { node, down, ref mut moved } => {
				if !*moved && (sx - down.0).hypot(sy - down.1) > DRAG_THRESHOLD {
					*moved = true;
				}
				let (wx, wy) = self.transform.screen_to_world(sx, sy);
				self.sim.pin(node, wx, wy);
				self.dirty = true;
			}
			Interaction::Panning { start, origin } => {
				self.transform.x = origin.0 + (sx - start.0);
				self.transform.y = origin.1 + (sy - start.1);
				self.dirty = true;
			}
			Interaction::Idle | Interaction::Hovering(_) => {
				let over = self.node_at(sx, sy);
				match (self.hovered(), over) {
					(prev, Some(i)) if prev != Some(i) => self.set_hover(Some(i)),
					(Some(_), None) => self.set_hover(None),
					_ => {}
				}
				// Tooltip tracks the cursor while hovering.
				if self.hovered().is_some() {
					self.dirty = true;
				}
			}
		}
	}

	/// Pointer released. Ends a drag (unpinning the node and letting the
	/// engine cool) or a pan. Returns the clicked node when the press never
	/// travelled past the drag threshold; the caller dispatches it.
	pub fn pointer_up(&mut self) -> Option<GraphNode> {
		let finished = std::mem::replace(&mut self.interaction, Interaction::Idle);
		self.dirty = true;
		match finished {
			Interaction::Dragging { node, moved, .. } => {
				self.sim.unpin(node);
				self.sim.restart(0.0);
				(!moved).then(|| self.nodes[node].clone())
			}
			_ => None,
		}
	}

	/// Pointer left the surface: abandon any gesture and clear the hover.
	pub fn pointer_leave(&mut self) {
		if let Interaction::Dragging { node, .. } = self.interaction {
			self.sim.unpin(node);
			self.sim.restart(0.0);
		}
		self.interaction = Interaction::Idle;
		self.neighbors.clear();
		self.dirty = true;
	}

	/// Wheel zoom anchored at the cursor. Positive `delta_y` zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_at(sx, sy, factor);
		self.dirty = true;
	}

	fn set_hover(&mut self, node: Option<usize>) {
		self.neighbors.clear();
		self.interaction = match node {
			Some(i) => {
				// Linear scan over the edge list; fine at dashboard scale.
				for &(s, t) in &self.edges {
					if s == i {
						self.neighbors.insert(t);
					} else if t == i {
						self.neighbors.insert(s);
					}
				}
				Interaction::Hovering(i)
			}
			None => Interaction::Idle,
		};
		self.dirty = true;
	}

	/// Opacity for a node: full for the hovered node and its one-hop
	/// neighbors, dimmed for the rest while a hover is active.
	pub fn node_alpha(&self, idx: usize) -> f64 {
		match self.hovered() {
			None => 1.0,
			Some(h) if h == idx || self.neighbors.contains(&idx) => 1.0,
			Some(_) => style::DIMMED_NODE_ALPHA,
		}
	}

	/// Opacity for an edge: full when it touches the hovered node, near-zero
	/// for unrelated edges while a hover is active.
	pub fn edge_alpha(&self, s: usize, t: usize) -> f64 {
		match self.hovered() {
			None => style::EDGE_ALPHA,
			Some(h) if s == h || t == h => 1.0,
			Some(_) => style::DIMMED_EDGE_ALPHA,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::call_graph::types::GraphEdge;

	fn node(id: &str, in_degree: u32, out_degree: u32) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			name: id.to_string(),
			in_degree,
			out_degree,
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.to_string(),
			target: target.to_string(),
		}
	}

	/// Two nodes linked a->b. With an 800x600 viewport the ring seeding puts
	/// node 0 at (500, 300) and node 1 at (300, 300).
	fn two_node_state() -> CallGraphState {
		let data = GraphData {
			nodes: vec![node("a", 1, 1), node("b", 4, 4)],
			edges: vec![edge("a", "b")],
		};
		CallGraphState::new(&data, 800.0, 600.0)
	}

	#[test]
	fn dangling_edge_is_dropped() {
		let data = GraphData {
			nodes: vec![node("a", 0, 0), node("b", 0, 0)],
			edges: vec![edge("a", "b"), edge("a", "ghost")],
		};
		let state = CallGraphState::new(&data, 800.0, 600.0);
		assert_eq!(state.edges(), &[(0, 1)]);
	}

	#[test]
	fn hit_test_uses_node_radius() {
		let state = two_node_state();
		// Node 0 has degree 2 => radius 15.
		assert_eq!(state.node_at(500.0, 300.0), Some(0));
		assert_eq!(state.node_at(514.0, 300.0), Some(0));
		assert_eq!(state.node_at(516.0, 300.0), None);
	}

	#[test]
	fn click_without_movement_reports_node() {
		let mut state = two_node_state();
		state.pointer_down(500.0, 300.0);
		let clicked = state.pointer_up();
		assert_eq!(clicked.map(|n| n.id), Some("a".to_string()));
		assert_eq!(state.interaction, Interaction::Idle);
	}

	#[test]
	fn drag_suppresses_click() {
		let mut state = two_node_state();
		state.pointer_down(500.0, 300.0);
		state.pointer_move(520.0, 320.0);
		assert!(state.pointer_up().is_none());
	}

	#[test]
	fn tiny_jitter_still_counts_as_click() {
		let mut state = two_node_state();
		state.pointer_down(500.0, 300.0);
		state.pointer_move(501.0, 301.0);
		assert!(state.pointer_up().is_some());
	}

	#[test]
	fn dragged_node_is_pinned_at_pointer() {
		let mut state = two_node_state();
		state.pointer_down(500.0, 300.0);
		state.pointer_move(520.0, 330.0);
		state.tick();
		assert_eq!(state.sim.position(0), (520.0, 330.0));
		// Release unpins; the node is free to move again.
		state.pointer_up();
		for _ in 0..10 {
			state.tick();
		}
		assert_ne!(state.sim.position(0), (520.0, 330.0));
	}

	#[test]
	fn drag_accounts_for_view_transform() {
		let mut state = two_node_state();
		state.transform.x = 100.0;
		state.transform.y = 50.0;
		state.transform.k = 2.0;
		// Node 0 world (500, 300) projects to screen (1100, 650).
		state.pointer_down(1100.0, 650.0);
		assert!(matches!(state.interaction, Interaction::Dragging { node: 0, .. }));
		state.pointer_move(1200.0, 650.0);
		state.tick();
		assert_eq!(state.sim.position(0), (550.0, 300.0));
	}

	#[test]
	fn drag_rewarms_cold_engine() {
		let mut state = two_node_state();
		while state.tick() {}
		assert!(state.sim.is_cold());
		let (x, y) = state.sim.position(0);
		state.pointer_down(x, y);
		assert!(state.sim.is_running());
	}

	#[test]
	fn hover_highlights_symmetric_neighborhood() {
		let mut state = two_node_state();
		// Hover the edge's source.
		state.pointer_move(500.0, 300.0);
		assert_eq!(state.hovered(), Some(0));
		assert_eq!(state.node_alpha(0), 1.0);
		assert_eq!(state.node_alpha(1), 1.0);
		// Hover the target: same highlighted set, direction does not matter.
		state.pointer_move(300.0, 300.0);
		assert_eq!(state.hovered(), Some(1));
		assert_eq!(state.node_alpha(0), 1.0);
		assert_eq!(state.node_alpha(1), 1.0);
	}

	#[test]
	fn hover_dims_unrelated_elements() {
		let data = GraphData {
			nodes: vec![node("a", 0, 1), node("b", 1, 0), node("c", 0, 0)],
			edges: vec![edge("a", "b")],
		};
		let mut state = CallGraphState::new(&data, 800.0, 600.0);
		let (x, y) = state.sim.position(0);
		state.pointer_move(x, y);
		assert_eq!(state.hovered(), Some(0));
		assert_eq!(state.node_alpha(2), style::DIMMED_NODE_ALPHA);
		assert_eq!(state.edge_alpha(0, 1), 1.0);
		assert_eq!(state.edge_alpha(1, 2), style::DIMMED_EDGE_ALPHA);
	}

	#[test]
	fn hover_leave_restores_opacity() {
		let mut state = two_node_state();
		state.pointer_move(500.0, 300.0);
		assert_eq!(state.hovered(), Some(0));
		state.pointer_move(700.0, 100.0);
		assert_eq!(state.hovered(), None);
		assert_eq!(state.node_alpha(1), 1.0);
		assert_eq!(state.edge_alpha(0, 1), style::EDGE_ALPHA);
	}

	#[test]
	fn hovering_isolated_node_is_safe() {
		let data = GraphData {
			nodes: vec![node("lonely", 0, 0)],
			edges: vec![],
		};
		let mut state = CallGraphState::new(&data, 800.0, 600.0);
		let (x, y) = state.sim.position(0);
		state.pointer_move(x, y);
		assert_eq!(state.hovered(), Some(0));
		assert_eq!(state.node_alpha(0), 1.0);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = two_node_state();
		for _ in 0..100 {
			state.zoom(400.0, 300.0, -1.0);
		}
		assert_eq!(state.transform.k, 4.0);
		for _ in 0..100 {
			state.zoom(400.0, 300.0, 1.0);
		}
		assert!((state.transform.k - 0.1).abs() < 1e-9);
	}

	#[test]
	fn zoom_preserves_anchor_point() {
		let mut state = two_node_state();
		let anchor_world = state.transform.screen_to_world(500.0, 300.0);
		state.zoom(500.0, 300.0, -1.0);
		let after = state.transform.screen_to_world(500.0, 300.0);
		assert!((anchor_world.0 - after.0).abs() < 1e-9);
		assert!((anchor_world.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn pan_translates_view() {
		let mut state = two_node_state();
		state.pointer_down(700.0, 500.0); // empty space
		assert!(matches!(state.interaction, Interaction::Panning { .. }));
		state.pointer_move(750.0, 480.0);
		assert_eq!(state.transform.x, 50.0);
		assert_eq!(state.transform.y, -20.0);
		assert!(state.pointer_up().is_none());
	}

	#[test]
	fn selection_tracks_node_id() {
		let mut state = two_node_state();
		state.set_selected(Some("b"));
		assert!(state.is_selected(1));
		assert!(!state.is_selected(0));
		state.set_selected(Some("unknown"));
		assert!(!state.is_selected(1));
		state.set_selected(None);
		assert!(!state.is_selected(0));
	}

	#[test]
	fn resize_starts_deferred_engine() {
		let data = GraphData {
			nodes: vec![node("a", 0, 0), node("b", 0, 0)],
			edges: vec![],
		};
		let mut state = CallGraphState::new(&data, 0.0, 0.0);
		assert!(!state.tick());
		state.resize(800.0, 600.0);
		assert_eq!(state.sim.center(), (400.0, 300.0));
		assert!(state.tick());
	}

	#[test]
	fn dirty_flag_is_consumed() {
		let mut state = two_node_state();
		assert!(state.take_dirty());
		assert!(!state.take_dirty());
		state.zoom(0.0, 0.0, 1.0);
		assert!(state.take_dirty());
	}

	#[test]
	fn pointer_leave_aborts_drag() {
		let mut state = two_node_state();
		state.pointer_down(500.0, 300.0);
		state.pointer_leave();
		assert_eq!(state.interaction, Interaction::Idle);
		state.tick();
		// Node is unpinned again and free to move.
		for _ in 0..10 {
			state.tick();
		}
		assert_ne!(state.sim.position(0), (500.0, 300.0));
	}
}
