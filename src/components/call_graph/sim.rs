//! Force-directed layout simulation.
//!
//! An arena of nodes indexed by position, with links stored as index pairs.
//! Each tick accumulates link attraction, many-body repulsion, and a gentle
//! centering pull into per-node velocities, integrates positions, then
//! resolves pairwise collision overlaps. A scalar "alpha" scales every force
//! and decays toward an alpha target each tick; once both drop below the
//! minimum the simulation is cold and `step` does no work until `restart`.
//!
//! Force accumulation only reads positions from the previous tick; positions
//! are written in a separate integration pass, so observers never see a
//! half-applied tick.

use std::f64::consts::TAU;

/// Tuning parameters for the layout forces.
#[derive(Clone, Debug)]
pub struct SimParams {
	/// Target separation for linked node pairs, in world units.
	pub link_distance: f64,
	/// Proportional strength of the link spring.
	pub link_strength: f64,
	/// Many-body charge. Negative repels.
	pub charge: f64,
	/// Strength of the pull toward the viewport center.
	pub center_strength: f64,
	/// Per-node collision radius; pairs separate to twice this value.
	pub collide_radius: f64,
	/// Velocity retained after each integration step.
	pub velocity_decay: f64,
	/// Alpha below which the simulation is considered settled.
	pub alpha_min: f64,
	/// Per-tick interpolation rate of alpha toward its target.
	pub alpha_decay: f64,
}

impl Default for SimParams {
	fn default() -> Self {
		Self {
			link_distance: 100.0,
			link_strength: 0.1,
			charge: -300.0,
			center_strength: 0.05,
			collide_radius: 30.0,
			velocity_decay: 0.6,
			alpha_min: 0.001,
			alpha_decay: 0.0228,
		}
	}
}

/// A simulated node: position, velocity, and an optional pinned override.
#[derive(Clone, Debug, Default)]
struct SimNode {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	/// While set, the node is clamped here every tick and ignores forces on
	/// itself, but still pushes and pulls its neighbors.
	pinned: Option<(f64, f64)>,
}

/// Iterative force simulation assigning 2D positions to an arena of nodes.
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<(usize, usize)>,
	params: SimParams,
	alpha: f64,
	alpha_target: f64,
	center: (f64, f64),
	ready: bool,
	stopped: bool,
}

impl Simulation {
	/// Create a simulation over `node_count` nodes connected by `links`
	/// (arena index pairs, already validated by the caller).
	///
	/// The engine stays idle until [`Simulation::set_viewport`] sees a
	/// non-zero surface; a zero-area viewport has no defined center.
	pub fn new(node_count: usize, links: Vec<(usize, usize)>, params: SimParams) -> Self {
		Self {
			nodes: vec![SimNode::default(); node_count],
			links,
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			center: (0.0, 0.0),
			ready: false,
			stopped: false,
		}
	}

	/// Update the viewport dimensions, re-centering the layout target.
	///
	/// The first non-zero viewport seeds initial positions in a ring around
	/// the center and arms the engine; returns `true` exactly then. Zero
	/// width or height leaves the engine deferred.
	pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
		if width <= 0.0 || height <= 0.0 {
			return false;
		}
		self.center = (width / 2.0, height / 2.0);
		if self.ready {
			return false;
		}
		self.ready = true;
		let n = self.nodes.len();
		for (i, node) in self.nodes.iter_mut().enumerate() {
			let angle = i as f64 * TAU / n as f64;
			node.x = self.center.0 + 100.0 * angle.cos();
			node.y = self.center.1 + 100.0 * angle.sin();
		}
		true
	}

	/// Current centering target, `(width / 2, height / 2)`.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Current kinetic energy scalar.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether a `step` call would advance the layout.
	pub fn is_running(&self) -> bool {
		!self.stopped && self.ready && !self.nodes.is_empty() && !self.is_cold()
	}

	/// Whether the energy has decayed below the settling threshold.
	pub fn is_cold(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	/// Reinject kinetic energy without touching positions. A positive target
	/// wakes a cold engine; zero lets it cool back down naturally.
	pub fn restart(&mut self, target: f64) {
		if self.stopped {
			return;
		}
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// Halt the simulation for good. Idempotent; `step` and `restart` become
	/// no-ops so no scheduled work can move a torn-down graph.
	pub fn stop(&mut self) {
		self.stopped = true;
	}

	/// Pin a node to a fixed position. It no longer integrates but keeps
	/// exerting forces on its neighbors.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pinned = Some((x, y));
			node.x = x;
			node.y = y;
		}
	}

	/// Release a pinned node back into free simulation.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pinned = None;
		}
	}

	/// Position of a node in world coordinates.
	pub fn position(&self, idx: usize) -> (f64, f64) {
		let node = &self.nodes[idx];
		(node.x, node.y)
	}

	/// Advance the simulation by one tick. Returns `false` without touching
	/// any position when stopped, not yet ready, empty, or cold.
	pub fn step(&mut self) -> bool {
		if self.stopped || !self.ready || self.nodes.is_empty() || self.is_cold() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.accumulate_links();
		self.accumulate_charge();
		self.accumulate_center();
		self.integrate();
		self.resolve_collisions();

		true
	}

	fn accumulate_links(&mut self) {
		for &(s, t) in &self.links {
			let (dx, dy) = pair_delta(&self.nodes, s, t);
			let dist = (dx * dx + dy * dy).sqrt();
			let f = (dist - self.params.link_distance) * self.params.link_strength * self.alpha;
			let (fx, fy) = (dx / dist * f * 0.5, dy / dist * f * 0.5);
			self.nodes[s].vx += fx;
			self.nodes[s].vy += fy;
			self.nodes[t].vx -= fx;
			self.nodes[t].vy -= fy;
		}
	}

	fn accumulate_charge(&mut self) {
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (dx, dy) = pair_delta(&self.nodes, i, j);
				// Clamp the minimum distance so coincident nodes repel
				// finitely instead of exploding.
				let d2 = (dx * dx + dy * dy).max(1.0);
				// Negative charge pushes the pair apart along their axis.
				let w = self.params.charge * self.alpha / d2;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn accumulate_center(&mut self) {
		let (cx, cy) = self.center;
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * self.params.center_strength * self.alpha;
			node.vy += (cy - node.y) * self.params.center_strength * self.alpha;
		}
	}

	fn integrate(&mut self) {
		for node in &mut self.nodes {
			if let Some((px, py)) = node.pinned {
				node.x = px;
				node.y = py;
				node.vx = 0.0;
				node.vy = 0.0;
			} else {
				node.vx *= self.params.velocity_decay;
				node.vy *= self.params.velocity_decay;
				node.x += node.vx;
				node.y += node.vy;
			}
		}
	}

	/// Separate overlapping pairs to twice the collision radius. Runs after
	/// the force integration so overlap never survives a tick. Pinned nodes
	/// hold their ground; the free partner absorbs the full correction.
	fn resolve_collisions(&mut self) {
		let min_sep = self.params.collide_radius * 2.0;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (dx, dy) = pair_delta(&self.nodes, i, j);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_sep {
					continue;
				}
				let overlap = min_sep - dist;
				let (ux, uy) = (dx / dist, dy / dist);
				match (self.nodes[i].pinned.is_some(), self.nodes[j].pinned.is_some()) {
					(false, false) => {
						self.nodes[i].x -= ux * overlap * 0.5;
						self.nodes[i].y -= uy * overlap * 0.5;
						self.nodes[j].x += ux * overlap * 0.5;
						self.nodes[j].y += uy * overlap * 0.5;
					}
					(true, false) => {
						self.nodes[j].x += ux * overlap;
						self.nodes[j].y += uy * overlap;
					}
					(false, true) => {
						self.nodes[i].x -= ux * overlap;
						self.nodes[i].y -= uy * overlap;
					}
					(true, true) => {}
				}
			}
		}
	}
}

/// Delta from node `a` to node `b`, nudged deterministically apart when the
/// pair is coincident so force directions stay defined.
fn pair_delta(nodes: &[SimNode], a: usize, b: usize) -> (f64, f64) {
	let (dx, dy) = (nodes[b].x - nodes[a].x, nodes[b].y - nodes[a].y);
	if dx * dx + dy * dy > 1e-12 {
		return (dx, dy);
	}
	let angle = (a * 31 + b * 17) as f64;
	(1e-3 * angle.cos(), 1e-3 * angle.sin())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sim(node_count: usize, links: Vec<(usize, usize)>) -> Simulation {
		Simulation::new(node_count, links, SimParams::default())
	}

	#[test]
	fn empty_graph_never_ticks() {
		let mut s = sim(0, vec![]);
		s.set_viewport(800.0, 600.0);
		assert!(!s.step());
		assert!(!s.is_running());
	}

	#[test]
	fn zero_viewport_defers_start() {
		let mut s = sim(2, vec![(0, 1)]);
		assert!(!s.set_viewport(0.0, 0.0));
		assert!(!s.step());
		assert!(s.set_viewport(800.0, 600.0));
		assert_eq!(s.center(), (400.0, 300.0));
		assert!(s.step());
	}

	#[test]
	fn viewport_starts_engine_exactly_once() {
		let mut s = sim(3, vec![]);
		assert!(s.set_viewport(800.0, 600.0));
		assert!(!s.set_viewport(1024.0, 768.0));
		assert_eq!(s.center(), (512.0, 384.0));
	}

	#[test]
	fn settles_and_goes_cold() {
		let mut s = sim(2, vec![(0, 1)]);
		s.set_viewport(800.0, 600.0);
		let mut ticks = 0;
		while s.step() {
			ticks += 1;
			assert!(ticks < 1000, "simulation failed to settle");
		}
		assert!(s.is_cold());
		assert!(s.alpha() < 0.001);
		// Positions stay finite through the whole run.
		for i in 0..2 {
			let (x, y) = s.position(i);
			assert!(x.is_finite() && y.is_finite());
		}
	}

	#[test]
	fn pinned_node_never_drifts() {
		let mut s = sim(3, vec![(0, 1), (1, 2)]);
		s.set_viewport(800.0, 600.0);
		s.pin(1, 123.0, 456.0);
		for _ in 0..50 {
			s.step();
			assert_eq!(s.position(1), (123.0, 456.0));
		}
	}

	#[test]
	fn pinned_node_still_repels_neighbors() {
		let mut s = sim(2, vec![]);
		s.set_viewport(800.0, 600.0);
		s.pin(0, 400.0, 300.0);
		s.pin(1, 400.0, 300.0);
		s.step();
		s.unpin(1);
		for _ in 0..30 {
			s.step();
		}
		let (x0, y0) = s.position(0);
		let (x1, y1) = s.position(1);
		let dist = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
		assert_eq!((x0, y0), (400.0, 300.0));
		assert!(dist > 1.0, "coincident free node should be pushed away, dist={dist}");
	}

	#[test]
	fn collision_enforces_separation() {
		let mut s = sim(2, vec![(0, 1)]);
		s.set_viewport(800.0, 600.0);
		while s.step() {}
		let (x0, y0) = s.position(0);
		let (x1, y1) = s.position(1);
		let dist = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
		assert!(dist >= 60.0 - 1e-6, "nodes closer than collision separation: {dist}");
	}

	#[test]
	fn restart_wakes_cold_engine() {
		let mut s = sim(2, vec![(0, 1)]);
		s.set_viewport(800.0, 600.0);
		while s.step() {}
		assert!(s.is_cold());

		s.restart(0.3);
		assert!(s.is_running());
		assert!(s.step());

		s.restart(0.0);
		let mut ticks = 0;
		while s.step() {
			ticks += 1;
			assert!(ticks < 1000, "engine failed to cool back down");
		}
		assert!(s.is_cold());
	}

	#[test]
	fn restart_does_not_reset_positions() {
		let mut s = sim(2, vec![(0, 1)]);
		s.set_viewport(800.0, 600.0);
		while s.step() {}
		let before = (s.position(0), s.position(1));
		s.restart(0.3);
		assert_eq!(before, (s.position(0), s.position(1)));
	}

	#[test]
	fn stop_is_idempotent_and_sticky() {
		let mut s = sim(2, vec![(0, 1)]);
		s.set_viewport(800.0, 600.0);
		s.stop();
		s.stop();
		assert!(!s.step());
		assert!(!s.is_running());
		// A stopped engine cannot be resurrected.
		s.restart(0.3);
		assert!(!s.step());
	}
}
