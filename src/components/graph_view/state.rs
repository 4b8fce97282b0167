use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::rc::Rc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphNode, GraphPayload, color_for};

pub const NODE_RADIUS: f64 = 8.0;
pub const HIT_RADIUS: f64 = 14.0;

/// Toolbar zoom step. One click multiplies or divides the scale by this.
pub const ZOOM_STEP: f64 = 1.2;

const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 10.0;
const FIT_MARGIN: f64 = 40.0;

// Layout counts as stabilized once mean node displacement stays under the
// threshold for a full streak of ticks.
const SETTLE_THRESHOLD: f64 = 0.05;
const SETTLE_TICKS: u32 = 30;

#[derive(Clone, Debug, Default)]
pub struct NodeVisual {
	pub label: String,
	pub color: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

#[derive(Clone, Debug)]
pub struct EdgeSpan {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: Option<String>,
}

/// Simulation and view state for one rendered payload. A new `render`
/// replaces the whole instance; nothing from the prior graph survives.
pub struct GraphViewState {
	pub sim: ForceGraph<NodeVisual, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub settled: bool,
	settle_streak: u32,
	edges: Vec<EdgeSpan>,
	records: HashMap<String, GraphNode>,
	ids_by_idx: HashMap<DefaultNodeIdx, String>,
}

impl GraphViewState {
	pub fn new(payload: &GraphPayload, width: f64, height: f64) -> Self {
		let mut sim = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut idx_by_id = HashMap::new();
		let mut ids_by_idx = HashMap::new();
		let mut records = HashMap::new();
		let mut edges = Vec::new();

		// Seed positions on a ring so the simulation starts untangled.
		let count = payload.nodes.len().max(1);
		for (i, node) in payload.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			let (x, y) = (
				(width / 2.0 + 120.0 * angle.cos()) as f32,
				(height / 2.0 + 120.0 * angle.sin()) as f32,
			);

			let idx = sim.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeVisual {
					label: node.label.clone(),
					color: color_for(node.node_type.as_deref().unwrap_or("")),
				},
			});
			idx_by_id.insert(node.id.clone(), idx);
			ids_by_idx.insert(idx, node.id.clone());
			records.insert(node.id.clone(), node.clone());
		}

		for edge in &payload.edges {
			// Dangling endpoint references have nowhere to pin; drop them.
			if let (Some(&src), Some(&tgt)) =
				(idx_by_id.get(&edge.source), idx_by_id.get(&edge.target))
			{
				sim.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeSpan {
					source: src,
					target: tgt,
					label: edge.label.clone(),
				});
			}
		}

		Self {
			sim,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			settled: false,
			settle_streak: 0,
			edges,
			records,
			ids_by_idx,
		}
	}

	pub fn node_count(&self) -> usize {
		self.records.len()
	}

	pub fn edge_spans(&self) -> &[EdgeSpan] {
		&self.edges
	}

	/// The original node record behind a simulation index.
	pub fn node_record(&self, idx: DefaultNodeIdx) -> Option<&GraphNode> {
		self.ids_by_idx.get(&idx).and_then(|id| self.records.get(id))
	}

	/// The original node record for a payload id.
	pub fn record_by_id(&self, id: &str) -> Option<&GraphNode> {
		self.records.get(id)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.sim.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for span in &self.edges {
				if span.source == idx {
					self.hover.neighbors.insert(span.target);
				} else if span.target == idx {
					self.hover.neighbors.insert(span.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some()
	}

	/// Advance the simulation one frame, tracking stabilization.
	pub fn tick(&mut self, dt: f32) {
		let mut before = Vec::new();
		self.sim.visit_nodes(|node| before.push((node.x(), node.y())));

		self.sim.update(dt);

		let mut moved = 0.0;
		let mut i = 0;
		self.sim.visit_nodes(|node| {
			if let Some(&(px, py)) = before.get(i) {
				moved += ((node.x() - px).powi(2) + (node.y() - py).powi(2)).sqrt() as f64;
			}
			i += 1;
		});
		let mean = moved / before.len().max(1) as f64;

		if mean < SETTLE_THRESHOLD {
			self.settle_streak += 1;
			if self.settle_streak >= SETTLE_TICKS && !self.settled {
				self.settled = true;
				log::info!("graph layout stabilized");
			}
		} else {
			self.settle_streak = 0;
		}
	}

	/// Wake the simulation after the layout was perturbed (node drag).
	pub fn unsettle(&mut self) {
		self.settled = false;
		self.settle_streak = 0;
	}

	/// Scale the view about the canvas center.
	pub fn zoom_by(&mut self, factor: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.zoom_about(cx, cy, factor);
	}

	/// Scale the view keeping the given screen point fixed (wheel zoom).
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Recenter and rescale so the whole graph is visible.
	pub fn fit(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.sim.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((min_x, min_y, max_x, max_y)) => {
					(min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
				}
			});
		});
		let Some((min_x, min_y, max_x, max_y)) = bounds else {
			return;
		};

		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((self.width - 2.0 * FIT_MARGIN) / bw)
			.min((self.height - 2.0 * FIT_MARGIN) / bh)
			.clamp(MIN_SCALE, MAX_SCALE);
		self.transform.k = k;
		self.transform.x = self.width / 2.0 - (min_x + max_x) / 2.0 * k;
		self.transform.y = self.height / 2.0 - (min_y + max_y) / 2.0 * k;
	}
}

/// Cloneable control surface over the currently rendered graph.
///
/// All operations are no-ops while nothing is rendered; the slot has one
/// writer at a time (the active render) and is replaced wholesale.
#[derive(Clone, Default)]
pub struct GraphHandle {
	inner: Rc<RefCell<Option<GraphViewState>>>,
}

// The app runs as single-threaded WASM (CSR); leptos 0.8 still requires
// `Send + Sync` bounds on closures captured into `Callback`/component views.
// The `Rc<RefCell<..>>` slot is never shared across threads, so these are sound.
unsafe impl Send for GraphHandle {}
unsafe impl Sync for GraphHandle {}

impl GraphHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub(super) fn slot(&self) -> Rc<RefCell<Option<GraphViewState>>> {
		self.inner.clone()
	}

	pub(super) fn replace(&self, state: Option<GraphViewState>) {
		*self.inner.borrow_mut() = state;
	}

	pub fn is_rendered(&self) -> bool {
		self.inner.borrow().is_some()
	}

	pub fn clear(&self) {
		self.replace(None);
	}

	pub fn zoom_in(&self) {
		if let Some(ref mut s) = *self.inner.borrow_mut() {
			s.zoom_by(ZOOM_STEP);
		}
	}

	pub fn zoom_out(&self) {
		if let Some(ref mut s) = *self.inner.borrow_mut() {
			s.zoom_by(1.0 / ZOOM_STEP);
		}
	}

	pub fn fit(&self) {
		if let Some(ref mut s) = *self.inner.borrow_mut() {
			s.fit();
		}
	}

	/// Resolve a node id against the rendered dataset.
	pub fn node_record(&self, id: &str) -> Option<GraphNode> {
		self.inner
			.borrow()
			.as_ref()
			.and_then(|s| s.record_by_id(id).cloned())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::GraphEdge;

	fn payload(ids: &[&str], edges: &[(&str, &str)]) -> GraphPayload {
		GraphPayload {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					label: id.to_uppercase(),
					..Default::default()
				})
				.collect(),
			edges: edges
				.iter()
				.map(|(s, t)| GraphEdge {
					source: s.to_string(),
					target: t.to_string(),
					..Default::default()
				})
				.collect(),
		}
	}

	#[test]
	fn builds_indexed_sets_and_drops_dangling_edges() {
		let state = GraphViewState::new(
			&payload(&["a", "b"], &[("a", "b"), ("a", "ghost")]),
			800.0,
			600.0,
		);
		assert_eq!(state.node_count(), 2);
		assert_eq!(state.edge_spans().len(), 1);
		assert_eq!(state.record_by_id("a").unwrap().label, "A");
	}

	#[test]
	fn rebuild_leaves_no_trace_of_the_prior_payload() {
		let first = GraphViewState::new(&payload(&["old"], &[]), 800.0, 600.0);
		assert!(first.record_by_id("old").is_some());

		let second = GraphViewState::new(&payload(&["new"], &[]), 800.0, 600.0);
		assert!(second.record_by_id("old").is_none());
		assert!(second.record_by_id("new").is_some());
	}

	#[test]
	fn zoom_steps_scale_by_fixed_factor() {
		let mut state = GraphViewState::new(&payload(&["a"], &[]), 800.0, 600.0);
		assert_eq!(state.transform.k, 1.0);
		state.zoom_by(ZOOM_STEP);
		assert!((state.transform.k - 1.2).abs() < 1e-9);
		state.zoom_by(1.0 / ZOOM_STEP);
		assert!((state.transform.k - 1.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_clamps_at_scale_bounds() {
		let mut state = GraphViewState::new(&payload(&["a"], &[]), 800.0, 600.0);
		for _ in 0..100 {
			state.zoom_by(ZOOM_STEP);
		}
		assert!(state.transform.k <= MAX_SCALE);
		for _ in 0..200 {
			state.zoom_by(1.0 / ZOOM_STEP);
		}
		assert!(state.transform.k >= MIN_SCALE);
	}

	#[test]
	fn fit_brings_every_node_into_the_viewport() {
		let mut state = GraphViewState::new(&payload(&["a", "b", "c"], &[]), 800.0, 600.0);
		state.fit();
		state.sim.visit_nodes(|node| {
			let sx = node.x() as f64 * state.transform.k + state.transform.x;
			let sy = node.y() as f64 * state.transform.k + state.transform.y;
			assert!(sx >= 0.0 && sx <= state.width);
			assert!(sy >= 0.0 && sy <= state.height);
		});
	}

	#[test]
	fn hit_test_finds_a_node_at_its_seeded_position() {
		let state = GraphViewState::new(&payload(&["a"], &[]), 800.0, 600.0);
		// Single node seeds at angle 0: ring radius to the right of center.
		let idx = state.node_at_position(400.0 + 120.0, 300.0);
		assert!(idx.is_some());
		assert_eq!(state.node_record(idx.unwrap()).unwrap().id, "a");
		assert!(state.node_at_position(0.0, 0.0).is_none());
	}

	#[test]
	fn hover_collects_neighbors_in_both_directions() {
		let mut state =
			GraphViewState::new(&payload(&["a", "b", "c"], &[("a", "b"), ("c", "a")]), 800.0, 600.0);
		let idx = state.node_at_position(400.0 + 120.0, 300.0).unwrap();
		state.set_hover(Some(idx));
		assert!(state.has_active_highlight());
		assert_eq!(state.hover.neighbors.len(), 2);
		state.set_hover(None);
		assert!(!state.has_active_highlight());
		assert!(state.hover.neighbors.is_empty());
	}

	#[test]
	fn a_lone_node_settles() {
		let mut state = GraphViewState::new(&payload(&["a"], &[]), 800.0, 600.0);
		for _ in 0..(SETTLE_TICKS * 4) {
			state.tick(0.016);
		}
		assert!(state.settled);
		state.unsettle();
		assert!(!state.settled);
	}

	#[test]
	fn handle_operations_are_noops_without_a_graph() {
		let handle = GraphHandle::new();
		handle.zoom_in();
		handle.zoom_out();
		handle.fit();
		assert!(!handle.is_rendered());
		assert!(handle.node_record("a").is_none());
	}

	#[test]
	fn handle_controls_the_rendered_state() {
		let handle = GraphHandle::new();
		handle.replace(Some(GraphViewState::new(&payload(&["a"], &[]), 800.0, 600.0)));
		assert!(handle.is_rendered());
		handle.zoom_in();
		assert!(
			(handle.slot().borrow().as_ref().unwrap().transform.k - ZOOM_STEP).abs() < 1e-9
		);
		assert_eq!(handle.node_record("a").unwrap().label, "A");
		assert!(handle.node_record("missing").is_none());
		handle.clear();
		assert!(!handle.is_rendered());
	}
}
