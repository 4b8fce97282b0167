use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{GraphViewState, NODE_RADIUS};

const BACKGROUND: &str = "#fafafa";
const EDGE_COLOR: &str = "#999999";
const EDGE_HIGHLIGHT: &str = "#555555";
const LABEL_COLOR: &str = "#333333";
const EDGE_LABEL_COLOR: &str = "#777777";

pub fn draw(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let positions = collect_positions(state);
	draw_edges(state, ctx, &positions);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn collect_positions(state: &GraphViewState) -> HashMap<DefaultNodeIdx, (f64, f64)> {
	let mut positions = HashMap::new();
	state.sim.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});
	positions
}

fn draw_edges(
	state: &GraphViewState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let k = state.transform.k;
	let (line_width, arrow_size) = (1.5 / k, 8.0 / k);
	let dimmed = state.has_active_highlight();

	for span in state.edge_spans() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&span.source), positions.get(&span.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted =
			state.is_highlighted(span.source) && state.is_highlighted(span.target);
		let (color, alpha, width) = if is_highlighted {
			(EDGE_HIGHLIGHT, 1.0, line_width * 1.4)
		} else if dimmed {
			(EDGE_COLOR, 0.25, line_width)
		} else {
			(EDGE_COLOR, 0.9, line_width)
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);

		// Shorten the segment so the arrowhead lands on the node rim.
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		ctx.set_fill_style_str(color);
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(label) = &span.label {
			if !label.is_empty() {
				ctx.set_fill_style_str(EDGE_LABEL_COLOR);
				ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
				let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
				let _ = ctx.fill_text(label, mx + 4.0 / k, my - 4.0 / k);
			}
		}
		ctx.set_global_alpha(1.0);
	}
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let dimmed = state.has_active_highlight();

	state.sim.visit_nodes(|node| {
		let idx = node.index();
		let (x, y) = (node.x() as f64, node.y() as f64);
		let highlighted = state.is_highlighted(idx);
		let alpha = if dimmed && !highlighted { 0.3 } else { 1.0 };
		let radius = if highlighted {
			NODE_RADIUS * 1.2
		} else {
			NODE_RADIUS
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();
		ctx.set_stroke_style_str("#ffffff");
		ctx.set_line_width(2.0 / k);
		ctx.stroke();

		if highlighted {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(node.data.user_data.color);
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		let label = &node.data.user_data.label;
		if !label.is_empty() {
			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
		}
		ctx.set_global_alpha(1.0);
	});
}
