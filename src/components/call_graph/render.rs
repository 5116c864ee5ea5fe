//! Canvas rendering for the call graph.
//!
//! Projects the current node positions and view transform into visual
//! primitives once per dirty frame: background, then a world-space pass under
//! the pan/zoom transform (edges with arrowheads, then nodes with labels on
//! top), then the screen-space hover tooltip.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::CallGraphState;
use super::style;

/// Renders the complete graph to the canvas.
pub fn render(state: &CallGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(style::BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx);
	draw_nodes(state, ctx);

	ctx.restore();

	draw_tooltip(state, ctx);
}

fn draw_edges(state: &CallGraphState, ctx: &CanvasRenderingContext2d) {
	for &(s, t) in state.edges() {
		let (x1, y1) = state.sim.position(s);
		let (x2, y2) = state.sim.position(t);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let target_radius = style::node_radius(state.nodes()[t].degree());

		ctx.set_global_alpha(state.edge_alpha(s, t));
		ctx.set_stroke_style_str(style::EDGE_STROKE);
		ctx.set_line_width(style::EDGE_WIDTH);

		// Line stops short of the target so the arrowhead stays visible.
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(
			x2 - ux * (target_radius + style::ARROW_SIZE),
			y2 - uy * (target_radius + style::ARROW_SIZE),
		);
		ctx.stroke();

		// Arrowhead at the target end.
		let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let (back_x, back_y) = (
			tip_x - ux * style::ARROW_SIZE,
			tip_y - uy * style::ARROW_SIZE,
		);
		let (px, py) = (-uy * style::ARROW_SIZE * 0.5, ux * style::ARROW_SIZE * 0.5);

		ctx.set_fill_style_str(style::EDGE_STROKE);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &CallGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");

	for (i, node) in state.nodes().iter().enumerate() {
		let (x, y) = state.sim.position(i);
		let degree = node.degree();
		let radius = style::node_radius(degree);
		let selected = state.is_selected(i);

		ctx.set_global_alpha(state.node_alpha(i));

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style::node_fill(degree, selected));
		ctx.fill();
		ctx.set_stroke_style_str(style::node_stroke(selected));
		ctx.set_line_width(style::NODE_STROKE_WIDTH);
		ctx.stroke();

		ctx.set_font(style::LABEL_FONT);
		ctx.set_fill_style_str(style::LABEL_FILL);
		let _ = ctx.fill_text(&style::display_name(&node.name), x, y + 5.0);

		ctx.set_font(style::DEGREE_FONT);
		ctx.set_fill_style_str(style::DEGREE_FILL);
		let _ = ctx.fill_text(&style::degree_label(degree), x, y + 18.0);
	}

	ctx.set_global_alpha(1.0);
	ctx.set_text_align("start");
}

/// Transient info overlay for the hovered node, anchored near the cursor.
fn draw_tooltip(state: &CallGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hovered() else {
		return;
	};
	let node = &state.nodes()[idx];
	let lines = [
		node.name.clone(),
		format!("In-degree: {}", node.in_degree),
		format!("Out-degree: {}", node.out_degree),
		format!("Total degree: {}", node.degree()),
	];

	let (cx, cy) = state.cursor();
	let (x, y) = (cx + 10.0, cy - 10.0);
	let line_height = 16.0;
	let pad = 8.0;
	// Rough monospace-ish width estimate; avoids a TextMetrics round trip.
	let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
	let box_w = widest * 6.5 + pad * 2.0;
	let box_h = lines.len() as f64 * line_height + pad * 2.0 - 4.0;

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
	ctx.fill_rect(x, y, box_w, box_h);

	ctx.set_fill_style_str("#fff");
	for (i, line) in lines.iter().enumerate() {
		ctx.set_font(if i == 0 {
			"bold 12px sans-serif"
		} else {
			"12px sans-serif"
		});
		let _ = ctx.fill_text(line, x + pad, y + pad + 10.0 + i as f64 * line_height);
	}
}
