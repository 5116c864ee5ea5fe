//! Visual mapping rules: node sizing, degree color tiers, and labels.
//!
//! Kept separate from the renderer so the mapping is testable and tunable in
//! one place.

/// Canvas background fill.
pub const BACKGROUND: &str = "#ffffff";

/// Fill for nodes with degree above 6.
pub const TIER_HIGH: &str = "#4ecdc4";
/// Fill for nodes with degree above 3 (and at most 6).
pub const TIER_MID: &str = "#45b7d1";
/// Fill for low-degree nodes.
pub const TIER_LOW: &str = "#96ceb4";
/// Fill override for the externally selected node, regardless of degree.
pub const SELECTED_FILL: &str = "#ff6b6b";
/// Stroke override for the selected node.
pub const SELECTED_STROKE: &str = "#ff5252";
/// Default node stroke.
pub const NODE_STROKE: &str = "#fff";
/// Node stroke width in world units.
pub const NODE_STROKE_WIDTH: f64 = 2.0;

/// Edge stroke color.
pub const EDGE_STROKE: &str = "#999";
/// Edge line width in world units.
pub const EDGE_WIDTH: f64 = 2.0;
/// Default edge opacity.
pub const EDGE_ALPHA: f64 = 0.6;
/// Arrowhead length in world units.
pub const ARROW_SIZE: f64 = 10.0;

/// Opacity for nodes outside the hovered neighborhood.
pub const DIMMED_NODE_ALPHA: f64 = 0.3;
/// Opacity for edges not touching the hovered node.
pub const DIMMED_EDGE_ALPHA: f64 = 0.1;

/// Primary label font.
pub const LABEL_FONT: &str = "bold 10px sans-serif";
/// Primary label fill.
pub const LABEL_FILL: &str = "#333";
/// Secondary (degree) label font.
pub const DEGREE_FONT: &str = "8px sans-serif";
/// Secondary label fill.
pub const DEGREE_FILL: &str = "#666";

/// Node radius from its degree: `clamp(degree * 2, 15, 25)`.
pub fn node_radius(degree: u32) -> f64 {
	(degree as f64 * 2.0).clamp(15.0, 25.0)
}

/// Node fill color by degree tier, with the selection override on top.
pub fn node_fill(degree: u32, selected: bool) -> &'static str {
	if selected {
		SELECTED_FILL
	} else if degree > 6 {
		TIER_HIGH
	} else if degree > 3 {
		TIER_MID
	} else {
		TIER_LOW
	}
}

/// Node stroke color, overridden for the selected node.
pub fn node_stroke(selected: bool) -> &'static str {
	if selected { SELECTED_STROKE } else { NODE_STROKE }
}

/// Primary label text: the name truncated to 8 characters plus an ellipsis
/// when longer.
pub fn display_name(name: &str) -> String {
	if name.chars().count() > 8 {
		let prefix: String = name.chars().take(8).collect();
		format!("{prefix}...")
	} else {
		name.to_string()
	}
}

/// Secondary label text.
pub fn degree_label(degree: u32) -> String {
	format!("deg: {degree}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_clamps_to_bounds() {
		assert_eq!(node_radius(0), 15.0);
		assert_eq!(node_radius(2), 15.0);
		assert_eq!(node_radius(8), 16.0);
		assert_eq!(node_radius(12), 24.0);
		assert_eq!(node_radius(13), 25.0);
		assert_eq!(node_radius(100), 25.0);
	}

	#[test]
	fn fill_follows_degree_tiers() {
		assert_eq!(node_fill(2, false), TIER_LOW);
		assert_eq!(node_fill(3, false), TIER_LOW);
		assert_eq!(node_fill(4, false), TIER_MID);
		assert_eq!(node_fill(6, false), TIER_MID);
		assert_eq!(node_fill(7, false), TIER_HIGH);
		assert_eq!(node_fill(8, false), TIER_HIGH);
	}

	#[test]
	fn selection_overrides_every_tier() {
		for degree in [0, 4, 10] {
			assert_eq!(node_fill(degree, true), SELECTED_FILL);
		}
		assert_eq!(node_stroke(true), SELECTED_STROKE);
		assert_eq!(node_stroke(false), NODE_STROKE);
	}

	#[test]
	fn names_truncate_past_eight_chars() {
		assert_eq!(display_name("main"), "main");
		assert_eq!(display_name("exactly8"), "exactly8");
		assert_eq!(display_name("nine_char"), "nine_cha...");
		assert_eq!(display_name("process_warnings"), "process_...");
	}

	#[test]
	fn degree_label_format() {
		assert_eq!(degree_label(5), "deg: 5");
	}
}
