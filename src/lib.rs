//! callgraph-canvas: interactive call-graph visualization for static-analysis
//! dashboards.
//!
//! This crate provides a WASM-based canvas component that renders function
//! call graphs with physics-based layout, pan/zoom, hover highlighting, and
//! click-to-select, plus a small fullscreen app shell around it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::call_graph::{CallGraphCanvas, GraphData, GraphEdge, GraphNode};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("callgraph-canvas: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"callgraph-canvas: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("callgraph-canvas: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from the DOM and renders the call-graph visualization,
/// tracking the last clicked function as the selected node.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Load graph data from the DOM
	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let (selected, set_selected) = signal(None::<String>);
	let on_node_click = Callback::new(move |node: GraphNode| {
		info!(
			"callgraph-canvas: selected {} (in {}, out {})",
			node.name, node.in_degree, node.out_degree
		);
		set_selected.set(Some(node.id));
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Call Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<CallGraphCanvas
				data=graph_signal
				selected=selected.into()
				on_node_click=on_node_click
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Call Graph"</h1>
				<p class="subtitle">
					"Drag nodes to move them. Scroll to zoom. Click nodes for details. Hover to see connections."
				</p>
			</div>
			<div class="graph-legend">
				<div class="legend-title">"Legend"</div>
				<div class="legend-entry">
					<span class="legend-dot" style="background: #ff6b6b;"></span>
					"Selected Function"
				</div>
				<div class="legend-entry">
					<span class="legend-dot" style="background: #4ecdc4;"></span>
					"High Degree (6+)"
				</div>
				<div class="legend-entry">
					<span class="legend-dot" style="background: #45b7d1;"></span>
					"Medium Degree (3-6)"
				</div>
				<div class="legend-entry">
					<span class="legend-dot" style="background: #96ceb4;"></span>
					"Low Degree (<3)"
				</div>
			</div>
		</div>
	}
}
