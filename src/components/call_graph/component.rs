//! Leptos component wrapping the call-graph canvas.
//!
//! Creates an HTML canvas, wires mouse/wheel events into the interaction
//! state machine, and runs a `requestAnimationFrame` loop that ticks the
//! simulation while it is hot and redraws only on dirty frames. Teardown
//! cancels the frame loop and listeners so nothing fires after unmount.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CallGraphState;
use super::types::{GraphData, GraphNode};

fn surface_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		(
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

/// Renders an interactive force-directed call graph on a canvas element.
///
/// Graph data arrives via the reactive `data` signal; replacing it stops the
/// previous simulation and starts a fresh one. `selected` highlights a node
/// by id, and `on_node_click` fires once per completed click-without-drag on
/// a node (absent callback means clicks are no-ops). The component sizes
/// itself to its parent container by default; `fullscreen = true` fills the
/// viewport and follows window resizes.
#[component]
pub fn CallGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] selected: Option<Signal<Option<String>>>,
	#[prop(optional)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CallGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let stopped: Rc<Cell<bool>> = Rc::new(Cell::new(false));

	let (state_init, animate_init, resize_init) = (state.clone(), animate.clone(), resize_cb.clone());
	let (raf_init, stopped_init) = (raf_id.clone(), stopped.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = surface_size(&canvas, &window, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// A data swap must stop the old engine before the new one exists;
		// the two never run concurrently.
		if let Some(mut prev) = state_init.borrow_mut().take() {
			prev.sim.stop();
		}
		*state_init.borrow_mut() = Some(CallGraphState::new(&data.get(), w, h));

		// Listeners and the frame loop are wired once; reruns of this effect
		// only rebuild the state above.
		if animate_init.borrow().is_some() {
			return;
		}

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = surface_size(&canvas_resize, &win, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let (raf_anim, stopped_anim) = (raf_init.clone(), stopped_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stopped_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let sel = selected.and_then(|sig| sig.try_get_untracked()).flatten();
				s.set_selected(sel.as_deref());
				let mut dirty = s.take_dirty();
				if s.tick() {
					dirty = true;
				}
				if dirty {
					render::render(s, &ctx);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(id) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					raf_anim.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				raf_init.set(Some(id));
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		// Release the borrow before running the callback.
		let clicked = state_mu.borrow_mut().as_mut().and_then(CallGraphState::pointer_up);
		if let (Some(node), Some(cb)) = (clicked, on_node_click) {
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	// on_cleanup wants Send + Sync; these handles never leave the main
	// thread, so SendWrapper is sound here.
	let cleanup_handles = SendWrapper::new((
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_id.clone(),
		stopped.clone(),
	));
	on_cleanup(move || {
		let (state_cleanup, animate_cleanup, resize_cleanup, raf_cleanup, stopped_cleanup) =
			cleanup_handles.take();
		stopped_cleanup.set(true);
		if let Some(window) = web_sys::window() {
			if let Some(id) = raf_cleanup.get() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *resize_cleanup.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if let Some(ref mut s) = *state_cleanup.borrow_mut() {
			s.sim.stop();
		}
		*animate_cleanup.borrow_mut() = None;
		*resize_cleanup.borrow_mut() = None;
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="call-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
