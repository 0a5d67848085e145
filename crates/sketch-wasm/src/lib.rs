//! WASM bridge for Sketch — exposes the drawing surface to the browser page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards mouse,
//! touch, and keyboard events here and calls `render` whenever a handler
//! reports a change.

mod console_log;
mod render2d;
mod storage;

use sketch_core::{Color, ImageFormat};
use sketch_editor::{
    DrawingSurface, InputEvent, LoadOutcome, Modifiers, PersistenceAdapter, ShortcutAction,
    ShortcutMap, SurfaceConfig, ToolKind,
};
use std::cell::RefCell;
use std::rc::Rc;
use storage::LocalStore;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement};

/// The main WASM-facing canvas controller.
///
/// Owns the drawing surface and its persistence slot. The surface is shared
/// with in-flight loads, which apply on a later turn of the event loop.
#[wasm_bindgen]
pub struct SketchCanvas {
    surface: Rc<RefCell<DrawingSurface>>,
    persist: PersistenceAdapter<LocalStore>,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a blank canvas with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self::build(width, height, SurfaceConfig::default())
    }

    /// Create a canvas from a JSON `SurfaceConfig`. Missing fields take
    /// their defaults.
    pub fn with_config(
        width: u32,
        height: u32,
        config_json: &str,
    ) -> Result<SketchCanvas, JsValue> {
        let config = SurfaceConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?;
        Ok(Self::build(width, height, config))
    }

    fn build(width: u32, height: u32, config: SurfaceConfig) -> Self {
        // Set up panic hook and logger for better messages in the console
        console_error_panic_hook_setup();
        console_log::init();

        let persist = PersistenceAdapter::new(LocalStore::new(), config.storage_key.clone());
        let surface = DrawingSurface::with_config(width, height, config);
        log::info!("sketch canvas {width}x{height}");
        Self {
            surface: Rc::new(RefCell::new(surface)),
            persist,
        }
    }

    /// Copy the bitmap onto a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        render2d::blit(ctx, self.surface.borrow().bitmap())
    }

    /// Stretch the drawing into new dimensions. History is dropped.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.borrow_mut().resize(width, height);
    }

    pub fn width(&self) -> u32 {
        self.surface.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.surface.borrow().height()
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle mouse down. Returns true if the canvas needs a re-render.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        let event = InputEvent::from_pointer_down(x, y);
        self.surface.borrow_mut().handle(&event)
    }

    /// Handle mouse move. Hover moves (no button held) are ignored.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        let event = InputEvent::from_pointer_move(x, y);
        self.surface.borrow_mut().handle(&event)
    }

    /// Handle mouse up. A finished gesture is written to storage.
    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        let event = InputEvent::from_pointer_up(x, y);
        self.finish_gesture(&event)
    }

    /// The pointer left the canvas: end the gesture as if released.
    pub fn handle_pointer_leave(&mut self) -> bool {
        let ended = self.surface.borrow_mut().end_gesture();
        if ended {
            self.save();
        }
        ended
    }

    // ─── Touch API ───────────────────────────────────────────────────────

    /// Handle touch start. Coordinates are viewport (client) coordinates;
    /// `rect_left`/`rect_top` is the canvas' bounding-rect origin.
    pub fn handle_touch_start(
        &mut self,
        client_x: f32,
        client_y: f32,
        rect_left: f32,
        rect_top: f32,
    ) -> bool {
        let (x, y) = InputEvent::touch_to_canvas(client_x, client_y, rect_left, rect_top);
        self.handle_pointer_down(x, y)
    }

    pub fn handle_touch_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        rect_left: f32,
        rect_top: f32,
    ) -> bool {
        let (x, y) = InputEvent::touch_to_canvas(client_x, client_y, rect_left, rect_top);
        self.handle_pointer_move(x, y)
    }

    /// Handle touch end. `touchend` carries no position, so none is taken.
    pub fn handle_touch_end(&mut self) -> bool {
        self.handle_pointer_leave()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>", "fill":bool}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let event = InputEvent::from_key(
            key,
            Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        );
        let Some(action) = ShortcutMap::resolve_event(&event) else {
            return self.key_result(false, None);
        };

        let changed = match action {
            ShortcutAction::Export => {
                if let Err(err) = self.export(js_sys::Date::now(), None) {
                    log::warn!("export failed: {err:?}");
                }
                false
            }
            _ => {
                let changed = self.surface.borrow_mut().apply_action(action);
                if changed {
                    self.save();
                }
                changed
            }
        };
        self.key_result(changed, Some(action))
    }

    // ─── Tool selectors ──────────────────────────────────────────────────

    /// Select a tool by name. Returns false for unknown names.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.surface.borrow_mut().set_tool(tool);
                true
            }
            None => {
                log::warn!("unknown tool {name:?}");
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.surface.borrow().tool_config().tool.name().to_string()
    }

    /// Set the stroke/fill color from a CSS value (`#rgb`, `#rrggbb`,
    /// `rgb(...)`, `rgba(...)`). Returns false if it doesn't parse.
    pub fn set_color(&mut self, css: &str) -> bool {
        match Color::from_css(css) {
            Some(color) => {
                self.surface.borrow_mut().set_color(color);
                true
            }
            None => false,
        }
    }

    pub fn get_color(&self) -> String {
        self.surface.borrow().tool_config().color.to_hex()
    }

    pub fn set_width(&mut self, width: u32) {
        self.surface.borrow_mut().set_width(width);
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.surface.borrow_mut().set_fill(fill);
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let changed = self.surface.borrow_mut().undo();
        if changed {
            self.save();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.surface.borrow_mut().redo();
        if changed {
            self.save();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.surface.borrow().history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.surface.borrow().history().can_redo()
    }

    /// Blank the canvas (undoable) and save.
    pub fn clear(&mut self) -> bool {
        self.surface.borrow_mut().clear();
        self.save();
        true
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Write the canvas to `localStorage`. Returns false (and logs) on failure.
    pub fn save(&mut self) -> bool {
        match self.persist.save(&self.surface.borrow()) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("save failed: {err}");
                false
            }
        }
    }

    /// Restore the stored canvas. Decoding finishes on a later turn;
    /// `on_done` (if given) is called with `"missing"`, `"restored"`,
    /// `"reset"`, or `"superseded"`.
    pub fn load(&self, on_done: Option<js_sys::Function>) {
        let pending = {
            let mut surface = self.surface.borrow_mut();
            self.persist.begin_load(&mut surface)
        };
        let Some(pending) = pending else {
            notify(on_done.as_ref(), LoadOutcome::Missing);
            return;
        };

        let surface = Rc::clone(&self.surface);
        wasm_bindgen_futures::spawn_local(async move {
            // Yield so the page can paint before the decode
            if let Err(err) = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await {
                log::debug!("yield rejected: {err:?}");
            }
            let decoded = pending.resolve();
            let outcome = decoded.apply(&mut surface.borrow_mut());
            log::info!("load finished: {}", outcome_name(outcome));
            notify(on_done.as_ref(), outcome);
        });
    }

    /// Remove the stored record and blank the canvas.
    pub fn clear_storage(&mut self) -> bool {
        let mut surface = self.surface.borrow_mut();
        match self.persist.clear(&mut surface) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("clearing storage failed: {err}");
                false
            }
        }
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Ask for confirmation, then download the canvas as
    /// `<timestamp_ms>.<ext>`. `format` is `"png"` (default) or `"jpeg"`.
    /// Returns false if the user declined.
    pub fn export(&self, timestamp_ms: f64, format: Option<String>) -> Result<bool, JsValue> {
        let format = format
            .as_deref()
            .and_then(ImageFormat::from_name)
            .unwrap_or_default();
        let surface = self.surface.borrow();
        let request = surface.request_export(timestamp_ms as u64, format);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        if !window.confirm_with_message(request.prompt())? {
            return Ok(false);
        }
        let export = request
            .confirm(&surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&export.data_url);
        anchor.set_download(&export.file_name);
        anchor.click();
        Ok(true)
    }
}

impl SketchCanvas {
    fn finish_gesture(&mut self, event: &InputEvent) -> bool {
        let was_drawing = self.surface.borrow().is_drawing();
        self.surface.borrow_mut().handle(event);
        if was_drawing {
            self.save();
        }
        was_drawing
    }

    fn key_result(&self, changed: bool, action: Option<ShortcutAction>) -> String {
        let surface = self.surface.borrow();
        key_result_json(changed, action, surface.tool_config().tool, surface.tool_config().fill)
    }
}

fn key_result_json(
    changed: bool,
    action: Option<ShortcutAction>,
    tool: ToolKind,
    fill: bool,
) -> String {
    serde_json::json!({
        "changed": changed,
        "action": action.map_or("none", ShortcutAction::name),
        "tool": tool.name(),
        "fill": fill,
    })
    .to_string()
}

fn outcome_name(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Missing => "missing",
        LoadOutcome::Restored => "restored",
        LoadOutcome::Reset => "reset",
        LoadOutcome::Superseded => "superseded",
    }
}

fn notify(callback: Option<&js_sys::Function>, outcome: LoadOutcome) {
    let Some(callback) = callback else {
        return;
    };
    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(outcome_name(outcome))) {
        log::warn!("load callback threw: {err:?}");
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Sketch WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Set the console log level (`"error"` … `"trace"`, or `"off"`).
/// Returns false if the name is not a level.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

/// Validate a configuration JSON string. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_config(json: &str) -> String {
    match SurfaceConfig::from_json(json) {
        Ok(_) => serde_json::json!({ "ok": true }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}
